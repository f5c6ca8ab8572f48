/*!
 * Shared fixtures for the langpack test suite.
 */

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use langpack::app_config::TranslationConfig;
use langpack::dictionary::TermDictionary;
use langpack::formatting::{BreakFormatter, BreakRules};
use langpack::pipeline::Orchestrator;
use langpack::providers::mock::MockProvider;
use langpack::rate_limiter::RateLimiter;
use langpack::simplifier::{ReadingLexicon, ScriptSimplifier};
use langpack::translation::TranslationService;

/// A small reading lexicon covering the fixtures' kanji
pub fn test_lexicon() -> ReadingLexicon {
    ReadingLexicon::from_pairs([
        ("持ち主", "もちぬし"),
        ("所有者", "しょゆうしゃ"),
        ("所有", "しょゆう"),
        ("者", "しゃ"),
        ("家", "いえ"),
        ("権利", "けんり"),
        ("詳しく", "くわしく"),
        ("参照", "さんしょう"),
    ])
}

/// Build an orchestrator around a mock provider and an in-memory dictionary.
/// Returns the orchestrator plus the shared dictionary and cancel handles.
pub fn mock_orchestrator(
    provider: MockProvider,
    dictionary: TermDictionary,
) -> (Orchestrator, Arc<RwLock<TermDictionary>>, Arc<AtomicBool>) {
    let dictionary = Arc::new(RwLock::new(dictionary));
    let limiter = Arc::new(RateLimiter::from_secs(0));
    let cancel = Arc::new(AtomicBool::new(false));

    let config = TranslationConfig {
        retry_count: 2,
        interval_secs: 0,
        ..TranslationConfig::default()
    };
    let service = TranslationService::with_provider(
        Box::new(provider),
        &config,
        "en",
        "ja",
        dictionary.clone(),
        limiter.clone(),
    );

    let orchestrator = Orchestrator::new(
        service,
        ScriptSimplifier::new(test_lexicon()),
        Some(BreakFormatter::new(BreakRules::for_language("ja", "\\n"))),
        dictionary.clone(),
        limiter,
        " ",
        cancel.clone(),
    );
    (orchestrator, dictionary, cancel)
}

/// Write a flat resource mapping as JSON under `dir`, creating parents
pub fn write_lang_file(dir: &Path, relative: &str, entries: &[(&str, &str)]) -> std::path::PathBuf {
    let path = dir.join(relative);
    let map: IndexMap<String, String> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    langpack::file_utils::save_lang_map(&path, &map).expect("write lang file");
    path
}
