/*!
 * End-to-end localization workflow tests over a temporary instance layout
 */

use std::sync::atomic::Ordering;
use tempfile::tempdir;

use langpack::app_config::Config;
use langpack::app_controller::Controller;
use langpack::dictionary::TermDictionary;
use langpack::file_utils::{self, FileManager};
use langpack::pack_versioner::PackVersion;
use langpack::providers::mock::MockProvider;

use crate::common::{mock_orchestrator, write_lang_file};

fn instance_config(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.paths.mods_dir = root.join("mods");
    config.paths.resource_pack_dir = root.join("resourcepacks/TestPack");
    config.paths.dictionary_file = root.join("langpack/dictionary.json");
    config.paths.lexicon_file = root.join("langpack/readings.json");
    config
}

#[tokio::test]
async fn test_controller_run_shouldMergeModsIntoPack() {
    let root = tempdir().expect("tempdir");
    write_lang_file(
        root.path(),
        "mods/moda/assets/moda/lang/en_us.json",
        &[("item.owner", "Owner"), ("item.ball", "Pokeball")],
    );
    write_lang_file(
        root.path(),
        "mods/modb/assets/modb/lang/en_us.json",
        &[("mob.creeper", "Creeper")],
    );

    let config = instance_config(root.path());
    let controller = Controller::with_config(config.clone()).expect("controller");

    let dictionary = TermDictionary::load(&config.paths.dictionary_file).expect("dictionary");
    let provider = MockProvider::scripted([
        ("Owner", "持ち主"),
        ("Pokeball", "モンスターボール"),
        ("Creeper", "クリーパー"),
    ]);
    let (orchestrator, _, _) = mock_orchestrator(provider, dictionary);

    let summary = controller
        .run_with_orchestrator(&orchestrator)
        .await
        .expect("run");

    assert!(summary.is_clean());
    assert_eq!(summary.reports.len(), 2);

    let pack_file = summary.pack_file.expect("pack file");
    let merged = file_utils::load_lang_map(&pack_file).expect("merged pack");
    assert_eq!(merged.get("item.owner").map(String::as_str), Some("もちぬし"));
    assert_eq!(merged.get("mob.creeper").map(String::as_str), Some("クリーパー"));
    assert_eq!(merged.len(), 3);

    // Pack metadata and version stamp were produced
    assert!(FileManager::file_exists(
        config.paths.resource_pack_dir.join("pack.mcmeta")
    ));
    assert_eq!(summary.version, Some(PackVersion::new(1, 0, 0)));
    assert_eq!(summary.artifact_name.as_deref(), Some("TestPack_1.0.0"));

    // Terminology gains were persisted for future runs
    let reloaded = TermDictionary::load(&config.paths.dictionary_file).expect("reload");
    assert_eq!(reloaded.lookup("Owner"), Some("持ち主"));
}

#[tokio::test]
async fn test_controller_run_withExistingPack_shouldReuseTranslations() {
    let root = tempdir().expect("tempdir");
    write_lang_file(
        root.path(),
        "mods/moda/assets/moda/lang/en_us.json",
        &[("item.owner", "Owner"), ("item.new", "Fresh")],
    );
    // The pack already localized item.owner in a previous run
    write_lang_file(
        root.path(),
        "resourcepacks/TestPack/assets/minecraft/lang/ja_jp.json",
        &[("item.owner", "もちぬし")],
    );

    let config = instance_config(root.path());
    let controller = Controller::with_config(config.clone()).expect("controller");

    let provider = MockProvider::scripted([("Fresh", "フレッシュ")]);
    let counter = provider.request_counter();
    let dictionary = TermDictionary::load(&config.paths.dictionary_file).expect("dictionary");
    let (orchestrator, _, _) = mock_orchestrator(provider, dictionary);

    let summary = controller
        .run_with_orchestrator(&orchestrator)
        .await
        .expect("run");

    // Only the new key went through the pipeline
    assert_eq!(summary.reused_entries, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let merged = file_utils::load_lang_map(&summary.pack_file.expect("pack file")).expect("merged");
    assert_eq!(merged.get("item.owner").map(String::as_str), Some("もちぬし"));
    assert!(merged.contains_key("item.new"));
}

#[tokio::test]
async fn test_controller_run_withMalformedFile_shouldIsolateFailure() {
    let root = tempdir().expect("tempdir");
    write_lang_file(
        root.path(),
        "mods/good/assets/good/lang/en_us.json",
        &[("key.good", "Creeper")],
    );
    // Malformed resource file: not a flat string mapping
    FileManager::write_to_file(
        root.path().join("mods/bad/assets/bad/lang/en_us.json"),
        r#"{"key.bad": 42}"#,
    )
    .expect("write malformed");

    let config = instance_config(root.path());
    let controller = Controller::with_config(config.clone()).expect("controller");
    let dictionary = TermDictionary::load(&config.paths.dictionary_file).expect("dictionary");
    let (orchestrator, _, _) =
        mock_orchestrator(MockProvider::scripted([("Creeper", "クリーパー")]), dictionary);

    let summary = controller
        .run_with_orchestrator(&orchestrator)
        .await
        .expect("run");

    // The malformed file is reported; the good file is still localized
    assert_eq!(summary.file_errors.len(), 1);
    assert_eq!(summary.reports.len(), 1);
    let merged = file_utils::load_lang_map(&summary.pack_file.expect("pack file")).expect("merged");
    assert_eq!(merged.get("key.good").map(String::as_str), Some("クリーパー"));
    assert!(!merged.contains_key("key.bad"));
}

#[tokio::test]
async fn test_controller_run_acrossRuns_shouldIncrementVersion() {
    let root = tempdir().expect("tempdir");
    write_lang_file(
        root.path(),
        "mods/moda/assets/moda/lang/en_us.json",
        &[("k", "Creeper")],
    );

    let config = instance_config(root.path());
    let controller = Controller::with_config(config.clone()).expect("controller");

    for expected in ["1.0.0", "1.0.1", "1.0.2"] {
        let dictionary = TermDictionary::load(&config.paths.dictionary_file).expect("dictionary");
        let (orchestrator, _, _) =
            mock_orchestrator(MockProvider::scripted([("Creeper", "クリーパー")]), dictionary);
        let summary = controller
            .run_with_orchestrator(&orchestrator)
            .await
            .expect("run");
        assert_eq!(summary.version.map(|v| v.to_string()).as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_controller_isInitialized_shouldRequireLanguages() {
    let controller = Controller::new_for_test().expect("controller");
    assert!(controller.is_initialized());
}
