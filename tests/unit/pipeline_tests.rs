/*!
 * Tests for pipeline orchestration over in-memory mappings
 */

use indexmap::IndexMap;
use std::sync::atomic::Ordering;

use langpack::dictionary::TermDictionary;
use langpack::pipeline::PipelineStage;
use langpack::providers::mock::MockProvider;

use crate::common::mock_orchestrator;

fn mapping(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_orchestrator_runMapping_shouldPreserveKeySet() {
    let (orchestrator, _, _) =
        mock_orchestrator(MockProvider::working(), TermDictionary::in_memory());
    let input = mapping(&[("a.key", "One"), ("b.key", "Two"), ("c.key", "")]);
    let input_keys: Vec<String> = input.keys().cloned().collect();

    let (output, report) = orchestrator.run_mapping(input).await;

    let output_keys: Vec<String> = output.keys().cloned().collect();
    assert_eq!(output_keys, input_keys);
    assert_eq!(report.total_entries, 3);
}

#[tokio::test]
async fn test_orchestrator_runMapping_shouldReachWrittenState() {
    let (orchestrator, _, _) =
        mock_orchestrator(MockProvider::working(), TermDictionary::in_memory());

    let (_, report) = orchestrator.run_mapping(mapping(&[("k", "Hello")])).await;

    assert_eq!(report.final_stage, Some(PipelineStage::Written));
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_orchestrator_runMapping_withFailingEntries_shouldKeepSourceText() {
    // Retry policy allows 2 attempts; fail the first 2 requests so entry
    // one exhausts its retries, then let the rest succeed.
    let (orchestrator, _, _) =
        mock_orchestrator(MockProvider::fail_first(2), TermDictionary::in_memory());
    let input = mapping(&[("bad.key", "Unlucky"), ("good.key", "Lucky")]);

    let (output, report) = orchestrator.run_mapping(input).await;

    // The failed entry keeps its source text, never dropped
    assert_eq!(output.get("bad.key").map(String::as_str), Some("Unlucky"));
    assert_eq!(output.get("good.key").map(String::as_str), Some("[ja] Lucky"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "bad.key");
    assert_eq!(report.failures[0].stage, PipelineStage::Translating);
    // One bad entry must not block the rest of the batch
    assert_eq!(report.translated, 1);
    assert_eq!(report.final_stage, Some(PipelineStage::Written));
}

#[tokio::test]
async fn test_orchestrator_runMapping_withSharedTerm_shouldRenderConsistently() {
    // Two entries sharing the same source text resolve byte-identically,
    // the second straight from the dictionary without a provider call.
    let provider = MockProvider::scripted([("Owner", "持ち主")]);
    let counter = provider.request_counter();
    let (orchestrator, _, _) = mock_orchestrator(provider, TermDictionary::in_memory());
    let input = mapping(&[("item.owner", "Owner"), ("block.owner", "Owner")]);

    let (output, report) = orchestrator.run_mapping(input).await;

    assert_eq!(output["item.owner"], output["block.owner"]);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(report.translated, 1);
    assert_eq!(report.from_dictionary, 1);
}

#[tokio::test]
async fn test_orchestrator_runMapping_withCanonicalTerm_shouldRewriteProviderOutput() {
    // The dictionary holds 所有者 -> 持ち主; provider output using the
    // non-canonical rendering is rewritten everywhere in the output.
    let dictionary = TermDictionary::from_pairs([("所有者", "持ち主")]);
    let provider = MockProvider::scripted([
        ("The owner's house", "所有者の家"),
        ("Owner rights", "所有者の権利"),
    ]);
    let (orchestrator, shared, _) = mock_orchestrator(provider, dictionary);
    let input = mapping(&[("a", "The owner's house"), ("b", "Owner rights")]);

    let (output, _) = orchestrator.run_mapping(input).await;

    assert!(output["a"].contains("もちぬし"));
    assert!(output["b"].contains("もちぬし"));
    assert!(!output.values().any(|v| v.contains("所有者")));
    // The recorded pairs also carry the canonical rendering
    assert_eq!(shared.read().lookup("The owner's house"), Some("持ち主の家"));
}

#[tokio::test]
async fn test_orchestrator_runMapping_shouldSimplifyAndFormat() {
    let provider = MockProvider::scripted([(
        "About the owner. See \"here\" for details.",
        "所有者について。詳しくは\"こちら。\"を参照",
    )]);
    let (orchestrator, _, _) = mock_orchestrator(provider, TermDictionary::in_memory());
    let input = mapping(&[("info", "About the owner. See \"here\" for details.")]);

    let (output, report) = orchestrator.run_mapping(input).await;

    // Simplified to phonetic script, then broken after the first sentence
    // but not after the terminator that closes the quoted clause.
    assert_eq!(
        output["info"],
        "しょゆうしゃについて。\\nくわしくは\"こちら。\"をさんしょう"
    );
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_orchestrator_runMapping_withUnknownKanji_shouldReportSimplifyFailure() {
    let provider = MockProvider::scripted([("Dragon", "竜")]);
    let (orchestrator, _, _) = mock_orchestrator(provider, TermDictionary::in_memory());

    let (output, report) = orchestrator.run_mapping(mapping(&[("mob", "Dragon")])).await;

    // The translated text survives unsimplified and the failure is reported
    assert_eq!(output.get("mob").map(String::as_str), Some("竜"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, PipelineStage::Simplifying);
    assert_eq!(report.failed_keys(), ["mob"]);
}

#[tokio::test]
async fn test_orchestrator_runMapping_withCancellation_shouldStopBetweenEntries() {
    let (orchestrator, dictionary, cancel) =
        mock_orchestrator(MockProvider::working(), TermDictionary::in_memory());
    cancel.store(true, Ordering::SeqCst);
    let input = mapping(&[("a", "One"), ("b", "Two")]);

    let (output, report) = orchestrator.run_mapping(input).await;

    assert!(report.cancelled);
    // Nothing was translated or recorded after the cancellation point
    assert_eq!(output.get("a").map(String::as_str), Some("One"));
    assert_eq!(output.get("b").map(String::as_str), Some("Two"));
    assert!(dictionary.read().is_empty());
}

#[tokio::test]
async fn test_orchestrator_runMapping_withSeededDictionary_shouldShortCircuitProvider() {
    // A curated rendering beats whatever the provider would have produced,
    // and the provider is never even called for that entry.
    let dictionary = TermDictionary::from_pairs([("Creeper", "クリーパー")]);
    let provider = MockProvider::scripted([("Creeper", "匍匐者")]);
    let counter = provider.request_counter();
    let (orchestrator, _, _) = mock_orchestrator(provider, dictionary);

    let (output, report) = orchestrator.run_mapping(mapping(&[("mob", "Creeper")])).await;

    assert_eq!(output.get("mob").map(String::as_str), Some("クリーパー"));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(report.conflicts.is_empty());
    assert_eq!(report.from_dictionary, 1);
}
