/*!
 * Tests for provider implementations
 */

use langpack::errors::ProviderError;
use langpack::providers::mock::MockProvider;
use langpack::providers::{Provider, TranslationRequest};

fn request(text: &str) -> TranslationRequest {
    TranslationRequest {
        text: text.to_string(),
        source_language: "en".to_string(),
        target_language: "ja".to_string(),
        system_prompt: "translate".to_string(),
    }
}

#[tokio::test]
async fn test_mockProvider_working_shouldMarkTranslations() {
    let provider = MockProvider::working();

    let result = provider.translate(request("Hello")).await.expect("translate");

    assert_eq!(result, "[ja] Hello");
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_mockProvider_scripted_shouldReturnFixedTranslations() {
    let provider = MockProvider::scripted([("Owner", "持ち主")]);

    let scripted = provider.translate(request("Owner")).await.expect("translate");
    let fallback = provider.translate(request("Other")).await.expect("translate");

    assert_eq!(scripted, "持ち主");
    assert_eq!(fallback, "[ja] Other");
}

#[tokio::test]
async fn test_mockProvider_failing_shouldAlwaysError() {
    let provider = MockProvider::failing();

    let result = provider.translate(request("Hello")).await;

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
}

#[tokio::test]
async fn test_mockProvider_failFirst_shouldRecoverAfterFailures() {
    let provider = MockProvider::fail_first(2);

    assert!(provider.translate(request("a")).await.is_err());
    assert!(provider.translate(request("a")).await.is_err());
    assert!(provider.translate(request("a")).await.is_ok());
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNth() {
    let provider = MockProvider::intermittent(3);

    assert!(provider.translate(request("a")).await.is_ok());
    assert!(provider.translate(request("a")).await.is_ok());
    assert!(provider.translate(request("a")).await.is_err());
    assert!(provider.translate(request("a")).await.is_ok());
}

#[tokio::test]
async fn test_mockProvider_testConnection_shouldMatchBehavior() {
    assert!(MockProvider::working().test_connection().await.is_ok());
    assert!(MockProvider::failing().test_connection().await.is_err());
}
