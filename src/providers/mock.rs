/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - always succeeds with a marked translation
 * - `MockProvider::scripted(..)` - returns fixed translations per input
 * - `MockProvider::intermittent(n)` - fails every nth request
 * - `MockProvider::failing()` - always fails with an error
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, wrapping the source text so tests can spot it
    Working,
    /// Returns fixed responses per source text; unknown inputs fall back to
    /// the Working transformation
    Scripted(HashMap<String, String>),
    /// Fails intermittently (every nth request)
    Intermittent { fail_every: usize },
    /// Fails the first n requests, then succeeds
    FailFirst { failures: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared so tests can assert call counts
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider returning fixed translations
    pub fn scripted<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(MockBehavior::Scripted(map))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock provider that fails the first `failures` requests
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Handle to the shared request counter
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        self.request_count.clone()
    }

    /// Number of translate calls observed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn working_translation(request: &TranslationRequest) -> String {
        format!("[{}] {}", request.target_language, request.text)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(&self, request: TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.behavior {
            MockBehavior::Working => Ok(Self::working_translation(&request)),
            MockBehavior::Scripted(map) => Ok(map
                .get(&request.text)
                .cloned()
                .unwrap_or_else(|| Self::working_translation(&request))),
            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!(
                        "simulated failure on request {}",
                        count
                    )))
                } else {
                    Ok(Self::working_translation(&request))
                }
            }
            MockBehavior::FailFirst { failures } => {
                if count <= *failures {
                    Err(ProviderError::RequestFailed(format!(
                        "simulated failure on request {}",
                        count
                    )))
                } else {
                    Ok(Self::working_translation(&request))
                }
            }
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "simulated permanent failure".to_string(),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
