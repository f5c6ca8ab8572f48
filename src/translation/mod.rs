/*!
 * Translation service for resource-file localization.
 *
 * The service fronts the translation collaborator with the two pieces of
 * state the pipeline depends on: the terminology dictionary (consulted
 * before every call, updated immediately after every paid-for call) and the
 * batch-anchored rate limiter. Submodules:
 *
 * - `retry`: bounded-attempt policy around the unreliable boundary
 */

pub mod retry;

pub use self::retry::{RetryExhausted, RetryPolicy};

use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider as ProviderKind};
use crate::dictionary::TermDictionary;
use crate::errors::EntryError;
use crate::providers::{gemini::Gemini, ollama::Ollama, Provider, TranslationRequest};
use crate::rate_limiter::RateLimiter;

/// Outcome of resolving one entry, distinguishing dictionary hits from paid
/// provider calls for the run report.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The dictionary already held a canonical rendering; no call was made
    FromDictionary(String),
    /// The provider was called and the (enforced) result recorded
    Translated(String),
}

impl Resolution {
    /// The resolved target text, however it was obtained
    pub fn into_text(self) -> String {
        match self {
            Resolution::FromDictionary(text) | Resolution::Translated(text) => text,
        }
    }
}

/// Main translation service for resource entries
pub struct TranslationService {
    /// Provider implementation behind the collaborator boundary
    provider: Box<dyn Provider>,

    /// Shared terminology dictionary, the single source of truth
    dictionary: Arc<RwLock<TermDictionary>>,

    /// Pacing for outbound calls
    limiter: Arc<RateLimiter>,

    /// Bounded retry around each call
    retry: RetryPolicy,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// System prompt with language placeholders already rendered
    system_prompt: String,
}

impl TranslationService {
    /// Create a service from configuration, constructing the configured
    /// provider client
    pub fn from_config(
        config: &TranslationConfig,
        source_language: &str,
        target_language: &str,
        dictionary: Arc<RwLock<TermDictionary>>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let provider: Box<dyn Provider> = match config.provider {
            ProviderKind::Gemini => Box::new(Gemini::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                config.model.clone(),
                config.timeout_secs,
            )),
            ProviderKind::Ollama => Box::new(Ollama::new(
                config.endpoint.clone(),
                config.model.clone(),
                config.timeout_secs,
            )),
        };

        Self::with_provider(
            provider,
            config,
            source_language,
            target_language,
            dictionary,
            limiter,
        )
    }

    /// Create a service around an explicit provider (tests inject mocks here)
    pub fn with_provider(
        provider: Box<dyn Provider>,
        config: &TranslationConfig,
        source_language: &str,
        target_language: &str,
        dictionary: Arc<RwLock<TermDictionary>>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let system_prompt = config
            .system_prompt
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);

        Self {
            provider,
            dictionary,
            limiter,
            retry: RetryPolicy::new(config.retry_count),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            system_prompt,
        }
    }

    /// Backend name for logs and reports
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Check that the provider is reachable before spending a batch on it
    pub async fn test_connection(&self) -> Result<(), crate::errors::ProviderError> {
        self.provider.test_connection().await
    }

    /// Resolve one entry's target text.
    ///
    /// A dictionary hit short-circuits the provider entirely. Otherwise the
    /// provider runs under the retry policy, its output is rewritten with
    /// the dictionary's canonical terminology, and the pair is recorded
    /// before returning so a crash mid-batch never loses a paid-for
    /// translation.
    pub async fn translate_entry(&self, source: &str) -> Result<Resolution, EntryError> {
        if let Some(canonical) = self.dictionary.read().lookup(source) {
            debug!("Dictionary hit for '{}'", source);
            return Ok(Resolution::FromDictionary(canonical.to_string()));
        }

        let raw = self
            .retry
            .run(&self.limiter, || {
                self.provider.translate(TranslationRequest {
                    text: source.to_string(),
                    source_language: self.source_language.clone(),
                    target_language: self.target_language.clone(),
                    system_prompt: self.system_prompt.clone(),
                })
            })
            .await
            .map_err(|exhausted| EntryError::TranslationFailed {
                attempts: exhausted.attempts,
                message: exhausted.last_error.to_string(),
            })?;

        let mut dictionary = self.dictionary.write();
        let enforced = dictionary.apply(&raw);
        dictionary.record(source, &enforced);

        // The stored rendering wins over ours if a concurrent record landed
        let canonical = dictionary
            .lookup(source)
            .map(str::to_string)
            .unwrap_or(enforced);
        Ok(Resolution::Translated(canonical))
    }
}
