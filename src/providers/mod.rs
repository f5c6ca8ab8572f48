/*!
 * Provider implementations for the translation collaborator boundary.
 *
 * The pipeline treats translation as an opaque, rate-limited, retryable
 * function from one source string to one target string. This module defines
 * that seam and the client implementations behind it:
 * - Gemini: hosted REST API
 * - Ollama: local LLM server
 * - Mock: scripted behaviors for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One translation request across the collaborator boundary
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// The text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Rendered system prompt guiding the model
    pub system_prompt: String,
}

/// Common trait for all translation providers
///
/// Implementations must be interchangeable behind `Box<dyn Provider>`; the
/// pipeline never learns which backend served a request.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate one source string into one target string
    async fn translate(&self, request: TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short backend name for logs and reports
    fn name(&self) -> &str;
}

pub mod gemini;
pub mod mock;
pub mod ollama;
