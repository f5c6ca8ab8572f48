/*!
 * Error types for the langpack application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur around the terminology dictionary store
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The backing file could not be read or was not a flat string mapping
    #[error("Failed to load dictionary: {0}")]
    Load(String),

    /// The backing file could not be flushed; translations already applied
    /// to the output stand, but terminology gains are lost for future runs
    #[error("Failed to persist dictionary: {0}")]
    Persist(String),
}

/// Per-entry failures collected by the pipeline instead of aborting the batch
#[derive(Error, Debug)]
pub enum EntryError {
    /// The translation collaborator kept failing after bounded retries;
    /// the entry keeps its original source text in the output
    #[error("Translation failed after {attempts} attempts: {message}")]
    TranslationFailed {
        /// Number of attempts made before giving up
        attempts: u32,
        /// Last provider error message
        message: String,
    },

    /// The simplifier found a logographic span with no phonetic reading;
    /// the entry keeps its pre-simplification text
    #[error("No phonetic reading available for '{span}'")]
    MissingReading {
        /// The span that could not be converted
        span: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// A resource file was not a flat string-to-string mapping;
    /// fatal for that file, other files in the batch are unaffected
    #[error("Malformed resource file: {0}")]
    MalformedInput(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the dictionary store
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility conversions for error propagation with `?`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
