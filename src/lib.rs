/*!
 * # langpack - Game Content Pack Localizer
 *
 * A Rust library for localizing a game content pack's language resource
 * files through a chain of rewriting stages.
 *
 * ## Features
 *
 * - Machine translation of flat key -> string resource files
 * - Cross-run terminology dictionary for consistent renderings
 * - Script simplification (logographic text to phonetic script)
 * - Line-break escape insertion at sentence boundaries
 * - Batch-anchored rate limiting of translation calls
 * - Automatic pack version stamping
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `dictionary`: Cross-run terminology dictionary
 * - `rate_limiter`: Batch-anchored pacing of translation calls
 * - `translation`: Translation service and retry policy
 * - `simplifier`: Logographic-to-phonetic script rewriting
 * - `formatting`: Sentence-boundary line-break insertion
 * - `pack_versioner`: Version derivation for packaged output
 * - `pipeline`: Stage orchestration over one resource file
 * - `providers`: Client implementations for translation backends:
 *   - `providers::gemini`: Gemini REST API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted providers for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dictionary;
pub mod errors;
pub mod file_utils;
pub mod formatting;
pub mod language_utils;
pub mod pack_versioner;
pub mod pipeline;
pub mod providers;
pub mod rate_limiter;
pub mod simplifier;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use dictionary::TermDictionary;
pub use errors::{AppError, DictionaryError, EntryError, ProviderError};
pub use formatting::{BreakFormatter, BreakRules};
pub use pack_versioner::PackVersion;
pub use pipeline::{Orchestrator, PipelineReport, PipelineStage};
pub use rate_limiter::RateLimiter;
pub use simplifier::{ReadingLexicon, ScriptSimplifier};
pub use translation::TranslationService;
