use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Resource-file code of the source language (file stem, e.g. "en_us")
    #[serde(default = "default_source_resource_code")]
    pub source_resource_code: String,

    /// Resource-file code of the target language (file stem, e.g. "ja_jp")
    #[serde(default = "default_target_resource_code")]
    pub target_resource_code: String,

    /// Relative paths handed in by the surrounding tool
    #[serde(default)]
    pub paths: PathsConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Output formatting config
    #[serde(default)]
    pub formatting: FormattingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Gemini REST API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl TranslationProvider {
    /// Capitalized provider name for display
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Relative locations of the resource pack, mods directory and shared stores.
///
/// Path resolution happens in the surrounding tool; everything here must stay
/// relative to the instance root the tool was pointed at.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Output resource pack directory
    #[serde(default = "default_resource_pack_dir")]
    pub resource_pack_dir: PathBuf,

    /// Mods directory scanned for source-language resource files
    #[serde(default = "default_mods_dir")]
    pub mods_dir: PathBuf,

    /// Terminology dictionary store shared across runs
    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: PathBuf,

    /// Reading lexicon consumed by the script simplifier
    #[serde(default = "default_lexicon_file")]
    pub lexicon_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            resource_pack_dir: default_resource_pack_dir(),
            mods_dir: default_mods_dir(),
            dictionary_file: default_dictionary_file(),
            lexicon_file: default_lexicon_file(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service endpoint URL (empty selects the provider default)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Minimum spacing between translation calls, in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Attempt count for failed requests (first try included)
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: String::new(),
            api_key: String::new(),
            model: default_model(),
            interval_secs: default_interval_secs(),
            retry_count: default_retry_count(),
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Output formatting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormattingConfig {
    /// Delimiter inserted between simplified phonetic segments
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Literal in-string sequence the target runtime renders as a line break
    #[serde(default = "default_line_break")]
    pub line_break: String,

    /// Whether to run the line-break formatter at all
    #[serde(default = "default_true")]
    pub insert_line_breaks: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            line_break: default_line_break(),
            insert_line_breaks: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_resource_pack_dir() -> PathBuf {
    PathBuf::from("resourcepacks/LocalizedPack")
}

fn default_mods_dir() -> PathBuf {
    PathBuf::from("mods")
}

fn default_dictionary_file() -> PathBuf {
    PathBuf::from("langpack/dictionary.json")
}

fn default_lexicon_file() -> PathBuf {
    PathBuf::from("langpack/readings.json")
}

fn default_source_resource_code() -> String {
    "en_us".to_string()
}

fn default_target_resource_code() -> String {
    "ja_jp".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_interval_secs() -> u64 {
    4
}

fn default_retry_count() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_delimiter() -> String {
    " ".to_string()
}

fn default_line_break() -> String {
    "\\n".to_string()
}

fn default_true() -> bool {
    true
}

fn default_system_prompt() -> String {
    "You are a professional game localizer. Translate the following in-game text from {source_language} to {target_language}. Keep placeholders and format codes untouched and return only the translated text.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        // Paths arrive resolved; the core never constructs absolute paths
        for (name, path) in [
            ("resource_pack_dir", &self.paths.resource_pack_dir),
            ("mods_dir", &self.paths.mods_dir),
            ("dictionary_file", &self.paths.dictionary_file),
            ("lexicon_file", &self.paths.lexicon_file),
        ] {
            if path.is_absolute() {
                return Err(anyhow!("Path '{}' must be relative, got: {:?}", name, path));
            }
        }

        if self.formatting.delimiter.chars().count() != 1 {
            return Err(anyhow!(
                "Delimiter must be a single character, got: {:?}",
                self.formatting.delimiter
            ));
        }

        if self.formatting.line_break.is_empty() {
            return Err(anyhow!("Line break sequence must not be empty"));
        }

        // A custom endpoint must at least parse as a URL
        if !self.translation.endpoint.is_empty() {
            url::Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint '{}': {}", self.translation.endpoint, e))?;
        }

        // API key is required for the hosted provider
        if self.translation.provider == TranslationProvider::Gemini
            && self.translation.api_key.is_empty()
        {
            return Err(anyhow!("Translation API key is required for Gemini provider"));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file, or fall back to defaults when
    /// the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = crate::file_utils::FileManager::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Invalid configuration file {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        crate::file_utils::FileManager::write_to_file(path, &content)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "ja".to_string(),
            source_resource_code: default_source_resource_code(),
            target_resource_code: default_target_resource_code(),
            paths: PathsConfig::default(),
            translation: TranslationConfig::default(),
            formatting: FormattingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
