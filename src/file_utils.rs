use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::AppError;

// @module: File and resource-mapping utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a string through a temporary file in the same directory, then
    /// rename into place. Readers never observe a half-written store.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        Self::ensure_dir(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temp file for {:?}", path))?;
        tmp.persist(path)
            .map_err(|e| anyhow!("Failed to persist {:?}: {}", path, e))?;
        Ok(())
    }
}

/// Load a flat key -> string resource mapping, preserving insertion order.
///
/// Anything that is not a flat string-to-string object is rejected as
/// malformed input for that file; the rest of a multi-file batch proceeds.
pub fn load_lang_map<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>, AppError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::File(format!("Failed to read {:?}: {}", path, e)))?;
    parse_lang_map(&content)
        .map_err(|e| AppError::MalformedInput(format!("{:?}: {}", path, e)))
}

/// Parse the flat mapping out of a JSON document string
pub fn parse_lang_map(content: &str) -> Result<IndexMap<String, String>> {
    let value: Value = serde_json::from_str(content)?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("Top-level value is not an object"))?;

    let mut map = IndexMap::with_capacity(object.len());
    for (key, value) in object {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("Value for key '{}' is not a string", key))?;
        map.insert(key.clone(), text.to_string());
    }
    Ok(map)
}

/// Save a resource mapping as pretty-printed JSON, atomically
pub fn save_lang_map<P: AsRef<Path>>(path: P, map: &IndexMap<String, String>) -> Result<()> {
    let content = serde_json::to_string_pretty(map)?;
    FileManager::write_atomic(path, &content)
}

/// Find resource-language files for the given language code under a
/// directory, e.g. every `en_us.json` inside a `lang/` folder
pub fn find_lang_files<P: AsRef<Path>>(dir: P, lang_code: &str) -> Result<Vec<PathBuf>> {
    let file_name = format!("{}.json", lang_code.to_lowercase());
    let mut result = Vec::new();

    for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let matches_name = path
            .file_name()
            .map(|n| n.to_string_lossy().eq_ignore_ascii_case(&file_name))
            .unwrap_or(false);
        let under_lang_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().eq_ignore_ascii_case("lang"))
            .unwrap_or(false);

        if matches_name && under_lang_dir {
            result.push(path.to_path_buf());
        }
    }

    result.sort();
    Ok(result)
}
