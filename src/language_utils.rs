use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and matching ISO 639-1
/// (2-letter) and ISO 639-3 (3-letter) language codes, and for picking the
/// sentence-break rules that apply to a target language.

/// Resolve a language code to its English name, validating it in the process
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return Ok(lang.to_name().to_string());
        }
    } else if normalized.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized) {
            return Ok(lang.to_name().to_string());
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-3 (3-letter) format
pub fn normalize_to_part3(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized.len() == 3 && Language::from_639_3(&normalized).is_some() {
        return Ok(normalized);
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check whether two language codes refer to the same language,
/// regardless of 2-letter vs 3-letter form
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (normalize_to_part3(a), normalize_to_part3(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// Whether the language uses CJK sentence punctuation (ideographic full stop)
pub fn uses_ideographic_punctuation(code: &str) -> bool {
    matches!(
        normalize_to_part3(code).as_deref(),
        Ok("jpn") | Ok("zho") | Ok("kor")
    )
}
