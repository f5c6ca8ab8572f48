/*!
 * Script simplification: logographic text to a purely phonetic rendering.
 *
 * The simplifier walks the target text looking for logographic spans,
 * converts each longest-match lexicon segment to its phonetic reading, and
 * separates consecutive converted units with a caller-supplied delimiter.
 * Everything else (already-phonetic text, punctuation, digits, platform
 * escape sequences) passes through untouched, which makes the stage
 * idempotent: simplified output contains no logographic characters, so a
 * second pass is a no-op.
 *
 * The segmentation/reading data itself comes from the environment as a flat
 * lexicon file; installing it is a packaging concern, not ours.
 */

use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;

use crate::errors::{AppError, EntryError};
use crate::file_utils;

/// Mapping of logographic spans (okurigana included where the environment's
/// segmenter produced them) to phonetic readings.
pub struct ReadingLexicon {
    readings: IndexMap<String, String>,

    /// Length in chars of the longest key, bounding the match window
    max_key_chars: usize,
}

impl ReadingLexicon {
    /// Create an empty lexicon
    pub fn new() -> Self {
        Self {
            readings: IndexMap::new(),
            max_key_chars: 0,
        }
    }

    /// Build a lexicon from existing pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut lexicon = Self::new();
        for (span, reading) in pairs {
            lexicon.insert(&span.into(), &reading.into());
        }
        lexicon
    }

    /// Load the lexicon from a flat JSON mapping. A missing file yields an
    /// empty lexicon; the simplifier then reports every logographic span.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let map = file_utils::load_lang_map(path)?;
        let mut lexicon = Self::new();
        for (span, reading) in &map {
            lexicon.insert(span, reading);
        }
        Ok(lexicon)
    }

    /// Register a span's reading
    pub fn insert(&mut self, span: &str, reading: &str) {
        let span = span.trim();
        if span.is_empty() {
            return;
        }
        self.max_key_chars = self.max_key_chars.max(span.chars().count());
        self.readings.insert(span.to_string(), reading.to_string());
    }

    /// Number of known spans
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the lexicon holds no spans
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Longest lexicon key matching `chars` starting at `pos`.
    /// Returns the match length in chars and the reading.
    fn longest_match(&self, chars: &[char], pos: usize) -> Option<(usize, &str)> {
        let window = self.max_key_chars.min(chars.len() - pos);
        for len in (1..=window).rev() {
            let candidate: String = chars[pos..pos + len].iter().collect();
            if let Some(reading) = self.readings.get(&candidate) {
                return Some((len, reading.as_str()));
            }
        }
        None
    }
}

impl Default for ReadingLexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrites logographic spans into phonetic segments.
pub struct ScriptSimplifier {
    lexicon: ReadingLexicon,
}

impl ScriptSimplifier {
    /// Create a simplifier over the given lexicon
    pub fn new(lexicon: ReadingLexicon) -> Self {
        Self { lexicon }
    }

    /// Convert every logographic span of `text` to its phonetic reading,
    /// separating consecutive converted units with `delimiter`.
    ///
    /// A logographic span with no lexicon coverage is a per-entry error; the
    /// caller keeps the original text and the batch continues.
    pub fn simplify(&self, text: &str, delimiter: &str) -> Result<String, EntryError> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        let mut prev_was_converted = false;

        while pos < chars.len() {
            if is_logographic(chars[pos]) {
                let Some((len, reading)) = self.lexicon.longest_match(&chars, pos) else {
                    return Err(EntryError::MissingReading {
                        span: unmatched_span(&chars, pos),
                    });
                };
                if prev_was_converted {
                    out.push_str(delimiter);
                }
                out.push_str(reading);
                pos += len;
                prev_was_converted = true;
            } else {
                out.push(chars[pos]);
                pos += 1;
                prev_was_converted = false;
            }
        }

        Ok(out)
    }
}

/// Whether a character belongs to a logographic script (CJK ideographs).
/// Kana, hangul, punctuation and Latin are phonetic or neutral and pass
/// through the simplifier untouched.
pub fn is_logographic(c: char) -> bool {
    matches!(
        c as u32,
        0x3400..=0x4DBF   // CJK extension A
        | 0x4E00..=0x9FFF // CJK unified ideographs
        | 0xF900..=0xFAFF // CJK compatibility ideographs
    )
}

/// The run of logographic characters starting at `pos`, for error reporting
fn unmatched_span(chars: &[char], pos: usize) -> String {
    chars[pos..]
        .iter()
        .take_while(|c| is_logographic(**c))
        .collect()
}
