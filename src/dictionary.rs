/*!
 * Cross-run terminology dictionary.
 *
 * The dictionary is the single source of truth for how a source term renders
 * in the target language. It is loaded at pipeline start, consulted before
 * every translation call, updated the moment a paid-for translation lands,
 * and merged back into its backing store at pipeline end. No stage may cache
 * a translation decision that bypasses it.
 */

use indexmap::IndexMap;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::errors::DictionaryError;
use crate::file_utils::{self, FileManager};

/// A recorded disagreement between an incoming rendering and the stored
/// canonical one. Non-fatal; surfaced in the run report for human review.
#[derive(Debug, Clone, PartialEq)]
pub struct TermConflict {
    /// The source term both renderings were proposed for
    pub term: String,
    /// The canonical rendering that was kept
    pub kept: String,
    /// The incoming rendering that was rejected
    pub rejected: String,
}

/// Persisted mapping of source term to canonical target rendering.
pub struct TermDictionary {
    /// Canonical renderings, in first-seen order
    terms: IndexMap<String, String>,

    /// Conflicts observed during this run
    conflicts: Vec<TermConflict>,

    /// Backing store, when loaded from disk
    path: Option<PathBuf>,
}

impl TermDictionary {
    /// Create an empty in-memory dictionary with no backing store
    pub fn in_memory() -> Self {
        Self {
            terms: IndexMap::new(),
            conflicts: Vec::new(),
            path: None,
        }
    }

    /// Build an in-memory dictionary from existing pairs (test fixtures,
    /// curated seeds)
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut dict = Self::in_memory();
        for (term, rendering) in pairs {
            dict.record(&term.into(), &rendering.into());
        }
        dict
    }

    /// Load the dictionary from its backing file. A missing file yields an
    /// empty dictionary bound to that path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let terms = if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)
                .map_err(|e| DictionaryError::Load(e.to_string()))?;
            file_utils::parse_lang_map(&content)
                .map_err(|e| DictionaryError::Load(format!("{:?}: {}", path, e)))?
        } else {
            debug!("No dictionary at {:?}, starting empty", path);
            IndexMap::new()
        };

        Ok(Self {
            terms,
            conflicts: Vec::new(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Number of known terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary holds no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Conflicts observed so far in this run
    pub fn conflicts(&self) -> &[TermConflict] {
        &self.conflicts
    }

    /// Look up the canonical rendering for a term. Pure read.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.terms.get(normalize_term(term)).map(String::as_str)
    }

    /// Record a source term's rendering. First-seen-wins: an incoming
    /// rendering that disagrees with the stored one is rejected and logged
    /// as a conflict event. Returns whether the pair was inserted.
    pub fn record(&mut self, term: &str, rendering: &str) -> bool {
        let term = normalize_term(term);
        if term.is_empty() {
            return false;
        }

        match self.terms.get(term) {
            None => {
                self.terms.insert(term.to_string(), rendering.to_string());
                true
            }
            Some(existing) if existing == rendering => false,
            Some(existing) => {
                warn!(
                    "Dictionary conflict for '{}': keeping '{}', rejecting '{}'",
                    term, existing, rendering
                );
                self.conflicts.push(TermConflict {
                    term: term.to_string(),
                    kept: existing.clone(),
                    rejected: rendering.to_string(),
                });
                false
            }
        }
    }

    /// Rewrite every occurrence of a known term inside `text` with its
    /// canonical rendering. Longest terms substitute first so a short term
    /// never clobbers part of a longer one.
    pub fn apply(&self, text: &str) -> String {
        if self.terms.is_empty() {
            return text.to_string();
        }

        let mut ordered: Vec<(&str, &str)> = self
            .terms
            .iter()
            .filter(|(term, rendering)| term.as_str() != rendering.as_str())
            .map(|(term, rendering)| (term.as_str(), rendering.as_str()))
            .collect();
        ordered.sort_by_key(|(term, _)| std::cmp::Reverse(term.len()));

        let mut result = text.to_string();
        for (term, rendering) in ordered {
            if result.contains(term) {
                result = result.replace(term, rendering);
            }
        }
        result
    }

    /// Flush the dictionary to its backing store, merging with the current
    /// file contents per term: the on-disk value wins for terms present in
    /// both (curated edits survive), and terms added externally since the
    /// run began are never dropped.
    pub fn persist(&self) -> Result<(), DictionaryError> {
        // An in-memory dictionary (tests, dry runs) has nothing to flush
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut merged = if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)
                .map_err(|e| DictionaryError::Persist(e.to_string()))?;
            file_utils::parse_lang_map(&content)
                .map_err(|e| DictionaryError::Persist(format!("{:?}: {}", path, e)))?
        } else {
            IndexMap::new()
        };

        for (term, rendering) in &self.terms {
            merged
                .entry(term.clone())
                .or_insert_with(|| rendering.clone());
        }

        file_utils::save_lang_map(path, &merged)
            .map_err(|e| DictionaryError::Persist(e.to_string()))?;
        debug!("Persisted {} dictionary terms to {:?}", merged.len(), path);
        Ok(())
    }

    /// Iterate the known pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Exact matching on the trimmed source string. No substring matching of
/// keys, which would accidentally unify unrelated short phrases.
fn normalize_term(term: &str) -> &str {
    term.trim()
}
