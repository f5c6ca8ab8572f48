/*!
 * Localization pipeline over one resource file.
 *
 * The pipeline is a linear state machine with no backward transitions:
 *
 * `Loaded -> Translating -> Simplifying -> Formatting -> Written`
 *
 * Each stage attempts every entry; per-entry failures are collected into the
 * run report instead of aborting the batch, and the terminal state is only
 * reached once the terminology dictionary has been persisted.
 */

pub mod orchestrator;

pub use self::orchestrator::Orchestrator;

use std::fmt;
use std::path::PathBuf;

use crate::dictionary::TermConflict;
use crate::errors::EntryError;

/// Stages of the localization pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Resource mapping read and validated
    Loaded,
    /// Entries being resolved through dictionary and provider
    Translating,
    /// Logographic spans being rewritten to phonetic script
    Simplifying,
    /// Line-break escapes being inserted
    Formatting,
    /// Output written and dictionary persisted
    Written,
}

impl PipelineStage {
    /// The stage after this one; `Written` is terminal
    pub fn next(self) -> Self {
        match self {
            Self::Loaded => Self::Translating,
            Self::Translating => Self::Simplifying,
            Self::Simplifying => Self::Formatting,
            Self::Formatting | Self::Written => Self::Written,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loaded => "loaded",
            Self::Translating => "translating",
            Self::Simplifying => "simplifying",
            Self::Formatting => "formatting",
            Self::Written => "written",
        };
        write!(f, "{}", name)
    }
}

/// One entry that failed in one stage. The entry keeps its best text so far
/// in the output; it is reported, never dropped.
#[derive(Debug)]
pub struct EntryFailure {
    /// Resource key of the failing entry
    pub key: String,
    /// Stage the failure occurred in
    pub stage: PipelineStage,
    /// What went wrong
    pub error: EntryError,
}

/// Final report for one resource file's run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// The processed resource file
    pub file: PathBuf,
    /// Total entries in the mapping
    pub total_entries: usize,
    /// Entries resolved without a provider call
    pub from_dictionary: usize,
    /// Entries resolved by the provider
    pub translated: usize,
    /// Per-entry failures across all stages
    pub failures: Vec<EntryFailure>,
    /// Terminology conflicts observed during the run
    pub conflicts: Vec<TermConflict>,
    /// Whether the run was cancelled before attempting every entry
    pub cancelled: bool,
    /// Stage the pipeline ended in; `Written` means fully persisted
    pub final_stage: Option<PipelineStage>,
    /// Set when the dictionary could not be flushed; the rewritten output
    /// stands but terminology gains were lost for future runs
    pub persist_error: Option<String>,
}

impl PipelineReport {
    /// Whether every entry came through every stage cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled && self.persist_error.is_none()
    }

    /// Keys that failed in any stage, for the user-facing summary
    pub fn failed_keys(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.key.as_str()).collect()
    }
}
