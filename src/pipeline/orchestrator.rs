/*!
 * Pipeline orchestrator: drives the rewriting stages over one resource file.
 */

use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dictionary::TermDictionary;
use crate::errors::AppError;
use crate::file_utils;
use crate::formatting::BreakFormatter;
use crate::pipeline::{EntryFailure, PipelineReport, PipelineStage};
use crate::rate_limiter::RateLimiter;
use crate::simplifier::ScriptSimplifier;
use crate::translation::{Resolution, TranslationService};

/// Composes the rewriting stages over every entry of a resource mapping.
///
/// Entries are processed one at a time in mapping insertion order: each
/// entry's dictionary lookup and record must complete before the next entry
/// begins, or terminology consistency falls apart. The rate limiter's
/// suspension is the only blocking point.
pub struct Orchestrator {
    service: TranslationService,
    simplifier: ScriptSimplifier,
    formatter: Option<BreakFormatter>,
    dictionary: Arc<RwLock<TermDictionary>>,
    limiter: Arc<RateLimiter>,
    delimiter: String,
    cancel: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Assemble an orchestrator from its stages. The dictionary and limiter
    /// are the shared handles also held by the translation service; `cancel`
    /// abandons the run after the entry in flight completes, leaving the
    /// dictionary reflecting exactly the entries processed so far.
    pub fn new(
        service: TranslationService,
        simplifier: ScriptSimplifier,
        formatter: Option<BreakFormatter>,
        dictionary: Arc<RwLock<TermDictionary>>,
        limiter: Arc<RateLimiter>,
        delimiter: impl Into<String>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            service,
            simplifier,
            formatter,
            dictionary,
            limiter,
            delimiter: delimiter.into(),
            cancel,
        }
    }

    /// Handle for cooperative cancellation, checked between entries
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run the full pipeline over one resource file, writing the rewritten
    /// mapping to `output_path`.
    ///
    /// Malformed input is fatal for the file and nothing is persisted for
    /// it. Per-entry failures keep the batch going and end up in the report.
    pub async fn run_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: P,
    ) -> Result<PipelineReport, AppError> {
        let input_path = input_path.as_ref();
        let entries = file_utils::load_lang_map(input_path)?;

        let (entries, mut report) = self.run_mapping(entries).await;
        report.file = input_path.to_path_buf();

        // The rewritten mapping stands even if the dictionary store failed
        file_utils::save_lang_map(output_path.as_ref(), &entries)
            .map_err(|e| AppError::File(e.to_string()))?;

        info!(
            "{:?}: {}/{} entries localized ({} from dictionary), {} failed",
            input_path,
            report.from_dictionary + report.translated,
            report.total_entries,
            report.from_dictionary,
            report.failures.len()
        );
        Ok(report)
    }

    /// Run the rewriting stages over an in-memory mapping, returning the
    /// rewritten entries and the report. The dictionary is persisted at the
    /// end so partial progress survives even when the caller's own write
    /// later fails.
    pub async fn run_mapping(
        &self,
        mut entries: IndexMap<String, String>,
    ) -> (IndexMap<String, String>, PipelineReport) {
        let mut report = PipelineReport {
            total_entries: entries.len(),
            ..PipelineReport::default()
        };
        let mut stage = PipelineStage::Loaded;
        debug!("{} entries {}", entries.len(), stage);

        // Translating: the batch anchor is established once per file
        stage = stage.next();
        self.limiter.start_batch().await;
        self.translate_entries(&mut entries, &mut report).await;

        // Simplifying
        stage = stage.next();
        self.simplify_entries(&mut entries, &mut report);

        // Formatting
        stage = stage.next();
        self.format_entries(&mut entries, &mut report);

        report.conflicts = self.dictionary.read().conflicts().to_vec();

        match self.dictionary.read().persist() {
            Ok(()) => {
                stage = stage.next();
            }
            Err(e) => {
                warn!("{}; terminology gains from this run were not saved", e);
                report.persist_error = Some(e.to_string());
            }
        }

        report.final_stage = Some(stage);
        (entries, report)
    }

    /// Resolve every entry's target text through dictionary and provider
    async fn translate_entries(
        &self,
        entries: &mut IndexMap<String, String>,
        report: &mut PipelineReport,
    ) {
        for (key, value) in entries.iter_mut() {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }
            if value.trim().is_empty() {
                continue;
            }

            match self.service.translate_entry(value).await {
                Ok(Resolution::FromDictionary(text)) => {
                    report.from_dictionary += 1;
                    *value = text;
                }
                Ok(Resolution::Translated(text)) => {
                    report.translated += 1;
                    *value = text;
                }
                Err(error) => {
                    // The entry keeps its source text; never dropped
                    report.failures.push(EntryFailure {
                        key: key.clone(),
                        stage: PipelineStage::Translating,
                        error,
                    });
                }
            }
        }
    }

    /// Rewrite logographic spans to phonetic script
    fn simplify_entries(
        &self,
        entries: &mut IndexMap<String, String>,
        report: &mut PipelineReport,
    ) {
        for (key, value) in entries.iter_mut() {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }

            match self.simplifier.simplify(value, &self.delimiter) {
                Ok(simplified) => *value = simplified,
                Err(error) => {
                    report.failures.push(EntryFailure {
                        key: key.clone(),
                        stage: PipelineStage::Simplifying,
                        error,
                    });
                }
            }
        }
    }

    /// Insert line-break escapes at sentence boundaries
    fn format_entries(
        &self,
        entries: &mut IndexMap<String, String>,
        report: &mut PipelineReport,
    ) {
        let Some(formatter) = &self.formatter else {
            return;
        };
        for (_, value) in entries.iter_mut() {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }
            *value = formatter.format_breaks(value);
        }
    }
}
