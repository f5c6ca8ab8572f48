use anyhow::Result;
use indexmap::IndexMap;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::app_config::Config;
use crate::dictionary::TermDictionary;
use crate::errors::AppError;
use crate::file_utils::{self, FileManager};
use crate::formatting::{BreakFormatter, BreakRules};
use crate::pack_versioner::{self, PackVersion};
use crate::pipeline::{Orchestrator, PipelineReport};
use crate::rate_limiter::RateLimiter;
use crate::simplifier::{ReadingLexicon, ScriptSimplifier};
use crate::translation::TranslationService;

// @module: Application controller for resource pack localization

/// Resource pack format the output declares (pack.mcmeta)
const PACK_FORMAT: u32 = 48;

/// Namespace the merged target-language file is written under
const PACK_NAMESPACE: &str = "minecraft";

/// Summary of one localization run across the whole mods directory
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-file pipeline reports, in processing order
    pub reports: Vec<PipelineReport>,
    /// Files that failed before the pipeline could run (e.g. malformed)
    pub file_errors: Vec<(PathBuf, String)>,
    /// Keys carried over from the existing pack without re-translation
    pub reused_entries: usize,
    /// The merged target-language file that was written
    pub pack_file: Option<PathBuf>,
    /// Version produced for this packaging run
    pub version: Option<PackVersion>,
    /// Artifact name (version suffix applied) for the external packager
    pub artifact_name: Option<String>,
}

impl RunSummary {
    /// Whether every processed file came through cleanly
    pub fn is_clean(&self) -> bool {
        self.file_errors.is_empty() && self.reports.iter().all(|r| r.is_clean())
    }
}

/// Main application controller for pack localization
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Cooperative cancellation flag shared with the pipeline
    cancel: Arc<AtomicBool>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Handle for aborting the run after the entry in flight completes
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Verify that the configured provider is reachable, without running
    /// the pipeline
    pub async fn test_connection(&self) -> Result<(), AppError> {
        let dictionary = Arc::new(RwLock::new(TermDictionary::in_memory()));
        let limiter = Arc::new(RateLimiter::from_secs(0));
        let service = TranslationService::from_config(
            &self.config.translation,
            &self.config.source_language,
            &self.config.target_language,
            dictionary,
            limiter,
        );
        service.test_connection().await?;
        info!("Provider '{}' is reachable", service.provider_name());
        Ok(())
    }

    /// Run the localization workflow over the configured mods directory and
    /// merge the results into the resource pack.
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        self.config.validate()?;

        let paths = &self.config.paths;
        let dictionary = Arc::new(RwLock::new(TermDictionary::load(&paths.dictionary_file)?));
        let lexicon = ReadingLexicon::load(&paths.lexicon_file)?;
        let limiter = Arc::new(RateLimiter::from_secs(self.config.translation.interval_secs));

        let service = TranslationService::from_config(
            &self.config.translation,
            &self.config.source_language,
            &self.config.target_language,
            dictionary.clone(),
            limiter.clone(),
        );

        let formatter = self.config.formatting.insert_line_breaks.then(|| {
            BreakFormatter::new(BreakRules::for_language(
                &self.config.target_language,
                self.config.formatting.line_break.clone(),
            ))
        });

        let orchestrator = Orchestrator::new(
            service,
            ScriptSimplifier::new(lexicon),
            formatter,
            dictionary.clone(),
            limiter,
            self.config.formatting.delimiter.clone(),
            self.cancel.clone(),
        );

        self.run_with_orchestrator(&orchestrator).await
    }

    /// Drive an assembled orchestrator over every discovered resource file.
    /// Split out so tests can inject a mock-provider pipeline.
    pub async fn run_with_orchestrator(
        &self,
        orchestrator: &Orchestrator,
    ) -> Result<RunSummary, AppError> {
        let mut summary = RunSummary::default();

        let source_files =
            file_utils::find_lang_files(&self.config.paths.mods_dir, &self.config.source_resource_code)
                .map_err(|e| AppError::File(e.to_string()))?;
        if source_files.is_empty() {
            warn!(
                "No {}.json files found under {:?}",
                self.config.source_resource_code, self.config.paths.mods_dir
            );
        }

        let pack_file = self.pack_lang_file();
        let mut merged: IndexMap<String, String> = if FileManager::file_exists(&pack_file) {
            file_utils::load_lang_map(&pack_file)?
        } else {
            IndexMap::new()
        };

        let multi_progress = MultiProgress::new();
        let progress = multi_progress.add(ProgressBar::new(source_files.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        for source_file in &source_files {
            if self.cancel.load(std::sync::atomic::Ordering::SeqCst) {
                warn!("Run cancelled; stopping before {:?}", source_file);
                break;
            }
            progress.set_message(format!("{:?}", source_file.file_name().unwrap_or_default()));

            let entries = match file_utils::load_lang_map(source_file) {
                Ok(entries) => entries,
                Err(e) => {
                    // Malformed input is fatal for this file only
                    warn!("Skipping {:?}: {}", source_file, e);
                    summary.file_errors.push((source_file.clone(), e.to_string()));
                    progress.inc(1);
                    continue;
                }
            };

            // Entries the pack already localized are out of scope this run
            let before = entries.len();
            let pending: IndexMap<String, String> = entries
                .into_iter()
                .filter(|(key, _)| {
                    !merged.get(key).map(|v| !v.is_empty()).unwrap_or(false)
                })
                .collect();
            summary.reused_entries += before - pending.len();

            if pending.is_empty() {
                progress.inc(1);
                continue;
            }

            let (localized, mut report) = orchestrator.run_mapping(pending).await;
            report.file = source_file.clone();
            merged.extend(localized);
            summary.reports.push(report);
            progress.inc(1);
        }
        progress.finish_and_clear();

        file_utils::save_lang_map(&pack_file, &merged)
            .map_err(|e| AppError::File(e.to_string()))?;
        summary.pack_file = Some(pack_file);

        self.write_pack_metadata()?;
        self.stamp_version(&mut summary)?;

        self.log_summary(&summary);
        Ok(summary)
    }

    /// Location of the merged target-language file inside the pack
    fn pack_lang_file(&self) -> PathBuf {
        self.config
            .paths
            .resource_pack_dir
            .join("assets")
            .join(PACK_NAMESPACE)
            .join("lang")
            .join(format!("{}.json", self.config.target_resource_code))
    }

    /// Write pack.mcmeta when missing so the pack is loadable as-is
    fn write_pack_metadata(&self) -> Result<(), AppError> {
        let mcmeta = self.config.paths.resource_pack_dir.join("pack.mcmeta");
        if FileManager::file_exists(&mcmeta) {
            return Ok(());
        }
        let description = format!(
            "Adds {} translations generated by langpack.",
            crate::language_utils::get_language_name(&self.config.target_language)
                .unwrap_or_else(|_| self.config.target_language.clone())
        );
        let meta = serde_json::json!({
            "pack": {
                "pack_format": PACK_FORMAT,
                "description": description,
            }
        });
        let content = serde_json::to_string_pretty(&meta)
            .map_err(|e| AppError::File(e.to_string()))?;
        FileManager::write_to_file(&mcmeta, &content).map_err(|e| AppError::File(e.to_string()))
    }

    /// Derive the next pack version and the artifact name for the packager
    fn stamp_version(&self, summary: &mut RunSummary) -> Result<(), AppError> {
        let pack_dir = &self.config.paths.resource_pack_dir;
        let base_name = pack_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "pack".to_string());
        let artifacts_dir = pack_dir.parent().unwrap_or(pack_dir.as_path());

        let previous = pack_versioner::latest_version(artifacts_dir, &base_name)
            .map_err(|e| AppError::File(e.to_string()))?
            .max(
                pack_versioner::latest_version(pack_dir, &base_name)
                    .map_err(|e| AppError::File(e.to_string()))?,
            );
        let version = pack_versioner::next_version(previous);
        pack_versioner::record_version(pack_dir, version)
            .map_err(|e| AppError::File(e.to_string()))?;

        summary.artifact_name = Some(pack_versioner::versioned_name(&base_name, version));
        summary.version = Some(version);
        Ok(())
    }

    fn log_summary(&self, summary: &RunSummary) {
        let translated: usize = summary.reports.iter().map(|r| r.translated).sum();
        let from_dictionary: usize = summary.reports.iter().map(|r| r.from_dictionary).sum();
        let failed: usize = summary.reports.iter().map(|r| r.failures.len()).sum();
        let conflicts: usize = summary.reports.iter().map(|r| r.conflicts.len()).sum();

        info!(
            "Localized {} entries ({} from dictionary, {} reused from pack) across {} files",
            translated + from_dictionary,
            from_dictionary,
            summary.reused_entries,
            summary.reports.len()
        );
        if failed > 0 {
            warn!("{} entries failed and kept their previous text:", failed);
            for report in &summary.reports {
                for failure in &report.failures {
                    warn!("  {} [{}]: {}", failure.key, failure.stage, failure.error);
                }
            }
        }
        if conflicts > 0 {
            warn!("{} terminology conflicts recorded for review", conflicts);
        }
        for (file, error) in &summary.file_errors {
            warn!("File {:?} was skipped: {}", file, error);
        }
        if let Some(name) = &summary.artifact_name {
            info!("Artifact name for packaging: {}", name);
        }
    }
}
