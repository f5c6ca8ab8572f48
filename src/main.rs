// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::atomic::Ordering;

use crate::app_config::{Config, LogLevel, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod dictionary;
mod errors;
mod file_utils;
mod formatting;
mod language_utils;
mod pack_versioner;
mod pipeline;
mod providers;
mod rate_limiter;
mod simplifier;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Localize resource files and rebuild the pack (default command)
    #[command(alias = "run")]
    Localize(LocalizeArgs),

    /// Generate shell completions for langpack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct LocalizeArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code (e.g., 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Minimum seconds between translation calls
    #[arg(short, long)]
    interval: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Only test the provider connection, without localizing anything
    #[arg(long)]
    check_connection: bool,
}

/// langpack - game content pack localizer
///
/// Localizes a content pack's language resource files by translating them,
/// enforcing consistent terminology, simplifying logographic script and
/// inserting line breaks, then stamps the rebuilt pack with a new version.
#[derive(Parser, Debug)]
#[command(name = "langpack")]
#[command(version = "0.1.0")]
#[command(about = "Content pack localization pipeline")]
#[command(long_about = "langpack scans a mods directory for source-language resource files, localizes
every entry through a translation provider, and merges the results into a
resource pack, reusing a persistent terminology dictionary so the same term
always renders the same way.

EXAMPLES:
    langpack                                # Localize using default config
    langpack -p ollama -m llama3.2          # Use a local provider and model
    langpack -i 10                          # Space translation calls by 10s
    langpack --check-connection             # Verify the provider is reachable
    langpack completions bash > langpack.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, defaults are used.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    localize: LocalizeArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

async fn run_localize(args: LocalizeArgs) -> Result<()> {
    let mut config = Config::load(&args.config_path)?;

    // CLI flags override the configuration file
    if let Some(provider) = args.provider {
        config.translation.provider = provider.into();
    }
    if let Some(model) = args.model {
        config.translation.model = model;
    }
    if let Some(target) = args.target_language {
        config.target_language = target;
    }
    if let Some(interval) = args.interval {
        config.translation.interval_secs = interval;
    }
    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(level_filter(&config.log_level));

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let controller = Controller::with_config(config)?;

    if args.check_connection {
        controller.test_connection().await?;
        return Ok(());
    }

    // Ctrl-C abandons the run after the entry in flight completes
    let cancel = controller.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current entry...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let summary = controller.run().await?;

    if !summary.is_clean() {
        info!("Run finished with warnings; see the report above");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "langpack", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Localize(args)) => run_localize(args).await.inspect_err(|e| {
            error!("{}", e);
        }),
        None => run_localize(cli.localize).await.inspect_err(|e| {
            error!("{}", e);
        }),
    }
}
