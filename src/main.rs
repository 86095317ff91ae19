// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use xlifftranslate::app_config::{self, Config, DEFAULT_CONFIG_FILE};
use xlifftranslate::app_controller::Controller;
use xlifftranslate::providers::google::GoogleTranslate;
use xlifftranslate::translation::{ConcurrencyMode, WriteMode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ConcurrencyMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliConcurrency {
    Sequential,
    Bounded,
    Unbounded,
}

impl From<CliConcurrency> for ConcurrencyMode {
    fn from(cli_mode: CliConcurrency) -> Self {
        match cli_mode {
            CliConcurrency::Sequential => ConcurrencyMode::Sequential,
            CliConcurrency::Bounded => ConcurrencyMode::Bounded,
            CliConcurrency::Unbounded => ConcurrencyMode::Unbounded,
        }
    }
}

/// CLI Wrapper for WriteMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliWriteMode {
    PerUnit,
    OnceAtEnd,
}

impl From<CliWriteMode> for WriteMode {
    fn from(cli_mode: CliWriteMode) -> Self {
        match cli_mode {
            CliWriteMode::PerUnit => WriteMode::PerUnit,
            CliWriteMode::OnceAtEnd => WriteMode::OnceAtEnd,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile and translate every locale file (default command)
    #[command(alias = "translate")]
    Sync,

    /// Create locale files from the source file
    Init {
        /// Languages to create, separated by commas or spaces (e.g. "es, en, de, fr")
        #[arg(short = 'L', long)]
        languages: String,

        /// Overwrite existing locale files
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for xlifftranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every subcommand; each one overrides the config file
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Directory holding the locale files
    #[arg(short, long = "i18n-path", alias = "i18nPath", global = true)]
    i18n_path: Option<PathBuf>,

    /// Canonical source file; without it every file is its own source
    #[arg(short, long = "source-file", alias = "sourceFile", global = true)]
    source_file: Option<PathBuf>,

    /// Only process files starting with this prefix (e.g. "messages.")
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Literals to keep untranslated, joined by the ignore delimiter
    #[arg(long = "ignore-text", alias = "ignoreText", global = true)]
    ignore_text: Option<String>,

    /// Delimiter between ignore literals
    #[arg(long = "ignore-delimiter", alias = "ignoreDelimiter", global = true)]
    ignore_delimiter: Option<String>,

    /// Leave units whose target already differs from the source
    #[arg(long = "skip-different", alias = "skipDifferent", global = true)]
    skip_different: bool,

    /// Translate units again even when already marked translated
    #[arg(long = "re-translate-existing", alias = "reTranslateExisting", global = true)]
    re_translate_existing: bool,

    /// Print every translated unit
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How units of one file are scheduled
    #[arg(long, value_enum, global = true)]
    concurrency: Option<CliConcurrency>,

    /// When locale files are written back
    #[arg(long = "write-mode", value_enum, global = true)]
    write_mode: Option<CliWriteMode>,

    /// Google Cloud Translation API key
    #[arg(
        long = "api-key",
        env = "GOOGLE_TRANSLATE_API_KEY",
        hide_env_values = true,
        global = true
    )]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = DEFAULT_CONFIG_FILE, global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// xlifftranslate - XLIFF locale file merge and translation
///
/// Keeps every locale file in a directory in step with the source file and
/// machine-translates the units that have no translation yet.
#[derive(Parser, Debug)]
#[command(name = "xlifftranslate")]
#[command(version)]
#[command(about = "Merge and machine-translate XLIFF locale files")]
#[command(long_about = "xlifftranslate reconciles XLIFF locale files with their source and fills in missing translations.

EXAMPLES:
    xlifftranslate -i src/i18n                              # Translate every locale file in place
    xlifftranslate -i src/i18n -s source.xlf               # Merge against source.xlf first
    xlifftranslate --ignoreText 'Acme ACME' --skipDifferent  # Keep brand names, skip edited targets
    xlifftranslate -s source.xlf init -L 'es, de, fr'      # Create messages.{es,de,fr}.xlf
    xlifftranslate completions bash > xlifftranslate.bash  # Generate bash completions

CONFIGURATION:
    Settings are read from xlifftranslate.json by default; command line flags win.
    The API key may also be set through GOOGLE_TRANSLATE_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
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
        // The logger accepts everything; log::set_max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
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

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "xlifftranslate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Init { languages, force }) => run_init(cli.run, &languages, force),
        Some(Commands::Sync) | None => run_sync(cli.run).await,
    }
}

/// Load the config file and apply command line overrides
fn load_config(options: &RunArgs) -> Result<Config> {
    let mut config = Config::load(&options.config_path)?;

    if let Some(i18n_path) = &options.i18n_path {
        config.i18n_path = i18n_path.clone();
    }
    if let Some(source_file) = &options.source_file {
        config.source_file = Some(source_file.clone());
    }
    if let Some(prefix) = &options.prefix {
        config.file_prefix = Some(prefix.clone());
    }
    if let Some(ignore_text) = &options.ignore_text {
        config.ignore_text = ignore_text.clone();
    }
    if let Some(delimiter) = &options.ignore_delimiter {
        config.ignore_delimiter = delimiter.clone();
    }
    config.skip_different |= options.skip_different;
    config.re_translate_existing |= options.re_translate_existing;
    config.verbose |= options.verbose;
    if let Some(mode) = &options.concurrency {
        config.concurrency.mode = mode.clone().into();
    }
    if let Some(write_mode) = &options.write_mode {
        config.write_mode = write_mode.clone().into();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.effective_log_level().to_level_filter());

    Ok(config)
}

fn build_controller(config: Config) -> Result<Controller<GoogleTranslate>> {
    let translator = GoogleTranslate::new_with_config(
        config.translation.api_key.clone(),
        config.translation.endpoint.clone(),
        config.translation.timeout_secs,
        config.translation.format.clone(),
        config.translation.source_language.clone(),
    );
    Controller::with_config(config, translator)
}

async fn run_sync(options: RunArgs) -> Result<()> {
    let config = load_config(&options)?;
    config.validate().context("Configuration validation failed")?;

    let controller = build_controller(config)?;
    let report = controller.run().await?;

    report
        .write_summary(&mut std::io::stdout())
        .context("Failed to print run summary")?;
    Ok(())
}

fn run_init(options: RunArgs, languages: &str, force: bool) -> Result<()> {
    let config = load_config(&options)?;
    let controller = build_controller(config)?;

    let created = controller.init_locales(languages, force)?;
    info!("Created {} locale file(s)", created.len());
    Ok(())
}
