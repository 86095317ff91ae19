use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::locale::{FileMatch, LocaleFileMatcher, RegionalOverrides};
use crate::providers::Translator;
use crate::translation::{DecisionPolicy, FilePipeline, RunReport, UnitScheduler, UnitWorker};
use crate::xliff::XliffDocument;

// @module: Application controller for locale directory processing

/// Default file name prefix for files created by `init`
pub const DEFAULT_INIT_PREFIX: &str = "messages.";

/// Main application controller for XLIFF translation
pub struct Controller<T: Translator> {
    // @field: App configuration
    config: Config,
    // @field: Unit worker shared by every file of a run
    worker: UnitWorker<T>,
    // @field: Unit scheduler shared by every file of a run
    scheduler: UnitScheduler,
    overrides: RegionalOverrides,
}

impl<T: Translator> Controller<T> {
    // @method: Create a new controller with the given configuration and translation service
    pub fn with_config(config: Config, translator: T) -> Result<Self> {
        let rules = config.ignore_rules()?;
        let worker = UnitWorker::new(
            translator,
            DecisionPolicy::new(config.policy_flags()),
            rules,
            config.translation.call_timeout(),
        );
        let scheduler = config.scheduler();
        let overrides = config.regional_overrides();

        Ok(Self {
            config,
            worker,
            scheduler,
            overrides,
        })
    }

    pub fn translator(&self) -> &T {
        self.worker.translator()
    }

    /// Process every locale file in the configured directory
    ///
    /// Only a directory that cannot be listed or a canonical source that cannot
    /// be loaded fails the run; problems with single files are logged and counted.
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = std::time::Instant::now();
        let i18n_path = &self.config.i18n_path;

        let files = FileManager::list_files(i18n_path)
            .with_context(|| format!("Failed to list locale directory: {:?}", i18n_path))?;

        let source_path = self.config.source_path();
        let canonical = match &source_path {
            Some(path) => Some(Self::load_canonical(path)?),
            None => None,
        };

        info!(
            "Translating {} file(s) in {:?} with {} ({} mode)",
            files.len(),
            i18n_path,
            self.worker.translator().name(),
            self.scheduler.mode()
        );

        let matcher = LocaleFileMatcher::new(self.config.file_prefix.clone());
        let show_progress = !matches!(
            self.config.effective_log_level().to_level_filter(),
            log::LevelFilter::Debug | log::LevelFilter::Trace
        );
        let pipeline = FilePipeline::new(
            &self.worker,
            &self.scheduler,
            &self.overrides,
            self.config.write_mode,
        )
        .with_progress(show_progress);

        let mut report = RunReport::default();

        for path in &files {
            let Some(file_name) = FileManager::file_name(path) else {
                continue;
            };

            if source_path.as_deref().is_some_and(|source| is_same_file(source, path)) {
                debug!("Skipping canonical source file {}", file_name);
                continue;
            }

            let locale = match matcher.classify(&file_name) {
                Ok(FileMatch::Locale(locale)) => locale,
                Ok(FileMatch::PrefixMismatch) => {
                    debug!("Skipping {}: name does not match the configured prefix", file_name);
                    report.files_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file_name, e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            debug!(
                "Processing {} ({})",
                file_name,
                locale.language_name().unwrap_or(locale.locale.as_str())
            );

            match pipeline.process_file(path, &locale, canonical.as_ref()).await {
                Ok(file_report) => {
                    debug!("Finished {}: {}", file_name, file_report.stats);
                    report.add_file(&file_report);
                }
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    report.files_failed += 1;
                }
            }
        }

        info!("Run completed in {}", Self::format_duration(start_time.elapsed()));

        Ok(report)
    }

    fn load_canonical(path: &Path) -> Result<XliffDocument> {
        let content = FileManager::read_to_string(path)
            .with_context(|| format!("Failed to load canonical source file: {:?}", path))?;
        XliffDocument::parse(&content)
            .with_context(|| format!("Failed to parse canonical source file: {:?}", path))
    }

    /// Create locale files from the canonical source for each listed language
    ///
    /// Files are named `{prefix}{lang}.{ext}` in the i18n directory. Existing
    /// files are kept unless `force` is set. Returns the files written.
    pub fn init_locales(&self, languages: &str, force: bool) -> Result<Vec<PathBuf>> {
        let source = self
            .config
            .source_path()
            .ok_or_else(|| anyhow!("A source file is required to create locale files"))?;

        if !FileManager::file_exists(&source) {
            return Err(anyhow!("Source file does not exist: {:?}", source));
        }

        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_else(|| "xlf".to_string());
        let prefix = self.config.file_prefix.as_deref().unwrap_or(DEFAULT_INIT_PREFIX);

        let mut created = Vec::new();
        for lang in parse_languages(languages) {
            let destination = self
                .config
                .i18n_path
                .join(format!("{}{}.{}", prefix, lang, extension));

            if FileManager::file_exists(&destination) && !force {
                info!("Keeping existing {:?} (use --force to overwrite)", destination);
                continue;
            }

            FileManager::copy_file(&source, &destination)?;
            info!("Created {:?}", destination);
            created.push(destination);
        }

        Ok(created)
    }

    // @returns: Human readable duration
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Split a comma and/or space separated language list
pub fn parse_languages(languages: &str) -> Vec<String> {
    languages
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
