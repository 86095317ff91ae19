/*!
 * Per-file pipeline.
 *
 * Reads one locale file, reconciles its units against the canonical id
 * sequence, translates every unit through the scheduler and writes the file
 * back. The pipeline owns the document for the whole call; workers only ever
 * see unit snapshots, and results are applied here one at a time.
 */

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::file_utils::FileManager;
use crate::locale::{LocaleFile, RegionalOverrides};
use crate::providers::Translator;
use crate::xliff::XliffDocument;

use super::reconcile;
use super::scheduler::UnitScheduler;
use super::stats::{FileReport, RunStats};
use super::worker::{TargetLocale, UnitWorker};

/// When the locale file is written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// After reconciliation and after every unit that changed
    #[default]
    PerUnit,
    /// Once, after every unit of the file is done
    OnceAtEnd,
}

impl std::str::FromStr for WriteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_unit" => Ok(Self::PerUnit),
            "once_at_end" | "once" => Ok(Self::OnceAtEnd),
            _ => Err(anyhow::anyhow!("Invalid write mode: {}", s)),
        }
    }
}

/// Processes locale files one at a time
pub struct FilePipeline<'a, T: Translator> {
    worker: &'a UnitWorker<T>,
    scheduler: &'a UnitScheduler,
    overrides: &'a RegionalOverrides,
    write_mode: WriteMode,
    show_progress: bool,
}

impl<'a, T: Translator> FilePipeline<'a, T> {
    pub fn new(
        worker: &'a UnitWorker<T>,
        scheduler: &'a UnitScheduler,
        overrides: &'a RegionalOverrides,
        write_mode: WriteMode,
    ) -> Self {
        Self {
            worker,
            scheduler,
            overrides,
            write_mode,
            show_progress: false,
        }
    }

    /// Show a progress bar per file
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Reconcile and translate the file at `path`, overwriting it
    ///
    /// With `canonical` set, unit ids come from that document and new units are
    /// copied from it; otherwise the file is its own canonical source.
    pub async fn process_file(
        &self,
        path: &Path,
        locale: &LocaleFile,
        canonical: Option<&XliffDocument>,
    ) -> Result<FileReport> {
        let content = FileManager::read_to_string(path)?;
        let mut document = XliffDocument::parse(&content)
            .with_context(|| format!("Failed to parse locale file: {:?}", path))?;

        let (removed, appended) = match canonical {
            Some(source) => {
                let plan = reconcile::reconcile(&source.unit_ids(), &document.units());
                reconcile::apply(&plan, &mut document, source)?
            }
            None => {
                let plan = reconcile::reconcile(&document.unit_ids(), &document.units());
                document.remove_units(&plan.remove);
                (plan.remove.len(), 0)
            }
        };
        if removed > 0 || appended > 0 {
            debug!("{:?}: removed {} stale units, appended {} new units", path, removed, appended);
        }

        document.set_target_language(&locale.locale)?;

        if self.write_mode == WriteMode::PerUnit {
            FileManager::write_to_file(path, &document.to_xml_string())?;
        }

        let target =
            TargetLocale::new(locale.locale.clone(), locale.service_language(self.overrides));
        let units = document.units();
        let progress = self.progress_bar(units.len() as u64, &locale.locale);

        let worker = self.worker;
        let target_ref = &target;
        let mut results = self.scheduler.run(units, move |mut unit| async move {
            let outcome = worker.process(&mut unit, target_ref).await;
            (unit, outcome)
        });

        let mut stats = RunStats::new();
        while let Some((unit, outcome)) = results.next().await {
            stats.record(&outcome);
            let changed = outcome.mutates() && document.apply_unit(&unit)?;
            if changed && self.write_mode == WriteMode::PerUnit {
                FileManager::write_to_file(path, &document.to_xml_string())?;
            }
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        if self.write_mode == WriteMode::OnceAtEnd {
            FileManager::write_to_file(path, &document.to_xml_string())?;
        }

        debug!("{:?}: {}", path, stats);

        Ok(FileReport {
            path: path.to_path_buf(),
            locale: locale.locale.clone(),
            removed,
            appended,
            stats,
        })
    }

    fn progress_bar(&self, len: u64, locale: &str) -> Option<ProgressBar> {
        if !self.show_progress || len == 0 {
            return None;
        }

        let bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("=>-"));
        bar.set_message(locale.to_string());
        Some(bar)
    }
}
