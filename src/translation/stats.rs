/*!
 * Run statistics.
 *
 * Counters are accumulated per file by the pipeline and merged by the
 * directory driver; nothing here is process-global.
 */

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::errors::TranslationError;

/// Terminal state of one unit
#[derive(Debug)]
pub enum UnitOutcome {
    Translated,
    PassedThrough,
    SkippedAlreadyTranslated,
    SkippedKeyLike,
    SkippedDifferFlag,
    Failed(TranslationError),
}

impl UnitOutcome {
    /// Whether the unit snapshot may differ from the document
    pub fn mutates(&self) -> bool {
        matches!(self, Self::Translated | Self::PassedThrough)
    }
}

/// Counters for one file or one whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub translated: usize,
    pub skipped_flag: usize,
    pub skipped_translated: usize,
    pub skipped_key_like: usize,
    pub passed_through: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one unit outcome
    pub fn record(&mut self, outcome: &UnitOutcome) {
        match outcome {
            UnitOutcome::Translated => self.translated += 1,
            UnitOutcome::PassedThrough => self.passed_through += 1,
            UnitOutcome::SkippedAlreadyTranslated => self.skipped_translated += 1,
            UnitOutcome::SkippedKeyLike => self.skipped_key_like += 1,
            UnitOutcome::SkippedDifferFlag => self.skipped_flag += 1,
            UnitOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &RunStats) {
        self.translated += other.translated;
        self.skipped_flag += other.skipped_flag;
        self.skipped_translated += other.skipped_translated;
        self.skipped_key_like += other.skipped_key_like;
        self.passed_through += other.passed_through;
        self.failed += other.failed;
    }

    /// Number of units that reached a terminal state
    pub fn total(&self) -> usize {
        self.translated
            + self.skipped_flag
            + self.skipped_translated
            + self.skipped_key_like
            + self.passed_through
            + self.failed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Translated: {}, Skipped (flag): {}, Skipped (already translated): {}, \
             Skipped (key-like source): {}, Copied untranslated: {}, Failed: {}",
            self.translated,
            self.skipped_flag,
            self.skipped_translated,
            self.skipped_key_like,
            self.passed_through,
            self.failed
        )
    }
}

/// Result of processing one locale file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub locale: String,
    /// Units removed because the canonical source no longer has them
    pub removed: usize,
    /// Units appended from the canonical source
    pub appended: usize,
    pub stats: RunStats,
}

/// Result of a whole directory run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub stats: RunStats,
}

impl RunReport {
    pub fn add_file(&mut self, report: &FileReport) {
        self.files_processed += 1;
        self.stats.merge(&report.stats);
    }

    /// Multi-line end of run summary
    pub fn summary(&self) -> String {
        format!(
            "Run Summary:\n\
             Files processed: {}\n\
             Files skipped: {}\n\
             Files failed: {}\n\
             {}",
            self.files_processed, self.files_skipped, self.files_failed, self.stats
        )
    }

    /// Print the summary to `out`, independent of the log level
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.summary())?;
        out.flush()
    }
}
