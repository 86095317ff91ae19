/*!
 * Translation core for XLIFF locale files.
 *
 * This module contains the merge-and-translate machinery. It is split into
 * several submodules:
 *
 * - `masking`: Protection of literals and interpolation markers from the service
 * - `reconcile`: Alignment of a locale file's units with the canonical ids
 * - `policy`: Per-unit decision (skip, copy through, translate)
 * - `worker`: Translation of a single unit
 * - `scheduler`: Sequential, bounded or unbounded dispatch of unit work
 * - `stats`: Per-file and per-run counters
 * - `pipeline`: Processing of one locale file from read to write
 */

// Re-export main types for easier usage
pub use self::masking::{IgnoreRules, MaskMode, PlaceholderTable};
pub use self::pipeline::{FilePipeline, WriteMode};
pub use self::policy::{Decision, DecisionPolicy, PolicyFlags};
pub use self::reconcile::{Reconciliation, reconcile};
pub use self::scheduler::{ConcurrencyMode, UnitScheduler};
pub use self::stats::{FileReport, RunReport, RunStats, UnitOutcome};
pub use self::worker::{TargetLocale, UnitWorker};

// Submodules
pub mod masking;
pub mod pipeline;
pub mod policy;
pub mod reconcile;
pub mod scheduler;
pub mod stats;
pub mod worker;
