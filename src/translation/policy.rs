/*!
 * Per-unit translation decision.
 *
 * Rules are evaluated in order and the first match wins:
 * 1. already translated (unless re-translation is forced)
 * 2. key-like source (underscore outside inline tags, or already all lowercase)
 * 3. nothing but placeholders once masked: copy the source through
 * 4. empty target with a source: translate
 * 5. `skip_different` and source differs from target: skip
 * 6. translate
 */

use regex::Regex;
use std::sync::LazyLock;

use crate::xliff::{TargetState, TranslationUnit};

use super::masking::{PlaceholderTable, is_placeholder_only};

/// Flags steering the decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyFlags {
    pub skip_different: bool,
    pub re_translate_existing: bool,
    /// Also treat a `state="translated"` on `<source>` as done
    pub strict_state: bool,
}

/// What to do with a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    SkipAlreadyTranslated,
    SkipKeyLikeSource,
    SkipDifferFlag,
    /// Copy the trimmed source into the target without calling the service
    PassThrough(String),
    /// Send the masked text to the service
    Translate { masked: String },
}

/// Inline markup such as `<x id="INTERPOLATION_1"/>` or `<g id="START_BOLD_TEXT">`
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("Invalid inline tag regex"));

/// Whether a source string looks like an identifier rather than prose
///
/// Underscores inside inline tags (Angular's placeholder ids) do not count.
pub fn is_key_like(source: &str) -> bool {
    INLINE_TAG.replace_all(source, "").contains('_') || source.to_lowercase() == source
}

/// The decision policy for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionPolicy {
    flags: PolicyFlags,
}

impl DecisionPolicy {
    pub fn new(flags: PolicyFlags) -> Self {
        Self { flags }
    }

    /// Decide how to handle `unit`, masking its source with `table`
    pub fn decide(&self, unit: &TranslationUnit, table: &PlaceholderTable) -> Decision {
        if !self.flags.re_translate_existing && self.is_translated(unit) {
            return Decision::SkipAlreadyTranslated;
        }

        if is_key_like(&unit.source_text) {
            return Decision::SkipKeyLikeSource;
        }

        let masked = table.mask(&unit.source_text).trim().to_string();
        if is_placeholder_only(&masked) {
            return Decision::PassThrough(unit.source_text.trim().to_string());
        }

        if unit.target_text.trim().is_empty() {
            return Decision::Translate { masked };
        }

        if self.flags.skip_different && unit.source_text != unit.target_text {
            return Decision::SkipDifferFlag;
        }

        Decision::Translate { masked }
    }

    fn is_translated(&self, unit: &TranslationUnit) -> bool {
        unit.target_state == TargetState::Translated
            || (self.flags.strict_state && unit.source_state == TargetState::Translated)
    }
}
