/*!
 * Placeholder masking for non-translatable fragments.
 *
 * Protected literals are swapped for opaque tokens before text goes to the
 * translation service and swapped back afterwards. Token `i` is `<` followed by
 * `i + 1` underscores and `>`, so no token is a substring of another.
 *
 * Literals must not themselves contain token-like text (`<_>`, `<__>`, ...);
 * collisions are not detected.
 */

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Default marker Angular emits for template interpolations
pub const INTERPOLATION_MARKER: &str = r#"<x id="INTERPOLATION"/>"#;

/// How many occurrences of each protected literal are replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    /// Only the first occurrence of each literal (legacy behavior)
    #[default]
    FirstOccurrence,
    /// Every occurrence of each literal
    AllOccurrences,
}

/// Placeholder token for a table index
pub fn placeholder_token(index: usize) -> String {
    format!("<{}>", "_".repeat(index + 1))
}

/// A placeholder token as an HTML-mode service may return it
static ESCAPED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;(_+)&gt;").expect("Invalid escaped token regex"));

/// Turn placeholder tokens escaped by an HTML-mode service (`&lt;_&gt;`) back into tokens
pub fn unescape_tokens(text: &str) -> Cow<'_, str> {
    ESCAPED_TOKEN.replace_all(text, "<$1>")
}

/// True when nothing translatable remains once placeholder syntax is stripped
pub fn is_placeholder_only(masked: &str) -> bool {
    masked
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '_'))
        .collect::<String>()
        .trim()
        .is_empty()
}

/// Ordered literal/token pairs used for one mask and unmask round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: Vec<(String, String)>,
    mode: MaskMode,
}

impl PlaceholderTable {
    /// Build a table, assigning tokens by position; empty literals are dropped
    pub fn new<I, S>(literals: I, mode: MaskMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = literals
            .into_iter()
            .map(Into::into)
            .filter(|literal: &String| !literal.is_empty())
            .enumerate()
            .map(|(idx, literal)| (literal, placeholder_token(idx)))
            .collect();
        Self { entries, mode }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace protected literals with their tokens
    pub fn mask(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (literal, token)| {
                self.substitute(&acc, literal, token)
            })
    }

    /// Restore protected literals from their tokens
    pub fn unmask(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (literal, token)| {
                self.substitute(&acc, token, literal)
            })
    }

    fn substitute(&self, text: &str, from: &str, to: &str) -> String {
        match self.mode {
            MaskMode::FirstOccurrence => text.replacen(from, to, 1),
            MaskMode::AllOccurrences => text.replace(from, to),
        }
    }
}

/// Configured protection rules, expanded into a [`PlaceholderTable`] per text
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    literals: Vec<String>,
    patterns: Vec<Regex>,
    marker: String,
    mode: MaskMode,
}

impl IgnoreRules {
    /// Split `ignore_text` on `delimiter` and compile the pattern table
    pub fn new(
        ignore_text: &str,
        delimiter: &str,
        patterns: &[String],
        marker: &str,
        mode: MaskMode,
    ) -> Result<Self, regex::Error> {
        let literals = if ignore_text.is_empty() || delimiter.is_empty() {
            vec![ignore_text.to_string()]
        } else {
            ignore_text.split(delimiter).map(str::to_string).collect()
        };

        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            literals: literals.into_iter().filter(|l| !l.is_empty()).collect(),
            patterns,
            marker: marker.to_string(),
            mode,
        })
    }

    /// Rules protecting only the interpolation marker
    pub fn with_marker(marker: &str) -> Self {
        Self {
            literals: Vec::new(),
            patterns: Vec::new(),
            marker: marker.to_string(),
            mode: MaskMode::default(),
        }
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Table for one text: ignore literals, then pattern matches found in the
    /// text, then the interpolation marker
    pub fn table_for(&self, text: &str) -> PlaceholderTable {
        let mut literals = self.literals.clone();

        for pattern in &self.patterns {
            for found in pattern.find_iter(text) {
                let found = found.as_str().to_string();
                let duplicate = literals.contains(&found) || found == self.marker;
                if self.mode == MaskMode::AllOccurrences && duplicate {
                    continue;
                }
                literals.push(found);
            }
        }

        literals.push(self.marker.clone());
        PlaceholderTable::new(literals, self.mode)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::with_marker(INTERPOLATION_MARKER)
    }
}
