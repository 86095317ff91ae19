use isolang::Language;
use std::collections::BTreeMap;

use crate::errors::LocaleError;

/// Locale detection for per-language translation files
///
/// Locale files are named `name.locale.ext` (e.g. `messages.de.xlf`). A two part
/// name such as `fr.xlf` is accepted with the first part taken as the locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    /// Full locale code as found in the file name (e.g. `pt-BR`)
    pub locale: String,
    /// Base language code (e.g. `pt`)
    pub lang: String,
}

impl LocaleFile {
    /// Derive the locale and base language from a file name
    pub fn from_file_name(file_name: &str) -> Result<Self, LocaleError> {
        let parts: Vec<&str> = file_name.split('.').collect();

        let locale = match parts.len() {
            n if n >= 3 => parts[1],
            2 => parts[0],
            _ => return Err(LocaleError::UnrecognizedFileName(file_name.to_string())),
        };

        if locale.is_empty() {
            return Err(LocaleError::UnrecognizedFileName(file_name.to_string()));
        }

        Ok(Self {
            locale: locale.to_string(),
            lang: base_language(locale).to_string(),
        })
    }

    /// Language code to send to the translation service
    ///
    /// A regional override wins over the base language fallback.
    pub fn service_language(&self, overrides: &RegionalOverrides) -> String {
        overrides
            .resolve(&self.locale)
            .unwrap_or(&self.lang)
            .to_string()
    }

    /// English name of the base language, when it is a known ISO 639-1 code
    pub fn language_name(&self) -> Option<&'static str> {
        Language::from_639_1(&self.lang.to_lowercase()).map(|lang| lang.to_name())
    }
}

/// Truncate a locale at its first `-` or `_`
pub fn base_language(locale: &str) -> &str {
    match locale.find(['-', '_']) {
        Some(idx) => &locale[..idx],
        None => locale,
    }
}

/// Outcome of matching a file name against the accepted pattern
#[derive(Debug, PartialEq, Eq)]
pub enum FileMatch {
    /// File is a locale file
    Locale(LocaleFile),
    /// File does not start with the configured prefix
    PrefixMismatch,
}

/// Filename filter applied during a directory scan
#[derive(Debug, Clone, Default)]
pub struct LocaleFileMatcher {
    prefix: Option<String>,
}

impl LocaleFileMatcher {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }

    /// Classify a file name
    pub fn classify(&self, file_name: &str) -> Result<FileMatch, LocaleError> {
        if let Some(prefix) = &self.prefix {
            if !file_name.starts_with(prefix.as_str()) {
                return Ok(FileMatch::PrefixMismatch);
            }
        }
        LocaleFile::from_file_name(file_name).map(FileMatch::Locale)
    }
}

/// Table mapping full locale codes to the code the translation service expects
#[derive(Debug, Clone, Default)]
pub struct RegionalOverrides {
    rules: BTreeMap<String, String>,
}

impl RegionalOverrides {
    pub fn new(rules: BTreeMap<String, String>) -> Self {
        Self { rules }
    }

    /// Look up an override for a locale, ignoring case and `_`/`-` differences
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        let wanted = normalize_locale(locale);
        self.rules
            .iter()
            .find(|(from, _)| normalize_locale(from) == wanted)
            .map(|(_, to)| to.as_str())
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_lowercase()
}
