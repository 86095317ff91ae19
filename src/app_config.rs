use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locale::RegionalOverrides;
use crate::translation::masking::{INTERPOLATION_MARKER, IgnoreRules, MaskMode};
use crate::translation::pipeline::WriteMode;
use crate::translation::policy::PolicyFlags;
use crate::translation::scheduler::{ConcurrencyMode, UnitScheduler};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and applying command line overrides.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    // @field: Directory holding the locale files
    #[serde(default = "default_i18n_path")]
    pub i18n_path: PathBuf,

    // @field: Canonical source file; none means every file is its own source
    #[serde(default)]
    pub source_file: Option<PathBuf>,

    // @field: Accepted file name prefix (e.g. "messages.")
    #[serde(default)]
    pub file_prefix: Option<String>,

    // @field: Literals to protect from translation, joined by ignore_delimiter
    #[serde(default)]
    pub ignore_text: String,

    #[serde(default = "default_ignore_delimiter")]
    pub ignore_delimiter: String,

    #[serde(default = "default_interpolation_marker")]
    pub interpolation_marker: String,

    /// Regexes whose matches are protected like ignore literals, in order
    #[serde(default)]
    pub placeholder_patterns: Vec<String>,

    /// Mask every occurrence of a literal instead of only the first
    #[serde(default)]
    pub mask_all_occurrences: bool,

    #[serde(default)]
    pub skip_different: bool,

    #[serde(default)]
    pub re_translate_existing: bool,

    /// Also treat `state="translated"` on `<source>` as done
    #[serde(default)]
    pub strict_state: bool,

    #[serde(default)]
    pub verbose: bool,

    // @field: Locale to service language code (e.g. "en-GB" -> "en")
    #[serde(default)]
    pub regional_overrides: BTreeMap<String, String>,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    #[serde(default)]
    pub write_mode: WriteMode,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Cloud Translation (v2 REST)
    #[default]
    Google,
}

impl TranslationProvider {
    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds per call, 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Text format sent to the service: "auto", "html" or "text"
    #[serde(default = "default_format")]
    pub format: String,

    // @field: Source language; detected by the service when absent
    #[serde(default)]
    pub source_language: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            api_key: String::new(),
            endpoint: default_google_endpoint(),
            timeout_secs: default_timeout_secs(),
            format: default_format(),
            source_language: None,
        }
    }
}

impl TranslationConfig {
    /// Per-call timeout, `None` when disabled
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Unit scheduling settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConcurrencyConfig {
    #[serde(default)]
    pub mode: ConcurrencyMode,

    /// Maximum number of concurrent requests in bounded mode
    #[serde(default = "default_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Pause between units in sequential mode
    #[serde(default)]
    pub unit_delay_ms: u64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            mode: ConcurrencyMode::default(),
            max_concurrent_requests: default_concurrent_requests(),
            unit_delay_ms: 0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "xlifftranslate.json";

fn default_i18n_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_ignore_delimiter() -> String {
    " ".to_string()
}

fn default_interpolation_marker() -> String {
    INTERPOLATION_MARKER.to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_format() -> String {
    "auto".to_string()
}

impl Config {
    /// Load a JSON configuration file, falling back to defaults when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.ignore_delimiter.is_empty() {
            return Err(anyhow!("Ignore delimiter must not be empty"));
        }

        if self.interpolation_marker.is_empty() {
            return Err(anyhow!("Interpolation marker must not be empty"));
        }

        // Surfaces a bad pattern here rather than on the first unit
        self.ignore_rules()?;

        if self.concurrency.max_concurrent_requests == 0 {
            return Err(anyhow!("max_concurrent_requests must be at least 1"));
        }

        if !matches!(self.translation.format.as_str(), "auto" | "html" | "text") {
            return Err(anyhow!(
                "Invalid translation format '{}', expected auto, html or text",
                self.translation.format
            ));
        }

        url::Url::parse(&self.translation.endpoint)
            .with_context(|| {
                format!("Invalid translation endpoint: {}", self.translation.endpoint)
            })?;

        match self.translation.provider {
            TranslationProvider::Google => {
                if self.translation.api_key.trim().is_empty() {
                    return Err(anyhow!("Translation API key is required for Google provider"));
                }
            }
        }

        Ok(())
    }

    /// Effective log level, raised to debug by the verbose flag
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose && self.log_level == LogLevel::Info {
            LogLevel::Debug
        } else {
            self.log_level.clone()
        }
    }

    pub fn mask_mode(&self) -> MaskMode {
        if self.mask_all_occurrences {
            MaskMode::AllOccurrences
        } else {
            MaskMode::FirstOccurrence
        }
    }

    /// Compile the protection rules
    pub fn ignore_rules(&self) -> Result<IgnoreRules> {
        IgnoreRules::new(
            &self.ignore_text,
            &self.ignore_delimiter,
            &self.placeholder_patterns,
            &self.interpolation_marker,
            self.mask_mode(),
        )
        .context("Invalid placeholder pattern")
    }

    pub fn policy_flags(&self) -> PolicyFlags {
        PolicyFlags {
            skip_different: self.skip_different,
            re_translate_existing: self.re_translate_existing,
            strict_state: self.strict_state,
        }
    }

    pub fn regional_overrides(&self) -> RegionalOverrides {
        RegionalOverrides::new(self.regional_overrides.clone())
    }

    pub fn scheduler(&self) -> UnitScheduler {
        UnitScheduler::new(
            self.concurrency.mode,
            self.concurrency.max_concurrent_requests,
            Duration::from_millis(self.concurrency.unit_delay_ms),
        )
    }

    /// Canonical source path resolved against the i18n directory
    pub fn source_path(&self) -> Option<PathBuf> {
        self.source_file.as_ref().map(|file| {
            if file.is_absolute() || file.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
                file.clone()
            } else {
                self.i18n_path.join(file)
            }
        })
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            i18n_path: default_i18n_path(),
            source_file: None,
            file_prefix: None,
            ignore_text: String::new(),
            ignore_delimiter: default_ignore_delimiter(),
            interpolation_marker: default_interpolation_marker(),
            placeholder_patterns: Vec::new(),
            mask_all_occurrences: false,
            skip_different: false,
            re_translate_existing: false,
            strict_state: false,
            verbose: false,
            regional_overrides: BTreeMap::new(),
            concurrency: ConcurrencyConfig::default(),
            write_mode: WriteMode::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
