/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::path::PathBuf;
use xlifftranslate::app_config::{Config, LogLevel, TranslationProvider};
use xlifftranslate::translation::{ConcurrencyMode, MaskMode, WriteMode};

use crate::common;

/// Test loading a configuration file with only some fields set
#[test]
fn test_load_withPartialFile_shouldKeepDefaultsForMissingFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "xlifftranslate.json",
        r#"{
            "i18n_path": "src/i18n",
            "source_file": "source.xlf",
            "ignore_text": "Acme|Widget",
            "ignore_delimiter": "|",
            "mask_all_occurrences": true,
            "regional_overrides": {"en-GB": "en"},
            "concurrency": {"mode": "bounded", "max_concurrent_requests": 2},
            "write_mode": "once_at_end",
            "translation": {"api_key": "secret"},
            "log_level": "warn"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.i18n_path, PathBuf::from("src/i18n"));
    assert_eq!(config.source_path(), Some(PathBuf::from("src/i18n/source.xlf")));
    assert_eq!(config.mask_mode(), MaskMode::AllOccurrences);
    assert_eq!(config.concurrency.mode, ConcurrencyMode::Bounded);
    assert_eq!(config.concurrency.max_concurrent_requests, 2);
    assert_eq!(config.write_mode, WriteMode::OnceAtEnd);
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.endpoint, "https://translation.googleapis.com");
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.regional_overrides().resolve("en_gb"), Some("en"));
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that a missing configuration file falls back to defaults
#[test]
fn test_load_withMissingFile_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load(temp_dir.path().join("absent.json"))?;

    assert_eq!(config.i18n_path, PathBuf::from("."));
    assert!(config.source_file.is_none());
    assert!(!config.skip_different);
    assert!(!config.re_translate_existing);
    Ok(())
}

/// Test that a malformed configuration file is reported
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "xlifftranslate.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test that configured ignore literals end up in the protection rules
#[test]
fn test_ignoreRules_withConfiguredLiterals_shouldMaskThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.ignore_text = "Acme Widget".to_string();

    let text = "Buy Acme today";
    let table = config.ignore_rules()?.table_for(text);

    assert_eq!(table.mask(text), "Buy <_> today");
    Ok(())
}

/// Test that the policy flags mirror the configuration switches
#[test]
fn test_policyFlags_shouldMirrorSwitches() {
    let mut config = Config::default();
    config.skip_different = true;
    config.strict_state = true;

    let flags = config.policy_flags();
    assert!(flags.skip_different);
    assert!(!flags.re_translate_existing);
    assert!(flags.strict_state);
}
