/*!
 * Integration tests for directory runs and locale file creation
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use xlifftranslate::app_controller::Controller;
use xlifftranslate::providers::mock::MockTranslator;
use xlifftranslate::translation::ConcurrencyMode;
use xlifftranslate::xliff::TargetState;

use crate::common::{self, FixtureUnit};

const HELLO: &str = r#"Hello <x id="INTERPOLATION"/>"#;

/// Test a multi-file run: source file skipped, stale units removed, new ones translated
#[tokio::test]
async fn test_run_withSourceFile_shouldSyncEveryLocaleFile() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_xliff_file(
        dir,
        "source.xlf",
        &[FixtureUnit::source_only("a", HELLO), FixtureUnit::source_only("b", "Goodbye")],
    )?;
    let french = common::create_xliff_file(
        dir,
        "messages.fr.xlf",
        &[FixtureUnit::with_target("a", HELLO, ""), FixtureUnit::with_target("stale", "x", "y")],
    )?;
    let german = common::create_xliff_file(dir, "messages.de.xlf", &[])?;

    let mut config = common::test_config(dir);
    config.source_file = Some(PathBuf::from("source.xlf"));
    let controller = Controller::with_config(config, MockTranslator::working())?;

    let report = controller.run().await?;

    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_skipped, 0);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.stats.translated, 4);

    let french_units = common::read_units(&french)?;
    let ids: Vec<&str> = french_units.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(french_units[0].target_text, r#"[fr] Hello <x id="INTERPOLATION"/>"#);

    let german_units = common::read_units(&german)?;
    assert_eq!(german_units.len(), 2);
    assert!(german_units.iter().all(|u| u.target_state == TargetState::Translated));
    assert_eq!(common::read_document(&german)?.target_language(), Some("de"));

    // The canonical source itself is never rewritten
    assert!(common::read_units(&dir.join("source.xlf"))?.iter().all(|u| u.target_text.is_empty()));
    Ok(())
}

/// Test that unrecognized and mismatching names are skipped and counted
#[tokio::test]
async fn test_run_withForeignFiles_shouldSkipThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_xliff_file(dir, "messages.es.xlf", &[FixtureUnit::source_only("a", "Hello")])?;
    common::create_xliff_file(dir, "other.es.xlf", &[FixtureUnit::source_only("a", "Hello")])?;
    common::create_test_file(dir, "README", "not a locale file")?;

    let mut config = common::test_config(dir);
    config.file_prefix = Some("messages.".to_string());
    let controller = Controller::with_config(config, MockTranslator::working())?;

    let report = controller.run().await?;

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_skipped, 2);
    assert_eq!(controller.translator().call_count(), 1);
    assert_eq!(fs::read_to_string(dir.join("README"))?, "not a locale file");
    Ok(())
}

/// Test that a broken file is counted as failed while the others are processed
#[tokio::test]
async fn test_run_withBrokenFile_shouldContinueWithOthers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "messages.de.xlf", "<xliff><file>")?;
    let hello = [FixtureUnit::source_only("a", "Hello")];
    let french = common::create_xliff_file(dir, "messages.fr.xlf", &hello)?;

    let controller = Controller::with_config(common::test_config(dir), MockTranslator::working())?;
    let report = controller.run().await?;

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_processed, 1);
    assert_eq!(common::read_units(&french)?[0].target_text, "[fr] Hello");
    Ok(())
}

/// Test that an invalid locale does not fail the run
#[tokio::test]
async fn test_run_withInvalidLocale_shouldStillSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let hello = [FixtureUnit::source_only("a", "Hello")];
    common::create_xliff_file(dir, "messages.xx-YY.xlf", &hello)?;

    let controller =
        Controller::with_config(common::test_config(dir), MockTranslator::invalid_language())?;
    let report = controller.run().await?;

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.stats.failed, 1);
    assert!(report.summary().contains("Failed: 1"));
    Ok(())
}

/// Test that regional overrides change the code sent to the service only
#[tokio::test]
async fn test_run_withRegionalOverride_shouldSendMappedLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let colour = [FixtureUnit::source_only("a", "Colour")];
    let path = common::create_xliff_file(dir, "messages.en-GB.xlf", &colour)?;

    let mut config = common::test_config(dir);
    config.regional_overrides.insert("en-GB".to_string(), "en".to_string());
    config.concurrency.mode = ConcurrencyMode::Bounded;
    let controller = Controller::with_config(config, MockTranslator::working())?;

    controller.run().await?;

    assert_eq!(controller.translator().requests(), vec![("Colour".to_string(), "en".to_string())]);
    let units = common::read_units(&path)?;
    assert_eq!(units[0].target_language.as_deref(), Some("en-GB"));
    Ok(())
}

/// Test that a missing directory aborts the run
#[tokio::test]
async fn test_run_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(&temp_dir.path().join("missing"));
    let controller = Controller::with_config(config, MockTranslator::working())?;

    assert!(controller.run().await.is_err());
    Ok(())
}

/// Test that a missing canonical source aborts the run
#[tokio::test]
async fn test_run_withMissingSourceFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.source_file = Some(PathBuf::from("source.xlf"));
    let controller = Controller::with_config(config, MockTranslator::working())?;

    assert!(controller.run().await.is_err());
    Ok(())
}

/// Test that init creates one file per language and respects existing files
#[test]
fn test_initLocales_shouldCopySourceForEachLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_xliff_file(dir, "source.xlf", &[FixtureUnit::source_only("a", "Hello")])?;
    common::create_test_file(dir, "messages.de.xlf", "existing")?;

    let mut config = common::test_config(dir);
    config.source_file = Some(PathBuf::from("source.xlf"));
    let controller = Controller::with_config(config, MockTranslator::working())?;

    let created = controller.init_locales("es, de fr", false)?;
    assert_eq!(created, vec![dir.join("messages.es.xlf"), dir.join("messages.fr.xlf")]);
    assert_eq!(fs::read_to_string(dir.join("messages.de.xlf"))?, "existing");
    assert_eq!(common::read_units(&dir.join("messages.es.xlf"))?[0].id, "a");

    let forced = controller.init_locales("de", true)?;
    assert_eq!(forced, vec![dir.join("messages.de.xlf")]);
    assert_ne!(fs::read_to_string(dir.join("messages.de.xlf"))?, "existing");
    Ok(())
}

/// Test that init needs a source file
#[test]
fn test_initLocales_withoutSourceFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let controller = Controller::with_config(config, MockTranslator::working())?;
    assert!(controller.init_locales("es", false).is_err());
    Ok(())
}

/// Test that the files created by init can be translated right away
#[tokio::test]
async fn test_initThenRun_shouldTranslateCreatedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_xliff_file(dir, "source.xlf", &[FixtureUnit::source_only("a", "Hello")])?;

    let mut config = common::test_config(dir);
    config.source_file = Some(PathBuf::from("source.xlf"));
    config.file_prefix = Some("messages.".to_string());
    let controller = Controller::with_config(config, MockTranslator::working())?;

    controller.init_locales("es", false)?;
    let report = controller.run().await?;

    assert_eq!(report.files_processed, 1);
    assert_eq!(common::read_units(&dir.join("messages.es.xlf"))?[0].target_text, "[es] Hello");
    Ok(())
}
