/*!
 * Common test utilities for the xlifftranslate test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xlifftranslate::app_config::Config;
use xlifftranslate::{TranslationUnit, XliffDocument};

/// A unit as written into a fixture file
pub struct FixtureUnit<'a> {
    pub id: &'a str,
    pub source: &'a str,
    /// `None` leaves the `<target>` element out entirely
    pub target: Option<&'a str>,
    pub state: Option<&'a str>,
}

impl<'a> FixtureUnit<'a> {
    pub fn source_only(id: &'a str, source: &'a str) -> Self {
        Self { id, source, target: None, state: None }
    }

    pub fn with_target(id: &'a str, source: &'a str, target: &'a str) -> Self {
        Self { id, source, target: Some(target), state: None }
    }

    pub fn translated(id: &'a str, source: &'a str, target: &'a str) -> Self {
        Self { id, source, target: Some(target), state: Some("translated") }
    }
}

/// Initialize test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Renders an XLIFF 1.2 document holding the given units
pub fn xliff(units: &[FixtureUnit]) -> String {
    let mut body = String::new();
    for unit in units {
        body.push_str(&format!("      <trans-unit id=\"{}\" datatype=\"html\">\n", unit.id));
        body.push_str(&format!("        <source>{}</source>\n", unit.source));
        if let Some(target) = unit.target {
            match unit.state {
                Some(state) => body.push_str(&format!(
                    "        <target state=\"{}\">{}</target>\n",
                    state, target
                )),
                None => body.push_str(&format!("        <target>{}</target>\n", target)),
            }
        }
        body.push_str("      </trans-unit>\n");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en" datatype="plaintext" original="ng2.template">
    <body>
{}    </body>
  </file>
</xliff>
"#,
        body
    )
}

/// Writes an XLIFF fixture file
pub fn create_xliff_file(dir: &Path, filename: &str, units: &[FixtureUnit]) -> Result<PathBuf> {
    create_test_file(dir, filename, &xliff(units))
}

/// Parses a file written by the tool
pub fn read_document(path: &Path) -> Result<XliffDocument> {
    Ok(XliffDocument::parse(&fs::read_to_string(path)?)?)
}

/// Unit snapshots of a file written by the tool
pub fn read_units(path: &Path) -> Result<Vec<TranslationUnit>> {
    Ok(read_document(path)?.units())
}

/// Configuration pointing at `dir` without touching any config file
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.i18n_path = dir.to_path_buf();
    config.translation.api_key = "test-key".to_string();
    config
}
