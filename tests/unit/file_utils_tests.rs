/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use xlifftranslate::file_utils::FileManager;

use crate::common;

/// Test that the directory listing is flat and sorted
#[test]
fn test_list_files_withMixedEntries_shouldReturnSortedRegularFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "messages.fr.xlf", "")?;
    common::create_test_file(temp_dir.path(), "README", "")?;
    common::create_test_file(temp_dir.path(), "messages.de.xlf", "")?;
    std::fs::create_dir(temp_dir.path().join("archive"))?;

    let names: Vec<String> = FileManager::list_files(temp_dir.path())?
        .iter()
        .filter_map(FileManager::file_name)
        .collect();

    assert_eq!(names, vec!["README", "messages.de.xlf", "messages.fr.xlf"]);
    Ok(())
}

/// Test that copying creates the destination
#[test]
fn test_copy_file_withExistingSource_shouldDuplicateContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "source.xlf", "<xliff/>")?;
    let destination = temp_dir.path().join("messages.es.xlf");

    FileManager::copy_file(&source, &destination)?;

    assert!(FileManager::file_exists(&destination));
    assert_eq!(FileManager::read_to_string(&destination)?, "<xliff/>");
    Ok(())
}

/// Test existence checks on files and directories
#[test]
fn test_exists_shouldDistinguishFilesFromDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.xlf", "")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}
