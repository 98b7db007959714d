/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use praatgrid::file_utils::{FileManager, FileType};
use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withRealAndMissingFiles_shouldReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(&temp_dir.path().to_path_buf(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    assert!(FileManager::dir_exists(temp_dir.path()));

    Ok(())
}

/// Test directory creation including parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(nested.is_dir());

    Ok(())
}

/// Test output path generation from stem, tag and extension
#[test]
fn test_generate_output_path_withTextGridInput_shouldTagFilename() {
    let output = FileManager::generate_output_path(
        PathBuf::from("/data/session.TextGrid"),
        PathBuf::from("/out"),
        "dialog",
        "json",
    );

    assert_eq!(output, PathBuf::from("/out/session.dialog.json"));
}

/// Test finding files by extension, case-insensitively
#[test]
fn test_find_files_withMixedExtensions_shouldMatchCaseInsensitive() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_textgrid(&dir, "one.TextGrid")?;
    common::create_test_textgrid(&dir, "two.textgrid")?;
    common::create_test_file(&dir, "other.txt", "not a grid")?;

    let mut found = FileManager::find_files(&dir, "TextGrid")?;
    found.sort();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| {
        p.extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case("textgrid"))
            .unwrap_or(false)
    }));

    Ok(())
}

/// Test writing a string to a file, creating parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.json");

    FileManager::write_to_file(&path, "[]")?;
    assert_eq!(fs::read_to_string(&path)?, "[]");

    Ok(())
}

/// Test appending timestamped lines to a log file
#[test]
fn test_append_to_log_file_withTwoLines_shouldAppendBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = fs::read_to_string(&log_path)?;
    assert!(content.contains("first"));
    assert!(content.contains("second"));
    assert_eq!(content.lines().count(), 2);

    Ok(())
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withTextGridExtension_shouldDetect() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_textgrid(&temp_dir.path().to_path_buf(), "s.TextGrid")?;

    assert_eq!(FileManager::detect_file_type(&path)?, FileType::TextGrid);

    Ok(())
}

/// Test file type detection by content sniff when the extension is wrong
#[test]
fn test_detect_file_type_withHeaderButWrongExtension_shouldSniffContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let sniffed = common::create_test_textgrid(&dir, "renamed.txt")?;
    let plain = common::create_test_file(&dir, "plain.txt", "just some notes")?;

    assert_eq!(FileManager::detect_file_type(&sniffed)?, FileType::TextGrid);
    assert_eq!(FileManager::detect_file_type(&plain)?, FileType::Unknown);

    Ok(())
}

/// Test that detection of a missing file is an error
#[test]
fn test_detect_file_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("nope.TextGrid").is_err());
}
