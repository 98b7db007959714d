/*!
 * End-to-end conversion tests: TextGrid file in, transcript file out
 */

use std::fs;
use anyhow::Result;
use serde_json::Value;
use praatgrid::app_config::{Config, OutputFormat};
use praatgrid::app_controller::Controller;
use crate::common;

/// Test converting a sample file to a JSON transcript
#[test]
fn test_run_withSampleFile_shouldWriteJsonTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_textgrid(&dir, "session.TextGrid")?;

    let controller = Controller::new_for_test()?;
    let output = controller.run(input, dir.clone(), false)?;

    let output_path = output.expect("expected a transcript to be written");
    assert_eq!(output_path, dir.join("session.dialog.json"));

    let rendered = fs::read_to_string(&output_path)?;
    let entries: Value = serde_json::from_str(&rendered)?;
    let entries = entries.as_array().expect("expected a JSON array");

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["speaker"], 0);
    assert_eq!(entries[0]["text"], "hello there");
    assert_eq!(entries[1]["speaker"], 1);
    assert_eq!(entries[1]["text"], "hi");
    assert_eq!(entries[2]["text"], "see you");

    Ok(())
}

/// Test that an existing transcript is not overwritten without force
#[test]
fn test_run_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_textgrid(&dir, "session.TextGrid")?;

    let controller = Controller::new_for_test()?;

    let first = controller.run(input.clone(), dir.clone(), false)?;
    assert!(first.is_some());

    let second = controller.run(input.clone(), dir.clone(), false)?;
    assert!(second.is_none());

    let forced = controller.run(input, dir, true)?;
    assert!(forced.is_some());

    Ok(())
}

/// Test the plain text output format
#[test]
fn test_run_withTextFormat_shouldWritePlainTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_textgrid(&dir, "session.TextGrid")?;

    let mut config = Config::default();
    config.output.format = OutputFormat::Text;
    let controller = Controller::with_config(config)?;

    let output_path = controller
        .run(input, dir.clone(), false)?
        .expect("expected a transcript to be written");
    assert_eq!(output_path, dir.join("session.dialog.txt"));

    let rendered = fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("speaker 0"));
    assert!(lines[0].contains("hello there"));
    assert!(lines[1].contains("speaker 1"));

    Ok(())
}

/// Test batch conversion of a directory
#[test]
fn test_run_folder_withMultipleFiles_shouldConvertAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_textgrid(&dir, "one.TextGrid")?;
    common::create_test_textgrid(&dir, "two.TextGrid")?;
    common::create_test_file(&dir, "notes.txt", "not a grid")?;

    let controller = Controller::new_for_test()?;
    controller.run_folder(dir.clone(), false)?;

    assert!(dir.join("one.dialog.json").exists());
    assert!(dir.join("two.dialog.json").exists());
    assert!(!dir.join("notes.dialog.json").exists());

    // Batch runs leave a summary line in the processing log
    let log = fs::read_to_string(dir.join("praatgrid.log"))?;
    assert!(log.contains("Converted 2 of 2"));

    Ok(())
}

/// Test that a malformed file aborts with an error and writes nothing
#[test]
fn test_run_withMalformedFile_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "bad.TextGrid", "xmin = abc\n")?;

    let controller = Controller::new_for_test()?;
    let result = controller.run(input, dir.clone(), false);

    assert!(result.is_err());
    assert!(!dir.join("bad.dialog.json").exists());

    Ok(())
}

/// Test that a missing input path is an error
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let controller = Controller::new_for_test()?;
    let result = controller.run(dir.join("ghost.TextGrid"), dir, false);

    assert!(result.is_err());

    Ok(())
}
