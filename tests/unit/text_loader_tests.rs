/*!
 * Tests for candidate-encoding text loading
 */

use anyhow::Result;
use praatgrid::errors::DecodeError;
use praatgrid::text_loader::{decode_bytes, read_text, resolve_encoding, DEFAULT_ENCODINGS};
use crate::common;

/// Test decoding plain UTF-8 bytes with the default ladder
#[test]
fn test_decode_bytes_withUtf8Content_shouldDecode() -> Result<()> {
    let data = "xmin = 0\ntext = \"héllo\"\n".as_bytes();

    let text = decode_bytes(data, &[])?;
    assert!(text.contains("héllo"));

    Ok(())
}

/// Test decoding UTF-16LE bytes with a BOM when utf-16 is a candidate
#[test]
fn test_decode_bytes_withUtf16Bom_shouldDecode() -> Result<()> {
    // "hi" in UTF-16LE with BOM
    let data: &[u8] = &[0xFF, 0xFE, 0x68, 0x00, 0x69, 0x00];

    let text = decode_bytes(data, &["utf-16".to_string()])?;
    assert_eq!(text, "hi");

    Ok(())
}

/// Test that bytes invalid in every candidate yield an explicit failure
#[test]
fn test_decode_bytes_withInvalidBytes_shouldNameTriedEncodings() {
    // Invalid UTF-8 (lonely continuation byte after a 2-byte lead)
    let data: &[u8] = &[0xC3, 0x28];

    let result = decode_bytes(data, &["utf-8".to_string()]);
    match result {
        Err(DecodeError::NoEncodingWorked { tried }) => {
            assert_eq!(tried, vec!["UTF-8".to_string()]);
        }
        other => panic!("Expected NoEncodingWorked, got {:?}", other),
    }
}

/// Test that an unknown encoding label is rejected up front
#[test]
fn test_decode_bytes_withUnknownLabel_shouldFail() {
    let result = decode_bytes(b"anything", &["klingon-8".to_string()]);
    assert!(matches!(
        result,
        Err(DecodeError::UnknownEncoding { .. })
    ));
}

/// Test that every built-in default label resolves
#[test]
fn test_resolve_encoding_withDefaultLabels_shouldResolve() {
    for label in DEFAULT_ENCODINGS {
        assert!(resolve_encoding(label).is_ok(), "label {} did not resolve", label);
    }
}

/// Test reading a file from disk with detection
#[test]
fn test_read_text_withUtf8File_shouldDecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_textgrid(&temp_dir.path().to_path_buf(), "sample.TextGrid")?;

    let text = read_text(&path, &[])?;
    assert!(text.contains("hello there"));

    Ok(())
}

/// Test that a missing file surfaces as an I/O error
#[test]
fn test_read_text_withMissingFile_shouldFail() {
    let result = read_text("definitely/not/here.TextGrid", &[]);
    assert!(matches!(result, Err(DecodeError::Io(_))));
}
