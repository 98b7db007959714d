/*!
 * Error types for the praatgrid crate.
 *
 * This module contains custom error types for different parts of the
 * crate, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when parsing or accessing a TextGrid document
#[derive(Error, Debug)]
pub enum TextGridError {
    /// Fatal parse failure: invalid numeric literal or structurally
    /// inconsistent input. No document is produced.
    #[error("malformed document at line {line}: {message}")]
    MalformedDocument {
        /// 1-based line number where parsing stopped
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Indexed tier access outside the document's bounds
    #[error("tier index {index} out of range, document declares {size} tier(s)")]
    IndexOutOfRange {
        /// The rejected index
        index: usize,
        /// Declared tier count from the document header
        size: usize,
    },
}

/// Errors that can occur when decoding raw bytes into text
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A caller-supplied encoding label is not a known encoding
    #[error("unknown encoding label: {label}")]
    UnknownEncoding {
        /// The label that failed to resolve
        label: String,
    },

    /// Every candidate encoding produced malformed sequences
    #[error("no candidate encoding decoded the input (tried: {})", .tried.join(", "))]
    NoEncodingWorked {
        /// Names of the encodings tried, in order
        tried: Vec<String>,
    },

    /// Error reading the underlying file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from TextGrid parsing or access
    #[error("TextGrid error: {0}")]
    TextGrid(#[from] TextGridError),

    /// Error from text decoding
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
