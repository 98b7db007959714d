/*!
 * # praatgrid
 *
 * A Rust library and CLI tool for reading Praat TextGrid annotation files
 * and flattening them into time-ordered dialog transcripts.
 *
 * ## Features
 *
 * - Parse interval-tier TextGrid files, including multi-line quoted labels
 *   with doubled-quote escaping
 * - Derive a dialog transcript across all tiers, sorted by start time with
 *   stable tie-breaking, computed once and cached
 * - Decode input files with unknown encodings via an ordered candidate
 *   list or automatic detection
 * - Batch-convert directories of TextGrid files to JSON or plain text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `textgrid`: TextGrid parsing, document model and dialog projection
 * - `text_loader`: candidate-encoding text decoding
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the crate
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod text_loader;
pub mod textgrid;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat};
pub use app_controller::Controller;
pub use errors::{AppError, DecodeError, TextGridError};
pub use textgrid::{parse, parse_with_diagnostics, DialogEntry, Interval, ParseWarning, TextGrid, Tier};
