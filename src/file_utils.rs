use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::fs::OpenOptions;
use std::io::Write;
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: File and directory utilities

// @const: TextGrid header sniff (file type tag or object class tag)
static TEXTGRID_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(File type\s*=\s*"ooTextFile"|Object class\s*=\s*"TextGrid")"#).unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a rendered transcript
    // @params: input_file, output_dir, tag, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        tag: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        // Create the output filename with tag and extension
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(tag);
        output_filename.push('.');
        output_filename.push_str(extension);

        // Join with the output directory
        output_dir.join(output_filename)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        // Ensure the target directory exists
        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        // Perform the copy
        fs::copy(from, to)?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Get current timestamp
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        // Open file in append mode, create if it doesn't exist
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        // Write content with timestamp
        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect if a file is a TextGrid annotation file
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if ext_str == "textgrid" {
                return Ok(FileType::TextGrid);
            }
        }

        // Fall back to examining file contents. This only sees files the
        // default encoding can read; exotic encodings are handled by the
        // text loader once a file is actually processed.
        if let Ok(content) = fs::read_to_string(path) {
            if TEXTGRID_HEADER_REGEX.is_match(&content) {
                return Ok(FileType::TextGrid);
            }
        }

        // Default to unknown if we couldn't determine the type
        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// TextGrid annotation file
    TextGrid,
    /// Unknown file type
    Unknown,
}
