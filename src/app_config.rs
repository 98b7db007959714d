use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Candidate encodings tried in order when decoding input files.
    /// Empty means: run the detector first, then the built-in list.
    #[serde(default)]
    pub encodings: Vec<String>,

    /// Transcript output config
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcript output format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: JSON array of dialog entries
    #[default]
    Json,
    // @format: One plain line per dialog entry
    Text,
}

impl OutputFormat {
    // @returns: Output file extension
    pub fn extension(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Json => "json".to_string(),
            Self::Text => "text".to_string(),
        }
    }
}

// Implement Display trait for OutputFormat
impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for OutputFormat
impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Configuration for transcript rendering
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Filename tag inserted between the input stem and the extension
    #[serde(default = "default_output_tag")]
    pub tag: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
            tag: default_output_tag(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_output_tag() -> String {
    "dialog".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Every configured encoding label must resolve
        for label in &self.encodings {
            crate::text_loader::resolve_encoding(label)
                .map_err(|_| anyhow!("Unknown encoding label in config: {}", label))?;
        }

        if self.output.tag.is_empty() {
            return Err(anyhow!("Output tag must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            encodings: Vec::new(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
