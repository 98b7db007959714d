// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;
use clap::{Parser, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, LogLevel, OutputFormat};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod text_loader;
mod textgrid;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert TextGrid files into dialog transcripts (default command)
    #[command(alias = "convert")]
    Convert(ConvertArgs),

    /// Generate shell completions for praatgrid
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input TextGrid file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Candidate encoding to try when decoding (repeatable, tried in order)
    #[arg(short, long = "encoding")]
    encodings: Vec<String>,

    /// Output format (json or text)
    #[arg(long)]
    format: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, clap::ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// praatgrid - Praat TextGrid to dialog transcript converter
///
/// Reads interval-tier TextGrid annotation files and flattens them into
/// time-ordered dialog transcripts.
#[derive(Parser, Debug)]
#[command(name = "praatgrid")]
#[command(version = "0.3.0")]
#[command(about = "Praat TextGrid to dialog transcript converter")]
#[command(long_about = "praatgrid parses Praat TextGrid annotation files and derives a flattened,
time-ordered dialog transcript across all tiers.

EXAMPLES:
    praatgrid session.TextGrid                 # Convert using default config
    praatgrid -f session.TextGrid              # Force overwrite existing output
    praatgrid --format text session.TextGrid   # Plain text transcript
    praatgrid -e utf-16 session.TextGrid       # Decode as UTF-16
    praatgrid --log-level debug /recordings/   # Process a directory with debug logging
    praatgrid completions bash > praatgrid.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input TextGrid file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Candidate encoding to try when decoding (repeatable, tried in order)
    #[arg(short, long = "encoding")]
    encodings: Vec<String>,

    /// Output format (json or text)
    #[arg(long)]
    format: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "praatgrid", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                encodings: cli.encodings,
                format: cli.format,
                pretty: cli.pretty,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args)
        }
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        apply_cli_overrides(&mut config, &options)?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &options)?;

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file or directory
    if options.input_path.is_file() {
        controller.run(
            options.input_path.clone(),
            options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            options.force_overwrite,
        )?;
    } else if options.input_path.is_dir() {
        controller.run_folder(options.input_path.clone(), options.force_overwrite)?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

/// Override config values with command line options where provided
fn apply_cli_overrides(config: &mut Config, options: &ConvertArgs) -> Result<()> {
    if !options.encodings.is_empty() {
        config.encodings = options.encodings.clone();
    }

    if let Some(format) = &options.format {
        config.output.format = OutputFormat::from_str(format)?;
    }

    if options.pretty {
        config.output.pretty = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(())
}

fn to_level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}
