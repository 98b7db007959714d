use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::{Config, OutputFormat};
use crate::file_utils::{FileManager, FileType};
use crate::text_loader;
use crate::textgrid::{self, TextGrid};

// @module: Application controller for TextGrid conversion

/// Main application controller for converting TextGrid files into dialog
/// transcripts
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Convert a single TextGrid file into a transcript written next to it
    /// (or into `output_dir`). Returns the output path, or `None` when the
    /// output already exists and `force_overwrite` is not set.
    pub fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();

        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if a transcript already exists
        let output_path = FileManager::generate_output_path(
            &input_file,
            &output_dir,
            &self.config.output.tag,
            self.config.output.format.extension(),
        );
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, transcript already exists (use -f to force overwrite)");
            return Ok(None);
        }

        // Decode and parse
        let content = text_loader::read_text(&input_file, &self.config.encodings)?;
        let grid = textgrid::parse(&content)
            .with_context(|| format!("Failed to parse TextGrid file: {:?}", input_file))?;

        debug!(
            "Parsed {:?}: {} tier(s) declared, {} parsed",
            input_file,
            grid.size(),
            grid.tiers().len()
        );

        // Render and write the transcript
        let rendered = self.render_dialog(&grid)?;
        FileManager::write_to_file(&output_path, &rendered)?;

        info!(
            "Wrote {} dialog entries to {:?} in {}",
            grid.dialog().len(),
            output_path,
            Self::format_duration(start_time.elapsed())
        );

        Ok(Some(output_path))
    }

    /// Convert every TextGrid file under a directory
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Processing TextGrid files in directory: {:?}", input_dir);

        // Extension match, double-checked against the content sniff so a
        // stray .TextGrid file that isn't one gets skipped up front
        let mut grid_files = FileManager::find_files(&input_dir, "TextGrid")?;
        grid_files.retain(|path| {
            matches!(FileManager::detect_file_type(path), Ok(FileType::TextGrid))
        });

        if grid_files.is_empty() {
            warn!("No TextGrid files found in directory: {:?}", input_dir);
            return Ok(());
        }

        // Create a progress bar for folder processing
        let folder_pb = ProgressBar::new(grid_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting files");

        let mut success_count = 0;
        let mut skipped_count = 0;
        let mut failure_count = 0;

        for path in &grid_files {
            let output_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            match self.run(path.clone(), output_dir, force_overwrite) {
                Ok(Some(_)) => success_count += 1,
                Ok(None) => skipped_count += 1,
                Err(e) => {
                    error!("Error processing {:?}: {}", path, e);
                    failure_count += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Done");

        let summary = format!(
            "Converted {} of {} TextGrid files ({} skipped, {} failed)",
            success_count,
            grid_files.len(),
            skipped_count,
            failure_count
        );
        info!("{}", summary);

        // Keep a record of batch runs alongside the processed files
        FileManager::append_to_log_file(input_dir.join("praatgrid.log"), &summary)?;

        Ok(())
    }

    /// Render the dialog projection in the configured output format
    fn render_dialog(&self, grid: &TextGrid) -> Result<String> {
        match self.config.output.format {
            OutputFormat::Json => {
                let dialog = grid.dialog();
                let rendered = if self.config.output.pretty {
                    serde_json::to_string_pretty(dialog)
                } else {
                    serde_json::to_string(dialog)
                };
                rendered.context("Failed to serialize dialog entries to JSON")
            }
            OutputFormat::Text => {
                let mut rendered = String::new();
                for entry in grid.dialog() {
                    rendered.push_str(&entry.to_string());
                    rendered.push('\n');
                }
                Ok(rendered)
            }
        }
    }

    /// Format a duration as a short human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else if total_secs >= 1 {
            format!("{}.{:01}s", total_secs, duration.subsec_millis() / 100)
        } else {
            format!("{}ms", duration.as_millis())
        }
    }
}
