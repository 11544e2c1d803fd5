//! Batch command - classify many images, reporting failures as they happen.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;
use whats_cooking_adapters::FsImageSource;
use whats_cooking_core::{run_batch, BatchSummary, ImageSource};

use super::{ExitCode, OutputFormat, Settings};
use crate::config::AppConfig;
use crate::output::{JsonMode, JsonOutput, ProgressBar, TextOutput};

/// Photos classified when no paths are given and none are configured.
pub const DEFAULT_IMAGES: &[&str] = &[
    "plate of fried chicken.jpg",
    "shrimp scampi pasta.jpg",
    "slice-of-chocholate-cake.jpg",
    "taco.jpeg",
    "tomato-soup-recipe.jpg",
];

/// Arguments for the batch command.
#[derive(Args, Clone, Default)]
pub struct BatchArgs {
    /// Image files or directories (defaults to the configured list)
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

impl BatchArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if !self.recursive {
            self.recursive = config.batch.recursive.unwrap_or(false);
        }

        if self.paths.is_empty() {
            self.paths = config.batch.images.clone().unwrap_or_else(|| {
                DEFAULT_IMAGES.iter().map(PathBuf::from).collect()
            });
        }

        self
    }
}

/// Run the batch command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &BatchArgs, settings: &Settings) -> Result<ExitCode> {
    info!("Running batch on {} paths", args.paths.len());

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let progress = ProgressBar::new(
        total.map(|t| t as u64),
        settings.quiet,
        settings.show_progress(),
    );

    let provider = settings.model_provider();

    let summary = match settings.format {
        OutputFormat::Text => {
            let output = TextOutput::stdout();
            output.header(total.unwrap_or(0))?;
            let summary = run_batch(&source, &provider, &output, &progress)?;
            output.footer()?;
            summary
        }
        OutputFormat::Json | OutputFormat::Jsonl => {
            let mode = if settings.format == OutputFormat::Json {
                JsonMode::Array {
                    pretty: settings.pretty,
                }
            } else {
                JsonMode::Lines
            };
            let output = JsonOutput::stdout(mode);
            run_batch(&source, &provider, &output, &progress)?
        }
    };

    info!(
        "Batch finished: {} classified, {} failed",
        summary.processed, summary.skipped
    );

    Ok(exit_code(&summary))
}

/// Exit code for a completed batch: any failed image makes it non-zero.
#[must_use]
pub const fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.skipped > 0 {
        ExitCode::Failures
    } else {
        ExitCode::Success
    }
}
