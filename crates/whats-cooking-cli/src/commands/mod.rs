//! CLI command definitions and handlers.

pub mod batch;
pub mod classify;
pub mod model;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use whats_cooking_adapters::{default_model_dir, load_classifier};
use whats_cooking_core::inference::get_device;
use whats_cooking_core::{Classifier, ModelProvider};

use crate::config::AppConfig;

/// What's Cooking - tell what food is in a photo
#[derive(Parser)]
#[command(name = "whats-cooking")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Batch arguments used when no subcommand is given.
    #[command(flatten)]
    pub batch: batch::BatchArgs,

    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single image (use `-` to read a camera capture from stdin)
    Classify(classify::ClassifyArgs),
    /// Classify a list of images, reporting failures without stopping
    Batch(batch::BatchArgs),
    /// Inspect the model artifact
    Model(model::ModelArgs),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable text
    #[default]
    Text,
    /// Single JSON array
    Json,
    /// JSON Lines (one JSON object per line)
    Jsonl,
}

impl OutputFormat {
    fn from_config(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model artifact directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Show progress bar
    #[arg(long, global = true)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Run inference on Metal/CUDA when compiled in
    #[arg(long, global = true)]
    pub gpu: bool,
}

/// Options resolved from CLI flags layered over the config files.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model_dir: PathBuf,
    pub format: OutputFormat,
    pub pretty: bool,
    pub progress: bool,
    pub quiet: bool,
    pub gpu: bool,
}

impl Settings {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments
    #[must_use]
    pub fn resolve(args: &GlobalArgs, config: &AppConfig) -> Self {
        let model_dir = args
            .model_dir
            .clone()
            .or_else(|| config.model.dir.clone())
            .unwrap_or_else(default_model_dir);

        let format = args
            .format
            .or_else(|| {
                config
                    .output
                    .format
                    .as_deref()
                    .and_then(OutputFormat::from_config)
            })
            .unwrap_or_default();

        Self {
            model_dir,
            format,
            pretty: args.pretty || config.output.pretty.unwrap_or(false),
            progress: args.progress || config.output.progress.unwrap_or(false),
            quiet: args.quiet,
            gpu: args.gpu || config.model.gpu.unwrap_or(false),
        }
    }

    /// Whether to draw progress on stderr.
    ///
    /// Text output already narrates each image on stdout, so the bar is only
    /// shown by default for JSON formats.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet
            && (self.progress
                || (self.format != OutputFormat::Text && std::io::stderr().is_terminal()))
    }

    /// Builds the provider that loads the classifier on first use.
    #[must_use]
    pub fn model_provider(&self) -> ModelProvider<dyn Classifier> {
        let dir = self.model_dir.clone();
        let gpu = self.gpu;
        debug!("Model directory: {}", dir.display());

        ModelProvider::new(move || {
            let device = get_device(gpu);
            let classifier = load_classifier(&dir, &device)?;
            Ok(Arc::new(classifier) as Arc<dyn Classifier>)
        })
    }
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything succeeded.
    Success = 0,
    /// The batch completed but some images failed.
    Failures = 1,
    /// Fatal error: bad arguments, model load failure, failed classification.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let config: AppConfig = toml::from_str(
            r"
[model]
dir = 'from-config'

[output]
format = 'jsonl'
",
        )
        .unwrap_or_default();
        let args = GlobalArgs {
            model_dir: Some(PathBuf::from("from-cli")),
            format: Some(OutputFormat::Json),
            ..GlobalArgs::default()
        };

        let settings = Settings::resolve(&args, &config);

        assert_eq!(settings.model_dir, PathBuf::from("from-cli"));
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let config: AppConfig = toml::from_str(
            r"
[model]
dir = 'from-config'

[output]
format = 'jsonl'
pretty = true
",
        )
        .unwrap_or_default();

        let settings = Settings::resolve(&GlobalArgs::default(), &config);

        assert_eq!(settings.model_dir, PathBuf::from("from-config"));
        assert_eq!(settings.format, OutputFormat::Jsonl);
        assert!(settings.pretty);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&GlobalArgs::default(), &AppConfig::default());

        assert_eq!(settings.model_dir, default_model_dir());
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(!settings.pretty);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let args = GlobalArgs {
            progress: true,
            quiet: true,
            ..GlobalArgs::default()
        };
        let settings = Settings::resolve(&args, &AppConfig::default());
        assert!(!settings.show_progress());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::Failures as u8, 1);
        assert_eq!(ExitCode::Error as u8, 2);
    }
}
