//! Configuration file support for whats-cooking.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/whats-cooking/config.toml` (lowest priority)
//! - Project-local: `.whats-cooking.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

const PROJECT_CONFIG_FILE: &str = ".whats-cooking.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model settings.
    pub model: ModelConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
    /// Batch run settings.
    pub batch: BatchConfig,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model artifact directory.
    pub dir: Option<PathBuf>,
    /// Use Metal/CUDA when compiled in.
    pub gpu: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

/// Batch configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Images classified when `batch` gets no paths.
    pub images: Option<Vec<PathBuf>>,
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/whats-cooking/config.toml`
    /// 2. Project-local: `.whats-cooking.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(problems) = config.validate() {
            for problem in &problems {
                eprintln!("warning: {problem}");
            }
            config.drop_invalid();
        }

        config
    }

    /// Validate configuration values, reporting every invalid one.
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if let Some(ref f) = self.output.format {
            if !is_known_format(f) {
                problems.push(format!(
                    "output.format must be 'text', 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        if let Some(ref images) = self.batch.images {
            if images.is_empty() {
                problems.push("batch.images must not be empty".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// Clears the values `validate` rejects so defaults apply instead.
    fn drop_invalid(&mut self) {
        if self
            .output
            .format
            .as_deref()
            .is_some_and(|f| !is_known_format(f))
        {
            self.output.format = None;
        }
        if self.batch.images.as_ref().is_some_and(Vec::is_empty) {
            self.batch.images = None;
        }
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Model
        self.model.dir = other.model.dir.or_else(|| self.model.dir.take());
        self.model.gpu = other.model.gpu.or(self.model.gpu);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);

        // Batch
        self.batch.images = other.batch.images.or_else(|| self.batch.images.take());
        self.batch.recursive = other.batch.recursive.or(self.batch.recursive);
    }
}

fn is_known_format(format: &str) -> bool {
    matches!(format, "text" | "json" | "jsonl")
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("whats-cooking").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.whats-cooking.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
