//! Model command - inspect the model artifact.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use whats_cooking_adapters::models::sha256_hex;
use whats_cooking_adapters::{is_installed, ModelArtifact};

use super::{OutputFormat, Settings};
use crate::output::{JsonMode, JsonOutput};

/// Arguments for the model command
#[derive(Args)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub command: ModelCommand,
}

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommand {
    /// Show the artifact's metadata and verify its weights
    Info,
    /// List the labels the model can predict
    Labels,
    /// Print the model directory path
    Path,
}

#[derive(Serialize)]
struct ModelInfo<'a> {
    dir: String,
    task: &'a str,
    scale: String,
    input_height: usize,
    input_width: usize,
    classes: usize,
    sha256: String,
    checksum: &'static str,
}

/// Run the model command.
pub fn run(args: &ModelArgs, settings: &Settings) -> Result<()> {
    match args.command {
        ModelCommand::Info => show_info(settings),
        ModelCommand::Labels => list_labels(settings),
        ModelCommand::Path => {
            print_path(settings);
            Ok(())
        }
    }
}

fn open(settings: &Settings) -> Result<ModelArtifact> {
    ModelArtifact::open(&settings.model_dir).with_context(|| {
        format!(
            "no usable model at {} (pass --model-dir or set [model] dir)",
            settings.model_dir.display()
        )
    })
}

fn show_info(settings: &Settings) -> Result<()> {
    let artifact = open(settings)?;
    let weights = artifact.read_weights()?;
    let metadata = &artifact.metadata;
    let (input_height, input_width) = metadata.imgsz.height_width();

    let info = ModelInfo {
        dir: artifact.dir().display().to_string(),
        task: &metadata.task,
        scale: metadata.scale.to_string(),
        input_height,
        input_width,
        classes: metadata.num_classes(),
        sha256: sha256_hex(&weights),
        checksum: if metadata.sha256.is_some() {
            "verified"
        } else {
            "not recorded"
        },
    };

    match settings.format {
        OutputFormat::Text => {
            println!("Model directory: {}", info.dir);
            println!();
            println!("  Task:     {}", info.task);
            println!("  Network:  YOLOv8{}-cls", info.scale);
            println!("  Input:    {}x{}", info.input_width, info.input_height);
            println!("  Classes:  {}", info.classes);
            println!("  SHA-256:  {} ({})", info.sha256, info.checksum);
        }
        OutputFormat::Json | OutputFormat::Jsonl => {
            JsonOutput::stdout(JsonMode::Lines).write_value(&info, settings.pretty)?;
        }
    }

    Ok(())
}

fn list_labels(settings: &Settings) -> Result<()> {
    let artifact = open(settings)?;

    match settings.format {
        OutputFormat::Text => {
            for (index, label) in &artifact.metadata.names {
                println!("{index:>4}  {label}");
            }
        }
        OutputFormat::Json | OutputFormat::Jsonl => {
            JsonOutput::stdout(JsonMode::Lines)
                .write_value(&*artifact.metadata.labels(), settings.pretty)?;
        }
    }

    Ok(())
}

fn print_path(settings: &Settings) {
    let dir = &settings.model_dir;
    println!("{}", dir.display());
    if !is_installed(dir) {
        eprintln!("warning: no model installed at {}", dir.display());
    }
}
