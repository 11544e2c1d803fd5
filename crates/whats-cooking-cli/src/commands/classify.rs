//! Classify command - name the food in one image.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use whats_cooking_adapters::fs::load_image;
use whats_cooking_core::{predict, ImageInfo, Outcome, PredictionRecord};

use super::{ExitCode, OutputFormat, Settings};
use crate::output::{JsonMode, JsonOutput, ProgressBar, TextOutput};

/// Path argument meaning "read the encoded image from stdin".
const STDIN: &str = "-";

/// Arguments for the classify command.
#[derive(Args, Clone)]
pub struct ClassifyArgs {
    /// Image file, or `-` to read encoded bytes (e.g. a camera capture) from stdin
    pub image: String,
}

/// Run the classify command.
///
/// Any failure is fatal here: there is only one image to report on.
pub fn run(args: &ClassifyArgs, settings: &Settings) -> Result<ExitCode> {
    let provider = settings.model_provider();

    let spinner = ProgressBar::spinner("Loading model...", settings.show_progress());
    let classifier = provider.get().with_context(|| {
        format!(
            "failed to load model from {}",
            settings.model_dir.display()
        )
    })?;

    let image = read_image(&args.image)?;
    info!(
        "Classifying {} ({}x{})",
        image.path, image.width, image.height
    );

    spinner.set_message("Thinking...");
    let prediction = predict(classifier.as_ref(), &image.image)
        .with_context(|| format!("failed to classify {}", image.path))?;
    drop(spinner);

    match settings.format {
        OutputFormat::Text => TextOutput::stdout().write_prediction(&prediction)?,
        OutputFormat::Json | OutputFormat::Jsonl => {
            let record = PredictionRecord::now(image.path, Outcome::from(prediction));
            let pretty = settings.pretty && settings.format == OutputFormat::Json;
            JsonOutput::stdout(JsonMode::Lines).write_value(&record, pretty)?;
        }
    }

    Ok(ExitCode::Success)
}

fn read_image(arg: &str) -> Result<ImageInfo> {
    if arg == STDIN {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read image from stdin")?;
        if bytes.is_empty() {
            anyhow::bail!("no image data on stdin");
        }
        return ImageInfo::from_bytes("<stdin>", &bytes)
            .context("failed to decode image from stdin");
    }

    load_image(Path::new(arg)).map_err(Into::into)
}
