//! Model artifact fixtures.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use whats_cooking_adapters::{METADATA_FILE, WEIGHTS_FILE};
use whats_cooking_core::{ModelMetadata, YoloV8Cls};

/// Labels used by fixtures, taken from the demo's food photos.
pub const FOOD_LABELS: &[&str] = &[
    "chocolate_cake",
    "fried_chicken",
    "shrimp_and_grits",
    "tacos",
    "tomato_soup",
];

/// Writes an artifact directory with randomly initialized weights.
///
/// The weights have the exact names and shapes a real export has, so the
/// artifact exercises the full loading path. Predictions are meaningless.
///
/// # Errors
///
/// Returns an error if building the network or writing files fails.
pub fn write_model_artifact(dir: &Path, metadata: &ModelMetadata) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    YoloV8Cls::new(vb, metadata.scale, metadata.num_classes()).context("build network")?;
    varmap
        .save(dir.join(WEIGHTS_FILE))
        .context("save weights")?;

    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(dir.join(METADATA_FILE), json).context("write metadata")?;

    Ok(())
}
