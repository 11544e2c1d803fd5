//! Batch runner: classify every image of a source, recording failures.

use tracing::{info, warn};

use crate::domain::{Outcome, PredictionRecord};
use crate::error::{Error, LoadError};
use crate::inference::ModelProvider;
use crate::ports::{Classifier, ImageSource, ProgressEvent, ProgressSink, ResultOutput};
use crate::predict::predict;

/// Totals of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images classified.
    pub processed: usize,
    /// Images that failed to load or classify.
    pub skipped: usize,
}

impl BatchSummary {
    /// Total images seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.skipped
    }
}

/// Classifies every image from `source`, writing one record per image.
///
/// The model is acquired once before the loop. Per-image failures are
/// written as failed records and processing continues.
///
/// # Errors
///
/// Returns [`Error::Load`] if the model cannot be loaded (nothing is
/// processed), or [`Error::Output`] if writing a record fails.
pub fn run_batch(
    source: &dyn ImageSource,
    provider: &ModelProvider<dyn Classifier>,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<BatchSummary, Error> {
    let classifier = provider.get().map_err(|e: LoadError| {
        warn!("Model load failed, aborting batch: {e}");
        e
    })?;

    let total = source.count_hint();
    info!("Running predictions on {} images", total.unwrap_or(0));

    let mut summary = BatchSummary::default();

    for (index, entry) in source.images().enumerate() {
        let path = entry.path;

        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let result = entry
            .image
            .and_then(|image| predict(classifier.as_ref(), &image.image));

        let outcome = match result {
            Ok(prediction) => {
                summary.processed += 1;
                progress.on_event(ProgressEvent::Completed {
                    path: path.clone(),
                    prediction: prediction.clone(),
                });
                Outcome::from(prediction)
            }
            Err(e) => {
                warn!("Failed to classify {path}: {e}");
                summary.skipped += 1;
                progress.on_event(ProgressEvent::Skipped {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        output.write(&PredictionRecord::now(path, outcome))?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished {
        processed: summary.processed,
        skipped: summary.skipped,
    });

    Ok(summary)
}
