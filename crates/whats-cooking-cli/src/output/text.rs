//! Human readable output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use whats_cooking_core::{Outcome, Prediction, PredictionRecord, ResultOutput};

use super::{lock, SharedWriter};

/// Writes predictions as the sentences people read in a terminal.
pub struct TextOutput {
    writer: SharedWriter,
}

impl TextOutput {
    /// Creates a text output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a text output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes the banner shown before a batch.
    pub fn header(&self, total: usize) -> io::Result<()> {
        let mut writer = lock(&self.writer)?;
        writeln!(writer, "--- Running predictions on {total} images ---")
    }

    /// Writes the banner shown after a batch.
    pub fn footer(&self) -> io::Result<()> {
        let mut writer = lock(&self.writer)?;
        writeln!(writer)?;
        writeln!(writer, "--- All predictions complete! ---")?;
        writer.flush()
    }

    /// Writes the answer for a single image.
    pub fn write_prediction(&self, prediction: &Prediction) -> io::Result<()> {
        let mut writer = lock(&self.writer)?;
        writeln!(writer, "I am {} sure this is:", prediction.confidence_display())?;
        writeln!(writer, "{}", prediction.label)?;
        writer.flush()
    }
}

impl ResultOutput for TextOutput {
    fn write(&self, record: &PredictionRecord) -> io::Result<()> {
        let mut writer = lock(&self.writer)?;
        writeln!(writer)?;
        match &record.outcome {
            Outcome::Classified { label, confidence } => {
                writeln!(writer, "Processing: {}", record.path)?;
                writeln!(writer, "==> I am {confidence:.2}% sure this is: {label}")
            }
            Outcome::Failed { error } => {
                writeln!(writer, "--- ERROR processing {} ---", record.path)?;
                writeln!(writer, "Error details: {error}")
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        lock(&self.writer)?.flush()
    }
}
