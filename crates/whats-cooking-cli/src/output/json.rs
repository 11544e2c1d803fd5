//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use serde::Serialize;
use whats_cooking_core::{PredictionRecord, ResultOutput};

use super::{lock, SharedWriter};

/// How records are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonMode {
    /// One object per line, written as records arrive.
    Lines,
    /// A single array written on flush.
    Array {
        /// Indent the array.
        pretty: bool,
    },
}

/// JSON output adapter.
pub struct JsonOutput {
    writer: SharedWriter,
    mode: JsonMode,
    pending: Mutex<Vec<PredictionRecord>>,
}

impl JsonOutput {
    /// Creates a JSON output writing to stdout.
    #[must_use]
    pub fn stdout(mode: JsonMode) -> Self {
        Self::new(Box::new(io::stdout()), mode)
    }

    /// Creates a JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, mode: JsonMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            mode,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Writes any serializable value on its own line.
    pub fn write_value<T: Serialize + ?Sized>(&self, value: &T, pretty: bool) -> io::Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut writer = lock(&self.writer)?;
        writeln!(writer, "{json}")?;
        writer.flush()
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &PredictionRecord) -> io::Result<()> {
        match self.mode {
            JsonMode::Lines => self.write_value(record, false),
            JsonMode::Array { .. } => {
                self.pending
                    .lock()
                    .map_err(|e| io::Error::other(format!("Lock poisoned: {e}")))?
                    .push(record.clone());
                Ok(())
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        if let JsonMode::Array { pretty } = self.mode {
            let records = std::mem::take(
                &mut *self
                    .pending
                    .lock()
                    .map_err(|e| io::Error::other(format!("Lock poisoned: {e}")))?,
            );
            self.write_value(&records, pretty)?;
        }
        lock(&self.writer)?.flush()
    }
}
