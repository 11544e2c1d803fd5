//! Output formatting for CLI.

mod json;
mod progress;
mod text;

pub use json::{JsonMode, JsonOutput};
pub use progress::ProgressBar;
pub use text::TextOutput;

use std::io;
use std::sync::{Mutex, MutexGuard};

type SharedWriter = Mutex<Box<dyn io::Write + Send>>;

fn lock(writer: &SharedWriter) -> io::Result<MutexGuard<'_, Box<dyn io::Write + Send>>> {
    writer
        .lock()
        .map_err(|e| io::Error::other(format!("Lock poisoned: {e}")))
}
