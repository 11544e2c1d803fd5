//! Mock implementations of core port traits.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use image::DynamicImage;
use whats_cooking_core::{
    Classification, Classifier, ImageInfo, ImageSource, InferenceError, ModelProvider,
    PredictionRecord, ProgressEvent, ProgressSink, ResultOutput, SourcedImage,
};

/// Mock implementation of `Classifier` for testing.
///
/// Returns a fixed top-1 class and counts calls.
pub struct MockClassifier {
    labels: Arc<[String]>,
    top_index: usize,
    top_confidence: f32,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// Creates a mock with the given labels, predicting class 0 at 0.5.
    #[must_use]
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            top_index: 0,
            top_confidence: 0.5,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sets the top-1 index and its confidence (0.0 to 1.0).
    #[must_use]
    pub fn with_top(mut self, index: usize, confidence: f32) -> Self {
        self.top_index = index;
        self.top_confidence = confidence;
        self
    }

    /// Makes every call fail with an `InvalidOutput` error.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Returns the number of times `classify` was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for MockClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, _image: &DynamicImage) -> Result<Classification, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(InferenceError::InvalidOutput {
                message: message.clone(),
            });
        }
        Ok(Classification {
            top_index: self.top_index,
            top_confidence: self.top_confidence,
            labels: Arc::clone(&self.labels),
        })
    }
}

/// Builds a provider around `classifier` whose loader counts invocations.
///
/// Returns the provider and the shared load counter.
#[must_use]
pub fn counting_provider(
    classifier: MockClassifier,
) -> (ModelProvider<dyn Classifier>, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let model: Arc<dyn Classifier> = Arc::new(classifier);
    let provider = ModelProvider::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&model))
    });
    (provider, loads)
}

/// One scripted entry of a `MockImageSource`.
enum MockEntry {
    Image(ImageInfo),
    Missing(String),
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images and scripted missing files, and tracks iteration.
pub struct MockImageSource {
    entries: Vec<MockEntry>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(MockEntry::Image).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails as a missing file.
    #[must_use]
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.entries.push(MockEntry::Missing(path.into()));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourcedImage> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.entries.iter().map(|entry| match entry {
            MockEntry::Image(info) => SourcedImage {
                path: info.path.clone(),
                image: Ok(info.clone()),
            },
            MockEntry::Missing(path) => SourcedImage {
                path: path.clone(),
                image: Err(InferenceError::Read {
                    path: PathBuf::from(path),
                    source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
                }),
            },
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<PredictionRecord>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<PredictionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &PredictionRecord) -> io::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the paths of skipped images, in order.
    #[must_use]
    pub fn skipped_paths(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Skipped { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
