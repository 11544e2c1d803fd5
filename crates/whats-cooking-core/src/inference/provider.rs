//! Load-once model provider.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::LoadError;

type Loader<T> = Box<dyn Fn() -> Result<Arc<T>, LoadError> + Send + Sync>;

/// A model that defers loading until first access and then serves the same
/// instance for the rest of its lifetime.
///
/// Construct one per process and hand it to whatever needs the model. A
/// failed load is not cached, so the next [`get`](Self::get) tries again.
pub struct ModelProvider<T: ?Sized> {
    loader: Loader<T>,
    model: OnceCell<Arc<T>>,
}

impl<T: ?Sized + Send + Sync> ModelProvider<T> {
    /// Creates a provider that will call `loader` on first access.
    ///
    /// The model will not be loaded until `get()` is called.
    #[must_use]
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, LoadError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            model: OnceCell::new(),
        }
    }

    /// Creates a provider around an already loaded model.
    ///
    /// Its loader hands back the same model, so every `get` serves one instance.
    #[must_use]
    pub fn preloaded(model: Arc<T>) -> Self
    where
        T: 'static,
    {
        let handle = Arc::clone(&model);
        Self {
            loader: Box::new(move || Ok(Arc::clone(&handle))),
            model: OnceCell::with_value(model),
        }
    }

    /// Gets the model, loading it if necessary.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the model is not loaded yet and loading fails.
    pub fn get(&self) -> Result<Arc<T>, LoadError> {
        if self.is_loaded() {
            debug!("Serving cached model");
        }
        self.model
            .get_or_try_init(|| {
                info!("Loading model (this happens only once)");
                let started = Instant::now();
                let model = (self.loader)()?;
                info!("Model loaded in {:.2?}", started.elapsed());
                Ok(model)
            })
            .map(Arc::clone)
    }

    /// Returns true if the model has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }
}

impl<T: ?Sized> fmt::Debug for ModelProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProvider")
            .field("loaded", &self.model.get().is_some())
            .finish_non_exhaustive()
    }
}
