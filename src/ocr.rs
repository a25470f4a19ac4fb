//! End-to-end entry point wiring the registry, the session cache, and
//! the image-to-string call together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{OcrError, OcrResult};
use crate::pipeline::RecognitionPipeline;
use crate::registry::ModelRegistry;

/// Orchestrates recognition calls.
///
/// Sessions are expensive to build, so one [`RecognitionPipeline`] per
/// model type is constructed lazily, exactly once, and shared for the
/// life of this value. Pipelines are immutable after construction and
/// reusable across concurrent calls.
pub struct Ocr {
    registry: ModelRegistry,
    alphabet: Alphabet,
    model_dir: PathBuf,
    pipelines: Mutex<HashMap<String, Arc<RecognitionPipeline>>>,
}

impl Ocr {
    pub fn new(registry: ModelRegistry, alphabet: Alphabet, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            alphabet,
            model_dir: model_dir.into(),
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    /// Recognizes the label in the image at `image` with the
    /// `model_type` model.
    ///
    /// Fails fast: an unknown model type performs no I/O, and a missing
    /// model artifact is reported before the image file is opened.
    pub fn recognize(&self, image: impl AsRef<Path>, model_type: &str) -> OcrResult<String> {
        let pipeline = self.pipeline(model_type)?;
        let image = image::open(image.as_ref())
            .map_err(|e| OcrError::PreprocessingFailed(e.into()))?;
        pipeline.recognize(image)
    }

    fn pipeline(&self, model_type: &str) -> OcrResult<Arc<RecognitionPipeline>> {
        let mut pipelines = self
            .pipelines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pipeline) = pipelines.get(model_type) {
            return Ok(pipeline.clone());
        }
        let config = self.registry.lookup(model_type)?;
        let pipeline = Arc::new(RecognitionPipeline::new(
            config,
            self.alphabet.clone(),
            &self.model_dir,
        )?);
        debug!(model_type, "pipeline constructed");
        pipelines.insert(model_type.to_string(), pipeline.clone());
        Ok(pipeline)
    }
}
