//! Per-model recognition pipeline.
//!
//! Binds one tract session to the preprocessing steps and decoder for a
//! single model geometry. Construction is the expensive part; a built
//! pipeline is immutable and safe to share across concurrent calls.

use std::path::Path;

use image::DynamicImage;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::decoder::CtcDecoder;
use crate::error::{OcrError, OcrResult};
use crate::registry::ModelConfig;
use crate::transform::{
    GenericTransform, ImageTransform, PipelineValue, ResizeExact, ToGray, ToIntensityArray,
    ToTensor,
};

/// Output node name fixed at model export time.
const OUTPUT_NAME: &str = "output";

type TractSimplePlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub struct RecognitionPipeline {
    steps: Vec<ImageTransform>,
    model: TractSimplePlan,
    decoder: CtcDecoder,
}

impl RecognitionPipeline {
    /// Loads the model artifact for `config` from `model_dir`.
    ///
    /// The artifact existence check runs before the engine touches the
    /// file, so an absent model is reported as such rather than as an
    /// engine failure.
    pub fn new(config: &ModelConfig, alphabet: Alphabet, model_dir: &Path) -> OcrResult<Self> {
        let artifact = model_dir.join(&config.artifact);
        if !artifact.exists() {
            return Err(OcrError::ModelArtifactMissing(artifact));
        }

        debug!(
            model_type = %config.model_type,
            path = %artifact.display(),
            width = config.input_width,
            height = config.input_height,
            "loading recognition model"
        );
        let model = Self::load_model(&artifact, config)
            .map_err(|e| OcrError::InferenceEngineFailed(e.into()))?;

        Ok(Self {
            steps: vec![
                ResizeExact::bilinear(config.into()).into(),
                ToGray {}.into(),
                ToIntensityArray {}.into(),
                ToTensor {}.into(),
            ],
            model,
            decoder: CtcDecoder::new(alphabet),
        })
    }

    fn load_model(artifact: &Path, config: &ModelConfig) -> TractResult<TractSimplePlan> {
        let input_shape = tvec!(1, 1, config.input_height, config.input_width);
        let model = tract_onnx::onnx()
            .model_for_path(artifact)?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))?
            .with_output_names(vec![OUTPUT_NAME])?;
        model.into_optimized()?.into_runnable()
    }

    /// Image → normalized [1, 1, H, W] tensor for this model's geometry.
    pub fn preprocess(&self, image: DynamicImage) -> OcrResult<Tensor> {
        let mut value = PipelineValue::Image(image);
        for step in &self.steps {
            value = step
                .transform(value)
                .map_err(|e| OcrError::PreprocessingFailed(e.into()))?;
        }
        match value {
            PipelineValue::Tensor(tensor) => Ok(tensor),
            _ => Err(OcrError::PreprocessingFailed(
                "step chain did not end in a tensor".into(),
            )),
        }
    }

    /// Single-shot recognition of one image through this model.
    pub fn recognize(&self, image: DynamicImage) -> OcrResult<String> {
        let input = self.preprocess(image)?;
        let outputs = self
            .model
            .run(tvec!(input))
            .map_err(|e| OcrError::InferenceEngineFailed(e.into()))?;
        self.decoder.decode(&outputs[0])
    }
}
