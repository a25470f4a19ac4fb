//! Fixed-geometry text recognition for game-UI labels.
//!
//! An image is stretched to a model's exact input geometry, collapsed
//! to grayscale intensities in [0, 1], laid out as a [1, 1, H, W]
//! tensor, and run through a pre-trained ONNX sequence model via tract.
//! The per-timestep class scores come back out as a string through CTC
//! greedy decoding.

pub mod alphabet;
pub mod decoder;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod registry;
pub mod transform;

pub use alphabet::Alphabet;
pub use decoder::CtcDecoder;
pub use error::{OcrError, OcrResult};
pub use ocr::Ocr;
pub use pipeline::RecognitionPipeline;
pub use registry::{ModelConfig, ModelRegistry};
