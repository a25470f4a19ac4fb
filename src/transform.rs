//! Image-to-tensor preprocessing steps.
//!
//! Each step consumes a [`PipelineValue`] and produces the next one;
//! the chain for a recognition model is resize, grayscale, intensity
//! scaling, tensor conversion. The resize stretches both axes to the
//! exact model geometry with no letterboxing or cropping; the models
//! are trained on stretched glyphs, so any aspect-preserving shortcut
//! here shifts every downstream prediction.

use enum_dispatch::enum_dispatch;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::Tensor;

use crate::registry::ModelConfig;

#[enum_dispatch]
#[derive(Clone, Serialize, Deserialize)]
pub enum ImageTransform {
    ResizeExact(ResizeExact),
    ToGray(ToGray),
    ToIntensityArray(ToIntensityArray),
    ToTensor(ToTensor),
}

#[enum_dispatch(ImageTransform)]
pub trait GenericTransform {
    fn transform(&self, input: PipelineValue) -> Result<PipelineValue, &'static str>;
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "FilterType")]
enum FilterOption {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

/// Target geometry for one model input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl From<&ModelConfig> for ImageSize {
    fn from(config: &ModelConfig) -> Self {
        ImageSize {
            width: config.input_width,
            height: config.input_height,
        }
    }
}

/// Stretch to the exact model geometry, aspect ratio ignored.
#[serde_as]
#[derive(Clone, Serialize, Deserialize)]
pub struct ResizeExact {
    pub image_size: ImageSize,
    #[serde(with = "FilterOption")]
    pub filter: FilterType,
}

impl ResizeExact {
    /// Bilinear kernel, matching the training-time resize.
    pub fn bilinear(image_size: ImageSize) -> Self {
        Self {
            image_size,
            filter: FilterType::Triangle,
        }
    }
}

impl GenericTransform for ResizeExact {
    fn transform(&self, input: PipelineValue) -> Result<PipelineValue, &'static str> {
        match input {
            PipelineValue::Image(image) => Ok(PipelineValue::Image(image.resize_exact(
                self.image_size.width as u32,
                self.image_size.height as u32,
                self.filter,
            ))),
            PipelineValue::Gray(_) => Err("resize not implemented for gray image"),
            PipelineValue::Array(_) => Err("resize not implemented for array"),
            PipelineValue::Tensor(_) => Err("resize not implemented for tensor"),
        }
    }
}

/// Collapse to single-channel intensity.
#[derive(Clone, Serialize, Deserialize)]
pub struct ToGray {}

impl GenericTransform for ToGray {
    fn transform(&self, input: PipelineValue) -> Result<PipelineValue, &'static str> {
        match input {
            PipelineValue::Image(image) => Ok(PipelineValue::Gray(image.to_luma8())),
            PipelineValue::Gray(image) => Ok(PipelineValue::Gray(image)),
            _ => Err("grayscale conversion expects an image"),
        }
    }
}

/// Scale 8-bit intensities into [0, 1] and lay them out as an NCHW
/// [1, 1, H, W] array, height-major then width.
#[derive(Clone, Serialize, Deserialize)]
pub struct ToIntensityArray {}

impl GenericTransform for ToIntensityArray {
    fn transform(&self, input: PipelineValue) -> Result<PipelineValue, &'static str> {
        match input {
            PipelineValue::Gray(image) => {
                let (width, height) = image.dimensions();
                let arr = Array4::from_shape_fn(
                    (1_usize, 1_usize, height as usize, width as usize),
                    |(_, _, y, x)| image[(x as u32, y as u32)][0] as f32 / 255.0,
                );
                Ok(PipelineValue::Array(arr))
            }
            _ => Err("intensity scaling expects a gray image"),
        }
    }
}

/// Hand the array over to the engine.
#[derive(Clone, Serialize, Deserialize)]
pub struct ToTensor {}

impl GenericTransform for ToTensor {
    fn transform(&self, input: PipelineValue) -> Result<PipelineValue, &'static str> {
        match input {
            PipelineValue::Array(arr) => Ok(PipelineValue::Tensor(arr.into())),
            PipelineValue::Tensor(tensor) => Ok(PipelineValue::Tensor(tensor)),
            _ => Err("tensor conversion expects an array"),
        }
    }
}

/// Intermediate value passed between steps.
pub enum PipelineValue {
    Image(DynamicImage),
    Gray(GrayImage),
    Array(Array4<f32>),
    Tensor(Tensor),
}

impl From<DynamicImage> for PipelineValue {
    fn from(image: DynamicImage) -> Self {
        PipelineValue::Image(image)
    }
}

impl From<GrayImage> for PipelineValue {
    fn from(image: GrayImage) -> Self {
        PipelineValue::Gray(image)
    }
}

impl From<Tensor> for PipelineValue {
    fn from(tensor: Tensor) -> Self {
        PipelineValue::Tensor(tensor)
    }
}
