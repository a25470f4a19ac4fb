//! CTC greedy ("best path") decoding.
//!
//! The model emits one score vector per timestep over the alphabet plus
//! the trailing blank class. Decoding takes the argmax at every
//! timestep, then collapses runs of the same class into one emission
//! and drops blanks. The run comparison is against the previous
//! *class*, not the previous emitted symbol: a blank between two
//! identical letters resets the run, so A, blank, A decodes to "AA".

use tract_onnx::prelude::tract_ndarray::Axis;
use tract_onnx::prelude::Tensor;
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{OcrError, OcrResult};

pub struct CtcDecoder {
    alphabet: Alphabet,
}

impl CtcDecoder {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// Decodes a [seq_len, 1, num_classes] score tensor.
    ///
    /// Scores need not be normalized probabilities; only their relative
    /// ordering matters. A tensor whose class dimension disagrees with
    /// the alphabet is a configuration error and is rejected up front.
    pub fn decode(&self, output: &Tensor) -> OcrResult<String> {
        let expected = self.alphabet.num_classes();
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| OcrError::InferenceEngineFailed(e.into()))?;
        let shape = view.shape();
        if shape.len() != 3 || shape[2] != expected {
            return Err(OcrError::DimensionMismatch {
                expected,
                got: shape.last().copied().unwrap_or(0),
            });
        }

        let blank = self.alphabet.blank_index();
        let seq_len = shape[0];
        let mut result = String::new();
        let mut prev: Option<usize> = None;
        for t in 0..seq_len {
            let step = view.index_axis(Axis(0), t);
            let scores = step.index_axis(Axis(0), 0);

            // strict ">": on a tie the lowest class index wins
            let mut best = 0;
            let mut best_score = f32::NEG_INFINITY;
            for (class, &score) in scores.iter().enumerate() {
                if score > best_score {
                    best = class;
                    best_score = score;
                }
            }

            if prev != Some(best) && best != blank {
                if let Some(symbol) = self.alphabet.symbol(best) {
                    result.push(symbol);
                }
            }
            prev = Some(best);
        }

        debug!(seq_len, decoded_len = result.len(), "ctc decode");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tract_onnx::prelude::tract_ndarray::{Array2, Array3};

    fn toy_decoder() -> CtcDecoder {
        // {A, B}, blank index 2, three classes
        CtcDecoder::new(Alphabet::new("AB"))
    }

    fn tensor_from_classes(classes: &[usize], num_classes: usize) -> Tensor {
        let mut arr = Array3::<f32>::zeros((classes.len(), 1, num_classes));
        for (t, &class) in classes.iter().enumerate() {
            arr[[t, 0, class]] = 1.0;
        }
        arr.into()
    }

    #[test]
    fn collapses_runs_and_drops_blanks() {
        // A A _ A B B _ _
        let tensor = tensor_from_classes(&[0, 0, 2, 0, 1, 1, 2, 2], 3);
        assert_eq!(toy_decoder().decode(&tensor).unwrap(), "AAB");
    }

    #[test]
    fn blank_resets_repeat_suppression() {
        // _ A _ A _  must NOT collapse into a single A
        let tensor = tensor_from_classes(&[2, 0, 2, 0, 2], 3);
        assert_eq!(toy_decoder().decode(&tensor).unwrap(), "AA");
    }

    #[test]
    fn run_of_any_length_emits_once() {
        let tensor = tensor_from_classes(&[1, 1, 1, 1, 1], 3);
        assert_eq!(toy_decoder().decode(&tensor).unwrap(), "B");
    }

    #[test]
    fn decoding_is_deterministic() {
        let tensor = tensor_from_classes(&[0, 2, 1, 1, 2, 0], 3);
        let decoder = toy_decoder();
        assert_eq!(
            decoder.decode(&tensor).unwrap(),
            decoder.decode(&tensor).unwrap()
        );
    }

    #[test]
    fn tie_breaks_to_lowest_index() {
        // every class ties; the first index attaining the max must win
        let arr = Array3::<f32>::from_elem((1, 1, 3), 0.5);
        let tensor: Tensor = arr.into();
        assert_eq!(toy_decoder().decode(&tensor).unwrap(), "A");
    }

    #[test]
    fn all_blank_decodes_empty() {
        let tensor = tensor_from_classes(&[2, 2, 2], 3);
        assert_eq!(toy_decoder().decode(&tensor).unwrap(), "");
    }

    #[test]
    fn trailing_dimension_mismatch_is_rejected() {
        let arr = Array3::<f32>::zeros((4, 1, 5));
        let tensor: Tensor = arr.into();
        match toy_decoder().decode(&tensor) {
            Err(OcrError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 3);
                assert_eq!(got, 5);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn wrong_rank_is_rejected() {
        let arr = Array2::<f32>::zeros((4, 3));
        let tensor: Tensor = arr.into();
        assert!(matches!(
            toy_decoder().decode(&tensor),
            Err(OcrError::DimensionMismatch { .. })
        ));
    }
}
