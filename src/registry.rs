//! Static model configuration table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Immutable geometry and artifact identity for one model type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_type: String,
    pub input_width: usize,
    pub input_height: usize,
    /// File name of the ONNX artifact, resolved against the model directory.
    pub artifact: String,
}

/// Exact-key lookup table, one entry per supported model type.
///
/// Pure configuration data. Built once at startup and never mutated
/// afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelRegistry {
    configs: HashMap<String, ModelConfig>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two models shipped with the tool.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ModelConfig {
            model_type: "melon".into(),
            input_width: 160,
            input_height: 32,
            artifact: "melon.onnx".into(),
        });
        registry.register(ModelConfig {
            model_type: "nol".into(),
            input_width: 96,
            input_height: 32,
            artifact: "nol.onnx".into(),
        });
        registry
    }

    pub fn register(&mut self, config: ModelConfig) {
        self.configs.insert(config.model_type.clone(), config);
    }

    pub fn lookup(&self, model_type: &str) -> Result<&ModelConfig, OcrError> {
        self.configs
            .get(model_type)
            .ok_or_else(|| OcrError::UnsupportedModelType(model_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_models_resolve() {
        let registry = ModelRegistry::builtin();
        let melon = registry.lookup("melon").unwrap();
        assert_eq!(melon.input_width, 160);
        assert_eq!(melon.input_height, 32);
        assert_eq!(melon.artifact, "melon.onnx");
        assert!(registry.lookup("nol").is_ok());
    }

    #[test]
    fn unknown_key_carries_the_key() {
        let registry = ModelRegistry::builtin();
        match registry.lookup("foo") {
            Err(OcrError::UnsupportedModelType(key)) => assert_eq!(key, "foo"),
            other => panic!("expected UnsupportedModelType, got {other:?}"),
        }
    }
}
