//! ONNX inference using tract
//!
//! Runs a plain-ONNX regression graph (`MatMul`/`Gemm` plus `Add`) with a
//! single `f32[1, 7]` input and a scalar or `[1, 1]` output. Graphs using
//! the `ai.onnx.ml` operator set, such as the `LinearRegressor` node that
//! skl2onnx emits for scikit-learn linear models, are rejected at load time.

use super::{ensure_finite, Regressor};
use crate::error::InferenceError;
use crate::models::{FeatureVector, NUM_FEATURES};
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::pb::ModelProto;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

/// Operator set tract cannot translate into runnable ops
const ONNX_ML_DOMAIN: &str = "ai.onnx.ml";

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based regressor
pub struct OnnxRegressor {
    model: TractModel,
    version: String,
}

impl OnnxRegressor {
    /// Create a regressor from model bytes
    pub fn new(model_bytes: &[u8], version: impl Into<String>) -> Result<Self> {
        let model = Self::load_model(model_bytes)?;
        Ok(Self {
            model,
            version: version.into(),
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<TractModel> {
        let onnx = tract_onnx::onnx();
        let proto = onnx
            .proto_model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?;
        reject_onnx_ml(&proto)?;

        let model = onnx
            .model_for_proto_model(&proto)
            .context("Failed to build ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn features_to_tensor(features: &FeatureVector) -> Result<Tensor, InferenceError> {
        let data: Vec<f32> = features.as_slice().iter().map(|v| *v as f32).collect();
        tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)
            .map(Tensor::from)
            .map_err(|e| InferenceError::Backend(e.to_string()))
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let start = Instant::now();
        let input = Self::features_to_tensor(features)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::Backend(format!("{:#}", e)))?;
        let output = result.first().ok_or(InferenceError::EmptyOutput)?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Backend(format!("{:#}", e)))?;
        let value = view.iter().next().copied().ok_or(InferenceError::EmptyOutput)?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        ensure_finite(value as f64)
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Fail with a readable reason when the graph needs the ONNX-ML operator set
fn reject_onnx_ml(proto: &ModelProto) -> Result<()> {
    let nodes = proto.graph.as_ref().map(|g| g.node.as_slice()).unwrap_or_default();
    if let Some(node) = nodes.iter().find(|n| n.domain == ONNX_ML_DOMAIN) {
        anyhow::bail!(
            "operator {} from the {} domain is not supported; export the regressor as plain ONNX (MatMul/Gemm + Add)",
            node.op_type,
            ONNX_ML_DOMAIN
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(OnnxRegressor::new(b"definitely not a protobuf graph", "v1").is_err());
    }
}
