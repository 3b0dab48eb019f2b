//! Model artifact loading
//!
//! Reads one serialized regressor from disk at startup. Any failure here is
//! fatal: the service never starts without a model.

use crate::error::ArtifactLoadError;
use crate::predictor::{LinearModelArtifact, LinearRegressor, OnnxRegressor, Regressor};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Serialization format of a model artifact, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Linear regression coefficients as JSON
    LinearJson,
    /// ONNX graph
    Onnx,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ArtifactFormat::LinearJson),
            "onnx" => Some(ArtifactFormat::Onnx),
            _ => None,
        }
    }
}

/// Load a model artifact
pub fn load(path: impl AsRef<Path>) -> Result<Arc<dyn Regressor>, ArtifactLoadError> {
    load_verified(path, None)
}

/// Load a model artifact, checking its SHA256 digest when one is given
pub fn load_verified(
    path: impl AsRef<Path>,
    expected_sha256: Option<&str>,
) -> Result<Arc<dyn Regressor>, ArtifactLoadError> {
    let path = path.as_ref();

    let format = ArtifactFormat::from_path(path).ok_or_else(|| {
        ArtifactLoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    })?;

    let bytes = read_artifact(path)?;
    let checksum = compute_checksum(&bytes);

    if let Some(expected) = expected_sha256 {
        if !checksum.eq_ignore_ascii_case(expected.trim()) {
            return Err(ArtifactLoadError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: expected.trim().to_string(),
                actual: checksum,
            });
        }
        debug!(checksum = %checksum, "Model checksum validated");
    }

    let model: Arc<dyn Regressor> = match format {
        ArtifactFormat::LinearJson => {
            let artifact: LinearModelArtifact =
                serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e.to_string()))?;
            Arc::new(LinearRegressor::from_artifact(artifact).map_err(|e| corrupt(path, e))?)
        }
        ArtifactFormat::Onnx => {
            let version = version_from_checksum(&checksum);
            Arc::new(
                OnnxRegressor::new(&bytes, version).map_err(|e| corrupt(path, format!("{:#}", e)))?,
            )
        }
    };

    info!(
        path = %path.display(),
        kind = model.kind(),
        version = %model.version(),
        size = bytes.len(),
        "Model artifact loaded"
    );

    Ok(model)
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn corrupt(path: &Path, reason: String) -> ArtifactLoadError {
    ArtifactLoadError::Corrupt {
        path: PathBuf::from(path),
        reason,
    }
}

/// ONNX graphs carry no version of their own; use a checksum prefix
fn version_from_checksum(checksum: &str) -> String {
    format!("sha256:{}", &checksum[..12.min(checksum.len())])
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
