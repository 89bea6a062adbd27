//! Errors raised while composing a controller or persisting its assets.

use std::path::PathBuf;

use thiserror::Error;

use avatrack_api_core::ValueKind;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no skeleton supplied; a humanoid skeleton is required to generate tracking layers")]
    MissingSkeleton,
    #[error("skeleton '{0}' has no humanoid definition")]
    NotHumanoid(String),
    #[error("parameter '{name}' is already declared as {existing}, tracking needs {expected}")]
    ParameterConflict {
        name: String,
        existing: ValueKind,
        expected: ValueKind,
    },
    #[error("layer '{layer}' drives '{name}' which the catalog does not declare as {expected}")]
    UndeclaredParameter {
        layer: String,
        name: String,
        expected: ValueKind,
    },
    #[error("state machine '{machine}' is malformed: {reason}")]
    InvalidMachine { machine: String, reason: String },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Failure while creating folders or writing generated assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset path '{path}' must be relative and must not contain '..'")]
    InvalidPath { path: String },
    #[error("failed to create folder {}: {source}", path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize asset '{path}': {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write asset {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
