//! Error types for skeleton snapshots, joint resolution and mapping files.

use std::path::PathBuf;

use thiserror::Error;

use crate::joint::JointId;

/// Structural problems with a skeleton snapshot or joint names.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("unknown humanoid joint '{0}'")]
    UnknownJoint(String),
    #[error("skeleton '{skeleton}': transform {index} has parent {parent} out of range")]
    ParentOutOfRange {
        skeleton: String,
        index: usize,
        parent: usize,
    },
    #[error("skeleton '{skeleton}': root index {root} out of range ({len} transforms)")]
    RootOutOfRange {
        skeleton: String,
        root: usize,
        len: usize,
    },
    #[error("skeleton '{skeleton}': joint {joint} bound to missing transform {index}")]
    JointOutOfRange {
        skeleton: String,
        joint: JointId,
        index: usize,
    },
    #[error("skeleton '{skeleton}': parent chain of transform {index} forms a cycle")]
    Cycle { skeleton: String, index: usize },
    #[error("skeleton json parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A joint that has neither an override entry nor a live transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("joint {0} has no override path and no transform in the skeleton")]
    NotFound(JointId),
}

/// Failure to read a bone-mapping interchange file.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("bone mapping file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read bone mapping file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
