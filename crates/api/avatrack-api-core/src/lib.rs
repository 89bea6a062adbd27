//! avatrack-api-core: value and hierarchy-path types shared by the rig and controller crates.

pub mod hierarchy_path;
pub mod value;

pub use hierarchy_path::HierarchyPath;
pub use value::{Value, ValueKind};
