//! Transform paths as written into animation bindings.
//!
//! Names are joined root-to-leaf with '/'; the skeleton root itself is never
//! part of a relative path, so the root's own path is the empty string.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyPath {
    /// Transform names from the first child of the root down to the target.
    pub segments: Vec<String>,
}

impl HierarchyPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
