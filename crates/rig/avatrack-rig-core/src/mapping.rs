//! Bone-mapping override tables and the plain-text interchange format.
//!
//! The interchange file is produced by [`crate::export::export_bone_mapping`]:
//!
//! ```text
//! Avatar Bone Mapping: <avatar>
//! ----------------------------------------
//! --- Humanoid Bone Mappings ---
//! Hips: Armature/Hips
//! LeftEye: none
//!
//! --- All Bones in Hierarchy ---
//! Avatar/Armature/Hips: Hips
//! ```
//!
//! Only the humanoid section is read back. Within it each line is split on the
//! first `:`; entries whose path is the `none` sentinel or whose joint name is
//! unknown are skipped.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::joint::JointId;

pub const HUMANOID_SECTION_HEADER: &str = "--- Humanoid Bone Mappings ---";
pub const HIERARCHY_SECTION_HEADER: &str = "--- All Bones in Hierarchy ---";
/// Written for joints (or transforms) that have no counterpart.
pub const NONE_SENTINEL: &str = "none";
/// Sentinel written by older exporter builds.
const LEGACY_NONE_SENTINEL: &str = "無し";

/// Ordered override table `JointId -> hierarchy path`.
///
/// Paths are kept verbatim; they are not checked against any skeleton.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneMapping {
    entries: IndexMap<JointId, String>,
}

impl BoneMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the path of `joint`, returning the previous path.
    pub fn insert(&mut self, joint: JointId, path: impl Into<String>) -> Option<String> {
        self.entries.insert(joint, path.into())
    }

    pub fn get(&self, joint: JointId) -> Option<&str> {
        self.entries.get(&joint).map(|s| s.as_str())
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.entries.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, &str)> {
        self.entries.iter().map(|(j, p)| (*j, p.as_str()))
    }
}

impl FromIterator<(JointId, String)> for BoneMapping {
    fn from_iter<I: IntoIterator<Item = (JointId, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Non-fatal findings while reading an interchange file. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingWarning {
    /// A line inside the humanoid section without a `:` separator.
    MissingSeparator { line: usize, text: String },
    /// A joint name that is not part of the humanoid set.
    UnknownJoint { line: usize, name: String },
    /// A joint listed twice; the later entry wins.
    DuplicateJoint { line: usize, joint: JointId },
    /// The file never opened the humanoid section.
    NoHumanoidSection,
}

/// Result of parsing an interchange file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedMapping {
    pub mapping: BoneMapping,
    pub warnings: Vec<MappingWarning>,
}

fn is_section_header(line: &str) -> bool {
    line.trim_start().starts_with("---")
}

fn is_none_sentinel(path: &str) -> bool {
    path == NONE_SENTINEL || path == LEGACY_NONE_SENTINEL
}

/// Parse interchange text into an override table.
pub fn parse_bone_mapping(text: &str) -> ParsedMapping {
    let mut parsed = ParsedMapping::default();
    let mut in_humanoid_section = false;
    let mut saw_humanoid_section = false;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if is_section_header(raw) {
            in_humanoid_section = raw.contains(HUMANOID_SECTION_HEADER);
            saw_humanoid_section |= in_humanoid_section;
            continue;
        }
        if !in_humanoid_section {
            continue;
        }

        let Some((name, path)) = raw.split_once(':') else {
            parsed.warnings.push(MappingWarning::MissingSeparator {
                line: line_no,
                text: raw.to_string(),
            });
            continue;
        };
        let name = name.trim();
        let path = path.trim();
        if is_none_sentinel(path) {
            continue;
        }
        let Ok(joint) = name.parse::<JointId>() else {
            parsed.warnings.push(MappingWarning::UnknownJoint {
                line: line_no,
                name: name.to_string(),
            });
            continue;
        };
        if parsed.mapping.insert(joint, path).is_some() {
            parsed.warnings.push(MappingWarning::DuplicateJoint {
                line: line_no,
                joint,
            });
        }
    }

    if !saw_humanoid_section {
        parsed.warnings.push(MappingWarning::NoHumanoidSection);
    }
    parsed
}

/// Read and parse an interchange file.
///
/// An unreadable file is an error; malformed content only produces warnings
/// (logged here and returned to the caller).
pub fn load_bone_mapping(path: impl AsRef<Path>) -> Result<ParsedMapping, MappingError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MappingError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| MappingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_bone_mapping(&text);
    for warning in &parsed.warnings {
        match warning {
            MappingWarning::UnknownJoint { line, name } => {
                log::debug!("{}:{line}: skipping unknown joint '{name}'", path.display())
            }
            other => log::warn!("{}: {other:?}", path.display()),
        }
    }
    log::info!(
        "Loaded {} bone mappings from {}",
        parsed.mapping.len(),
        path.display()
    );
    Ok(parsed)
}
