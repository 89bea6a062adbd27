//! Bone-mapping exporter: the producer side of the interchange format.

use std::fmt::Write as _;

use crate::joint::JointId;
use crate::mapping::{HIERARCHY_SECTION_HEADER, HUMANOID_SECTION_HEADER, NONE_SENTINEL};
use crate::skeleton::{full_path, relative_path, walk_hierarchy, SkeletonSource};

/// Render the interchange text for `skeleton`.
///
/// The humanoid section lists every joint with its path relative to the root
/// (the same form the resolver derives), so the output can be loaded back as
/// an override table unchanged. The hierarchy section lists every transform
/// with its full path and the joint bound to it.
pub fn export_bone_mapping<S: SkeletonSource + ?Sized>(skeleton: &S, avatar_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Avatar Bone Mapping: {avatar_name}");
    let _ = writeln!(out, "----------------------------------------");

    let _ = writeln!(out, "{HUMANOID_SECTION_HEADER}");
    if skeleton.is_humanoid() {
        let root = skeleton.root();
        for &joint in JointId::ALL {
            match skeleton.joint_transform(joint) {
                Some(t) => {
                    let _ = writeln!(out, "{joint}: {}", relative_path(skeleton, t, root));
                }
                None => {
                    let _ = writeln!(out, "{joint}: {NONE_SENTINEL}");
                }
            }
        }
    } else {
        log::warn!("'{avatar_name}' is not humanoid; exporting hierarchy only");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{HIERARCHY_SECTION_HEADER}");
    for (transform, _parent) in walk_hierarchy(skeleton, skeleton.root()) {
        let joint = if skeleton.is_humanoid() {
            skeleton.joint_at(transform)
        } else {
            None
        };
        let label = joint.map(JointId::name).unwrap_or(NONE_SENTINEL);
        let _ = writeln!(out, "{}: {label}", full_path(skeleton, transform));
    }
    out
}
