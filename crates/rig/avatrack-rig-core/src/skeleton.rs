//! Skeleton snapshots and the host skeleton port.
//!
//! Hosts expose their live hierarchy through [`SkeletonSource`]. The crate also
//! ships [`Skeleton`], a plain owned snapshot that implements the port and can be
//! loaded from JSON (used by the CLI and the fixtures).

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use avatrack_api_core::HierarchyPath;

use crate::error::RigError;
use crate::joint::JointId;

/// Opaque handle of a transform inside a skeleton.
pub type TransformId = usize;

/// Read access to a host skeleton.
///
/// Implementations must describe a forest whose parent chains terminate; the
/// resolver bounds its walks by [`SkeletonSource::transform_count`] regardless.
pub trait SkeletonSource {
    /// Whether the skeleton carries a humanoid joint definition at all.
    fn is_humanoid(&self) -> bool;
    /// The skeleton root (the character object itself).
    fn root(&self) -> TransformId;
    /// Transform bound to a humanoid joint, if the rig maps it.
    fn joint_transform(&self, joint: JointId) -> Option<TransformId>;
    fn parent(&self, transform: TransformId) -> Option<TransformId>;
    fn name(&self, transform: TransformId) -> &str;
    /// Direct children in hierarchy order.
    fn children(&self, transform: TransformId) -> Vec<TransformId>;
    fn transform_count(&self) -> usize;

    /// Reverse lookup: the first joint (canonical order) bound to `transform`.
    fn joint_at(&self, transform: TransformId) -> Option<JointId> {
        JointId::ALL
            .iter()
            .copied()
            .find(|&joint| self.joint_transform(joint) == Some(transform))
    }
}

/// Depth-first, pre-order walk yielding `(transform, parent)` pairs starting at `start`.
pub struct HierarchyWalk<'a, S: SkeletonSource + ?Sized> {
    skeleton: &'a S,
    stack: Vec<(TransformId, Option<TransformId>)>,
    remaining: usize,
}

impl<'a, S: SkeletonSource + ?Sized> Iterator for HierarchyWalk<'a, S> {
    type Item = (TransformId, Option<TransformId>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (transform, parent) = self.stack.pop()?;
        self.remaining -= 1;
        // Push in reverse so children come out in hierarchy order.
        for child in self.skeleton.children(transform).into_iter().rev() {
            self.stack.push((child, Some(transform)));
        }
        Some((transform, parent))
    }
}

/// Walk the hierarchy below (and including) `start`.
pub fn walk_hierarchy<S: SkeletonSource + ?Sized>(
    skeleton: &S,
    start: TransformId,
) -> HierarchyWalk<'_, S> {
    HierarchyWalk {
        skeleton,
        stack: vec![(start, skeleton.parent(start))],
        remaining: skeleton.transform_count(),
    }
}

/// Path of `target` relative to `root`: ancestor names joined root-to-leaf,
/// excluding `root` itself. `target == root` yields the root path. When the
/// parent chain ends without meeting `root`, the topmost transform is the first
/// segment.
pub fn relative_path<S: SkeletonSource + ?Sized>(
    skeleton: &S,
    target: TransformId,
    root: TransformId,
) -> HierarchyPath {
    let mut names = Vec::new();
    let mut current = Some(target);
    let mut budget = skeleton.transform_count();
    while let Some(t) = current {
        if t == root || budget == 0 {
            break;
        }
        names.push(skeleton.name(t).to_string());
        current = skeleton.parent(t);
        budget -= 1;
    }
    names.reverse();
    HierarchyPath::new(names)
}

/// Path from the topmost ancestor down to `target`, including the root name.
pub fn full_path<S: SkeletonSource + ?Sized>(skeleton: &S, target: TransformId) -> HierarchyPath {
    let mut names = Vec::new();
    let mut current = Some(target);
    let mut budget = skeleton.transform_count();
    while let Some(t) = current {
        if budget == 0 {
            break;
        }
        names.push(skeleton.name(t).to_string());
        current = skeleton.parent(t);
        budget -= 1;
    }
    names.reverse();
    HierarchyPath::new(names)
}

/// One transform of a [`Skeleton`] snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformNode {
    pub name: String,
    #[serde(default)]
    pub parent: Option<TransformId>,
}

fn default_humanoid() -> bool {
    true
}

/// Owned skeleton snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// Character (root object) name.
    pub name: String,
    #[serde(default = "default_humanoid")]
    pub humanoid: bool,
    /// Transforms in hierarchy order; index is the [`TransformId`].
    pub transforms: Vec<TransformNode>,
    #[serde(default)]
    pub root: TransformId,
    /// Humanoid joint bindings.
    #[serde(default)]
    pub joints: HashMap<JointId, TransformId>,
}

impl Skeleton {
    /// A skeleton holding only its root transform.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            transforms: vec![TransformNode {
                name: name.clone(),
                parent: None,
            }],
            name,
            humanoid: true,
            root: 0,
            joints: HashMap::new(),
        }
    }

    /// Parse and validate a JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, RigError> {
        let skeleton: Skeleton = serde_json::from_str(json)?;
        skeleton.validate()?;
        Ok(skeleton)
    }

    /// Append a transform under `parent` and return its id.
    pub fn add_transform(&mut self, name: impl Into<String>, parent: TransformId) -> TransformId {
        self.transforms.push(TransformNode {
            name: name.into(),
            parent: Some(parent),
        });
        self.transforms.len() - 1
    }

    /// Append a transform under `parent` and bind it to `joint`.
    pub fn add_joint(
        &mut self,
        joint: JointId,
        name: impl Into<String>,
        parent: TransformId,
    ) -> TransformId {
        let id = self.add_transform(name, parent);
        self.joints.insert(joint, id);
        id
    }

    pub fn bind_joint(&mut self, joint: JointId, transform: TransformId) {
        self.joints.insert(joint, transform);
    }

    /// First transform with the given name.
    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms.iter().position(|t| t.name == name)
    }

    /// Check indices and reject parent cycles.
    pub fn validate(&self) -> Result<(), RigError> {
        let len = self.transforms.len();
        if self.root >= len {
            return Err(RigError::RootOutOfRange {
                skeleton: self.name.clone(),
                root: self.root,
                len,
            });
        }
        for (index, node) in self.transforms.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent >= len {
                    return Err(RigError::ParentOutOfRange {
                        skeleton: self.name.clone(),
                        index,
                        parent,
                    });
                }
            }
        }
        for (&joint, &index) in self.joints.iter() {
            if index >= len {
                return Err(RigError::JointOutOfRange {
                    skeleton: self.name.clone(),
                    joint,
                    index,
                });
            }
        }
        for index in 0..len {
            let mut current = self.transforms[index].parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > len {
                    return Err(RigError::Cycle {
                        skeleton: self.name.clone(),
                        index,
                    });
                }
                current = self.transforms[p].parent;
            }
        }
        Ok(())
    }
}

impl SkeletonSource for Skeleton {
    fn is_humanoid(&self) -> bool {
        self.humanoid
    }

    fn root(&self) -> TransformId {
        self.root
    }

    fn joint_transform(&self, joint: JointId) -> Option<TransformId> {
        self.joints.get(&joint).copied()
    }

    fn parent(&self, transform: TransformId) -> Option<TransformId> {
        self.transforms.get(transform).and_then(|t| t.parent)
    }

    fn name(&self, transform: TransformId) -> &str {
        self.transforms
            .get(transform)
            .map(|t| t.name.as_str())
            .unwrap_or("")
    }

    fn children(&self, transform: TransformId) -> Vec<TransformId> {
        self.transforms
            .iter()
            .enumerate()
            .filter(|(_, t)| t.parent == Some(transform))
            .map(|(i, _)| i)
            .collect()
    }

    fn transform_count(&self) -> usize {
        self.transforms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Skeleton {
        let mut s = Skeleton::new("Avatar");
        let armature = s.add_transform("Armature", 0);
        let hips = s.add_joint(JointId::Hips, "Hips", armature);
        let spine = s.add_joint(JointId::Spine, "Spine", hips);
        s.add_transform("Body", 0);
        s.add_joint(JointId::Chest, "Chest", spine);
        s
    }

    #[test]
    fn relative_path_excludes_root() {
        let s = small();
        let chest = s.joint_transform(JointId::Chest).unwrap();
        assert_eq!(
            relative_path(&s, chest, s.root()).to_string(),
            "Armature/Hips/Spine/Chest"
        );
        assert_eq!(relative_path(&s, s.root(), s.root()).to_string(), "");
    }

    #[test]
    fn full_path_includes_root() {
        let s = small();
        let hips = s.joint_transform(JointId::Hips).unwrap();
        assert_eq!(full_path(&s, hips).to_string(), "Avatar/Armature/Hips");
    }

    #[test]
    fn detached_transform_path_starts_at_its_top() {
        let mut s = small();
        s.transforms.push(TransformNode {
            name: "Loose".into(),
            parent: None,
        });
        let loose = s.transforms.len() - 1;
        let child = s.add_transform("Child", loose);
        assert_eq!(relative_path(&s, child, s.root()).to_string(), "Loose/Child");
    }

    #[test]
    fn walk_is_preorder_with_parents() {
        let s = small();
        let names: Vec<(String, Option<String>)> = walk_hierarchy(&s, s.root())
            .map(|(t, p)| (s.name(t).to_string(), p.map(|p| s.name(p).to_string())))
            .collect();
        let expected = vec![
            ("Avatar".to_string(), None),
            ("Armature".to_string(), Some("Avatar".to_string())),
            ("Hips".to_string(), Some("Armature".to_string())),
            ("Spine".to_string(), Some("Hips".to_string())),
            ("Chest".to_string(), Some("Spine".to_string())),
            ("Body".to_string(), Some("Avatar".to_string())),
        ];
        assert_eq!(names, expected);
    }

    #[test]
    fn joint_at_reverse_lookup() {
        let s = small();
        let spine = s.find("Spine").unwrap();
        assert_eq!(s.joint_at(spine), Some(JointId::Spine));
        assert_eq!(s.joint_at(s.find("Body").unwrap()), None);
    }

    #[test]
    fn validate_rejects_cycles_and_bad_indices() {
        let mut s = small();
        assert!(s.validate().is_ok());
        s.transforms[1].parent = Some(5);
        assert!(matches!(s.validate(), Err(RigError::Cycle { .. })));

        let mut s = small();
        s.joints.insert(JointId::Head, 99);
        assert!(matches!(
            s.validate(),
            Err(RigError::JointOutOfRange { joint: JointId::Head, .. })
        ));
    }

    #[test]
    fn json_snapshot_loads() {
        let json = r#"{
            "name": "Avatar",
            "transforms": [
                { "name": "Avatar" },
                { "name": "Hips", "parent": 0 }
            ],
            "joints": { "Hips": 1 }
        }"#;
        let s = Skeleton::from_json_str(json).unwrap();
        assert!(s.is_humanoid());
        assert_eq!(s.joint_transform(JointId::Hips), Some(1));
    }
}
