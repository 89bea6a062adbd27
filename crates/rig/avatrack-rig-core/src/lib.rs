//! avatrack-rig-core
//!
//! Humanoid joints, skeleton snapshots behind the [`SkeletonSource`] port, the
//! two-tier [`BoneResolver`], and the bone-mapping interchange format (parser
//! and exporter).

pub mod error;
pub mod export;
pub mod joint;
pub mod mapping;
pub mod resolver;
pub mod skeleton;

pub use error::{MappingError, ResolveError, RigError};
pub use export::export_bone_mapping;
pub use joint::{Digit, JointId, Side};
pub use mapping::{
    load_bone_mapping, parse_bone_mapping, BoneMapping, MappingWarning, ParsedMapping,
};
pub use resolver::{BoneResolver, CachedResolver, JointResolver};
pub use skeleton::{walk_hierarchy, Skeleton, SkeletonSource, TransformId, TransformNode};
