//! Joint → hierarchy path resolution.
//!
//! Two tiers: an explicit override table wins; otherwise the path is derived by
//! walking the skeleton from the joint up to (excluding) the root.

use hashbrown::HashMap;

use crate::error::ResolveError;
use crate::joint::JointId;
use crate::mapping::BoneMapping;
use crate::skeleton::{relative_path, SkeletonSource};

/// Trait for resolving joints to animation binding paths.
/// Layer builders take this so tests and hosts can substitute their own lookup.
pub trait JointResolver {
    fn resolve(&mut self, joint: JointId) -> Result<String, ResolveError>;
}

/// Two-tier resolver over an override table and a skeleton snapshot.
pub struct BoneResolver<'a, S: SkeletonSource + ?Sized> {
    overrides: &'a BoneMapping,
    skeleton: &'a S,
}

impl<'a, S: SkeletonSource + ?Sized> BoneResolver<'a, S> {
    pub fn new(overrides: &'a BoneMapping, skeleton: &'a S) -> Self {
        Self {
            overrides,
            skeleton,
        }
    }
}

impl<'a, S: SkeletonSource + ?Sized> JointResolver for BoneResolver<'a, S> {
    fn resolve(&mut self, joint: JointId) -> Result<String, ResolveError> {
        if let Some(path) = self.overrides.get(joint) {
            return Ok(path.to_string());
        }
        let transform = self
            .skeleton
            .joint_transform(joint)
            .ok_or(ResolveError::NotFound(joint))?;
        Ok(relative_path(self.skeleton, transform, self.skeleton.root()).to_string())
    }
}

/// Memoizing wrapper: each joint is resolved once per run, so every clip of a
/// run binds the same path and each miss is reported once.
pub struct CachedResolver<R: JointResolver> {
    inner: R,
    cache: HashMap<JointId, Result<String, ResolveError>>,
}

impl<R: JointResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }
}

impl<R: JointResolver> JointResolver for CachedResolver<R> {
    fn resolve(&mut self, joint: JointId) -> Result<String, ResolveError> {
        if let Some(hit) = self.cache.get(&joint) {
            return hit.clone();
        }
        let result = self.inner.resolve(joint);
        match &result {
            Ok(path) => log::debug!("resolved {joint} -> '{path}'"),
            Err(err) => log::warn!("{err}; its curves are skipped"),
        }
        self.cache.insert(joint, result.clone());
        result
    }
}
