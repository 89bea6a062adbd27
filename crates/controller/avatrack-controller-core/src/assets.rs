//! Asset persistence: the host sink port, the generated asset layout and a
//! directory-backed sink.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::descriptor::AvatarDescriptor;
use crate::error::AssetError;
use crate::expressions::{ExpressionParameters, ExpressionsMenu};
use crate::graph::ControllerGraph;

/// Host asset database.
///
/// `create_asset` may buffer; nothing is guaranteed durable before `save_all`.
pub trait AssetSink {
    fn ensure_folder(&mut self, path: &str) -> Result<(), AssetError>;
    fn create_asset(&mut self, path: &str, contents: String) -> Result<(), AssetError>;
    fn mark_dirty(&mut self, path: &str);
    fn save_all(&mut self) -> Result<(), AssetError>;
}

/// Where each generated asset lives.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetLayout {
    root: String,
    avatar: String,
    animations: String,
    masks: String,
    controller_name: String,
    parameters_name: String,
    menu_name: String,
}

impl AssetLayout {
    pub fn new(config: &GeneratorConfig, avatar_name: &str) -> Self {
        Self {
            root: config.asset_root.clone(),
            avatar: avatar_name.to_string(),
            animations: config.animations_path(),
            masks: config.masks_path(),
            controller_name: config.controller_name_for(avatar_name),
            parameters_name: config.parameters_asset_name.clone(),
            menu_name: config.menu_asset_name.clone(),
        }
    }

    /// Folders in creation order (parents first).
    pub fn folders(&self) -> Vec<&str> {
        vec![&self.root, &self.animations, &self.masks]
    }

    pub fn clip_path(&self, clip: &str) -> String {
        format!("{}/{clip}.anim", self.animations)
    }

    pub fn mask_path(&self, mask: &str) -> String {
        format!("{}/{mask}.mask", self.masks)
    }

    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    pub fn controller_path(&self) -> String {
        format!("{}/{}.controller", self.root, self.controller_name)
    }

    pub fn parameters_path(&self) -> String {
        format!("{}/{}.asset", self.root, self.parameters_name)
    }

    pub fn menu_path(&self) -> String {
        format!("{}/{}.asset", self.root, self.menu_name)
    }

    pub fn descriptor_path(&self) -> String {
        format!("{}/{}.descriptor.json", self.root, self.avatar)
    }
}

/// Generated assets handed to [`persist_generated`].
#[derive(Clone, Copy, Debug)]
pub struct GeneratedAssets<'a> {
    pub controller: &'a ControllerGraph,
    pub parameters: &'a ExpressionParameters,
    pub menu: &'a ExpressionsMenu,
    /// Updated character descriptor, written last when present.
    pub descriptor: Option<&'a AvatarDescriptor>,
}

fn to_json<T: Serialize>(path: &str, value: &T) -> Result<String, AssetError> {
    serde_json::to_string_pretty(value).map_err(|source| AssetError::Serialize {
        path: path.to_string(),
        source,
    })
}

/// Write clips, masks, the controller, the expression descriptors and the
/// character descriptor through `sink`, then save. Returns the asset paths in
/// write order.
///
/// Clips and masks are written once per name. A failure stops the run; assets
/// already handed to the sink are not rolled back.
pub fn persist_generated<K: AssetSink + ?Sized>(
    sink: &mut K,
    layout: &AssetLayout,
    assets: GeneratedAssets<'_>,
) -> Result<Vec<String>, AssetError> {
    for folder in layout.folders() {
        sink.ensure_folder(folder)?;
    }

    let mut written = Vec::new();
    let mut emit = |sink: &mut K, path: String, contents: String| -> Result<(), AssetError> {
        sink.create_asset(&path, contents)?;
        sink.mark_dirty(&path);
        written.push(path);
        Ok(())
    };

    let mut seen_clips = IndexSet::new();
    let mut seen_masks = IndexSet::new();
    for layer in &assets.controller.layers {
        for clip in layer.clips() {
            if seen_clips.insert(clip.name.as_str()) {
                let path = layout.clip_path(&clip.name);
                let json = to_json(&path, clip)?;
                emit(sink, path, json)?;
            }
        }
        if let Some(mask) = layer.mask.as_ref().filter(|m| seen_masks.insert(m.name.as_str())) {
            let path = layout.mask_path(&mask.name);
            let json = to_json(&path, mask)?;
            emit(sink, path, json)?;
        }
    }

    let path = layout.controller_path();
    let json = to_json(&path, assets.controller)?;
    emit(sink, path, json)?;
    let path = layout.parameters_path();
    let json = to_json(&path, assets.parameters)?;
    emit(sink, path, json)?;
    let path = layout.menu_path();
    let json = to_json(&path, assets.menu)?;
    emit(sink, path, json)?;
    if let Some(descriptor) = assets.descriptor {
        let path = layout.descriptor_path();
        let json = to_json(&path, descriptor)?;
        emit(sink, path, json)?;
    }

    sink.save_all()?;
    log::info!("saved {} assets under {}", written.len(), layout.root);
    Ok(written)
}

/// Sink rooted at a directory; asset paths are relative to it.
///
/// Folders are created immediately, asset contents are held until `save_all`.
#[derive(Debug)]
pub struct DirectoryAssetSink {
    root: PathBuf,
    pending: IndexMap<String, String>,
    dirty: IndexSet<String>,
}

impl DirectoryAssetSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pending: IndexMap::new(),
            dirty: IndexSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let segments: Vec<&str> = path.split('/').collect();
        let valid = !path.is_empty()
            && !path.starts_with('/')
            && !path.contains('\\')
            && segments.iter().all(|s| !s.is_empty() && *s != "." && *s != "..");
        if !valid {
            return Err(AssetError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(segments.iter().fold(self.root.clone(), |acc, s| acc.join(s)))
    }
}

impl AssetSink for DirectoryAssetSink {
    fn ensure_folder(&mut self, path: &str) -> Result<(), AssetError> {
        let dir = self.resolve(path)?;
        fs::create_dir_all(&dir).map_err(|source| AssetError::CreateFolder { path: dir, source })
    }

    fn create_asset(&mut self, path: &str, contents: String) -> Result<(), AssetError> {
        self.resolve(path)?;
        if self.pending.insert(path.to_string(), contents).is_some() {
            log::debug!("asset {path} replaced before save");
        }
        Ok(())
    }

    fn mark_dirty(&mut self, path: &str) {
        self.dirty.insert(path.to_string());
    }

    fn save_all(&mut self) -> Result<(), AssetError> {
        for (path, contents) in self.pending.drain(..) {
            let file = segments_path(&self.root, &path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent).map_err(|source| AssetError::CreateFolder {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&file, contents).map_err(|source| AssetError::Write { path: file, source })?;
        }
        log::debug!("{} dirty assets saved", self.dirty.len());
        self.dirty.clear();
        Ok(())
    }
}

fn segments_path(root: &Path, path: &str) -> PathBuf {
    path.split('/').fold(root.to_path_buf(), |acc, s| acc.join(s))
}
