//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Knobs for one generation run. Rotation angles and thresholds are fixed in
/// code; this covers naming, asset layout and transition timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Folder that receives every generated asset.
    pub asset_root: String,
    /// Sub folder (under `asset_root`) for clips.
    pub animations_dir: String,
    /// Sub folder (under `asset_root`) for masks.
    pub masks_dir: String,
    /// Controller asset name; `None` derives `<avatar>_FBTrackingAction`.
    pub controller_name: Option<String>,
    pub parameters_asset_name: String,
    pub menu_asset_name: String,
    /// Blend duration of the Active/Inactive gating edges.
    pub gating_transition_duration: f32,
    /// Blend duration of the pose-to-pose edges.
    pub pose_transition_duration: f32,
    /// Emit the base layer that forces `TrackingEnabled` on.
    pub include_base_layer: bool,
    /// Bind the generated controller to the descriptor's Action slot.
    pub bind_action_slot: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            asset_root: "Assets/FullBodyTracking".into(),
            animations_dir: "Animations".into(),
            masks_dir: "Masks".into(),
            controller_name: None,
            parameters_asset_name: "TrackingParameters".into(),
            menu_asset_name: "TrackingMenu".into(),
            gating_transition_duration: 0.2,
            pose_transition_duration: 0.1,
            include_base_layer: true,
            bind_action_slot: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn controller_name_for(&self, avatar_name: &str) -> String {
        self.controller_name
            .clone()
            .unwrap_or_else(|| format!("{avatar_name}_FBTrackingAction"))
    }

    pub fn animations_path(&self) -> String {
        format!("{}/{}", self.asset_root, self.animations_dir)
    }

    pub fn masks_path(&self) -> String {
        format!("{}/{}", self.asset_root, self.masks_dir)
    }
}
