//! Character descriptor: the five playable layer slots and the expression assets.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayableLayerType {
    Base,
    Additive,
    Gesture,
    Action,
    #[serde(rename = "FX")]
    Fx,
}

impl PlayableLayerType {
    /// Canonical type of each slot, by slot index.
    pub const SLOTS: [PlayableLayerType; 5] = [
        PlayableLayerType::Base,
        PlayableLayerType::Additive,
        PlayableLayerType::Gesture,
        PlayableLayerType::Action,
        PlayableLayerType::Fx,
    ];

    pub fn slot(self) -> usize {
        match self {
            PlayableLayerType::Base => 0,
            PlayableLayerType::Additive => 1,
            PlayableLayerType::Gesture => 2,
            PlayableLayerType::Action => 3,
            PlayableLayerType::Fx => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayableLayer {
    #[serde(rename = "type")]
    pub layer_type: PlayableLayerType,
    /// Controller asset path; `None` means the platform default.
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub mask: Option<String>,
}

impl PlayableLayer {
    pub fn platform_default(layer_type: PlayableLayerType) -> Self {
        Self {
            layer_type,
            controller: None,
            is_default: true,
            mask: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    pub name: String,
    #[serde(default)]
    pub customize_animation_layers: bool,
    #[serde(default)]
    pub base_layers: Vec<PlayableLayer>,
    #[serde(default)]
    pub expression_parameters: Option<String>,
    #[serde(default)]
    pub expressions_menu: Option<String>,
}

impl AvatarDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            customize_animation_layers: false,
            base_layers: PlayableLayerType::SLOTS
                .into_iter()
                .map(PlayableLayer::platform_default)
                .collect(),
            expression_parameters: None,
            expressions_menu: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn slot(&self, layer_type: PlayableLayerType) -> Option<&PlayableLayer> {
        self.base_layers.get(layer_type.slot())
    }

    /// Rebuild the five slots around `controller_path` bound to Action.
    ///
    /// Existing slots carrying a controller are kept by index, except FX
    /// entries, which are dropped. Slots left without a controller fall back
    /// to the platform default of their canonical type.
    pub fn configure_tracking_layers(&mut self, controller_path: &str) {
        self.customize_animation_layers = true;
        let mut slots: Vec<Option<PlayableLayer>> = vec![None; PlayableLayerType::SLOTS.len()];
        for (slot, existing) in slots.iter_mut().zip(self.base_layers.drain(..)) {
            if existing.layer_type != PlayableLayerType::Fx {
                *slot = Some(existing);
            }
        }
        let mut layers: Vec<PlayableLayer> = slots
            .into_iter()
            .zip(PlayableLayerType::SLOTS)
            .map(|(slot, canonical)| match slot {
                Some(layer) if layer.controller.is_some() => layer,
                _ => PlayableLayer::platform_default(canonical),
            })
            .collect();
        layers[PlayableLayerType::Action.slot()] = PlayableLayer {
            layer_type: PlayableLayerType::Action,
            controller: Some(controller_path.to_string()),
            is_default: false,
            mask: None,
        };
        log::debug!(
            "'{}': Action slot bound to {controller_path}",
            self.name
        );
        self.base_layers = layers;
    }

    pub fn set_expression_assets(&mut self, parameters_path: &str, menu_path: &str) {
        self.expression_parameters = Some(parameters_path.to_string());
        self.expressions_menu = Some(menu_path.to_string());
    }
}
