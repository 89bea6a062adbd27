//! Expression parameter and menu descriptors that accompany the controller.

use serde::{Deserialize, Serialize};

use avatrack_api_core::ValueKind;

use crate::params::{names, ParameterCatalog};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionParameter {
    pub name: String,
    pub value_type: ValueKind,
    pub default_value: f32,
    pub saved: bool,
    pub network_synced: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionParameters {
    pub parameters: Vec<ExpressionParameter>,
}

impl ExpressionParameters {
    /// One entry per catalog parameter, in catalog order.
    pub fn from_catalog(catalog: &ParameterCatalog) -> Self {
        Self {
            parameters: catalog
                .all_parameters()
                .map(|spec| ExpressionParameter {
                    name: spec.name.clone(),
                    value_type: spec.kind,
                    default_value: spec.default,
                    saved: spec.persisted,
                    network_synced: spec.networked,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExpressionParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Button,
    Toggle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuControl {
    pub name: String,
    pub control_type: ControlType,
    pub parameter: String,
    pub value: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionsMenu {
    pub controls: Vec<MenuControl>,
}

impl ExpressionsMenu {
    /// A single "Tracking" toggle driving `TrackingEnabled`.
    pub fn tracking() -> Self {
        Self {
            controls: vec![MenuControl {
                name: "Tracking".into(),
                control_type: ControlType::Toggle,
                parameter: names::TRACKING_ENABLED.into(),
                value: 1.0,
            }],
        }
    }
}
