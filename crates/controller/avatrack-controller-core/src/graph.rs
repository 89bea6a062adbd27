//! Target controller graph: the host port and an owned implementation.

use serde::{Deserialize, Serialize};

use avatrack_api_core::{Value, ValueKind};

use crate::layer::Layer;

/// A declared animator parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub kind: ValueKind,
    pub default: Value,
}

/// Mutation surface of a host animator controller.
///
/// Calls are synchronous and assumed to succeed; the composer finishes all
/// fallible work before calling any mutating method.
pub trait AnimatorGraph {
    fn parameters(&self) -> Vec<ParameterDecl>;
    fn add_parameter(&mut self, decl: ParameterDecl);
    fn layer_count(&self) -> usize;
    fn remove_layer(&mut self, index: usize);
    fn add_layer(&mut self, layer: Layer);
}

/// Plain controller value; what the CLI writes as the controller asset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerGraph {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl ControllerGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDecl> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl AnimatorGraph for ControllerGraph {
    fn parameters(&self) -> Vec<ParameterDecl> {
        self.parameters.clone()
    }

    fn add_parameter(&mut self, decl: ParameterDecl) {
        self.parameters.push(decl);
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn remove_layer(&mut self, index: usize) {
        if index < self.layers.len() {
            self.layers.remove(index);
        }
    }

    fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }
}
