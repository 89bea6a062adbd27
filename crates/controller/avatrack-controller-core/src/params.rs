//! Tracking parameter catalog and its declaration on a target graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use avatrack_api_core::{Value, ValueKind};
use avatrack_rig_core::Side;

use crate::error::GenerateError;
use crate::graph::{AnimatorGraph, ParameterDecl};

/// Parameter names shared with the tracking sender.
pub mod names {
    use avatrack_rig_core::Side;

    pub const TRACKING_ENABLED: &str = "TrackingEnabled";
    pub const BODY_ROTATION: &str = "BodyRotation";
    pub const BODY_DETECTED: &str = "BodyDetected";

    pub fn arm_x(side: Side) -> String {
        format!("{side}ArmX")
    }

    pub fn arm_height(side: Side) -> String {
        format!("{side}ArmHeight")
    }

    pub fn arm_detected(side: Side) -> String {
        format!("{side}ArmDetected")
    }

    pub fn hand_gesture(side: Side) -> String {
        format!("{side}HandGesture")
    }

    pub fn hand_detected(side: Side) -> String {
        format!("{side}HandDetected")
    }

    pub fn leg_lift(side: Side) -> String {
        format!("{side}LegLift")
    }

    pub fn leg_detected(side: Side) -> String {
        format!("{side}LegDetected")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ValueKind,
    /// Float encoding (bools 0/1, ints as whole numbers).
    pub default: f32,
    pub min: f32,
    pub max: f32,
    /// Kept across sessions.
    pub persisted: bool,
    /// Synchronised to remote viewers.
    pub networked: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind, min: f32, max: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            default: 0.0,
            min,
            max,
            persisted: false,
            networked: true,
        }
    }

    pub fn persisted(mut self) -> Self {
        self.persisted = true;
        self
    }

    pub fn default_value(&self) -> Value {
        Value::from_f32(self.kind, self.default)
    }

    /// Range the value can actually take: bools are always `[0, 1]`, ints
    /// use their rounded bounds.
    pub fn effective_range(&self) -> (f32, f32) {
        match self.kind {
            ValueKind::Bool => (0.0, 1.0),
            ValueKind::Int => (self.min.round(), self.max.round()),
            ValueKind::Float => (self.min, self.max),
        }
    }

    pub fn decl(&self) -> ParameterDecl {
        ParameterDecl {
            name: self.name.clone(),
            kind: self.kind,
            default: self.default_value(),
        }
    }
}

/// Ordered name → spec table; order is declaration and export order.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterCatalog {
    specs: IndexMap<String, ParameterSpec>,
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ParameterCatalog {
    /// Catalog from explicit specs; a later spec replaces an earlier one of the same name.
    pub fn from_specs(specs: impl IntoIterator<Item = ParameterSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }

    /// The body-tracking contract: one global switch, then per region its
    /// controls followed by its detection flag.
    pub fn standard() -> Self {
        use ValueKind::*;
        let mut specs = vec![
            ParameterSpec::new(names::TRACKING_ENABLED, Bool, 0.0, 1.0).persisted(),
            ParameterSpec::new(names::BODY_ROTATION, Float, -1.0, 1.0),
            ParameterSpec::new(names::BODY_DETECTED, Bool, 0.0, 1.0),
        ];
        for side in Side::BOTH {
            specs.push(ParameterSpec::new(names::arm_x(side), Float, -1.0, 1.0));
            specs.push(ParameterSpec::new(names::arm_height(side), Float, -1.0, 1.0));
            specs.push(ParameterSpec::new(names::arm_detected(side), Bool, 0.0, 1.0));
        }
        for side in Side::BOTH {
            specs.push(ParameterSpec::new(names::hand_gesture(side), Int, 0.0, 2.0));
            specs.push(ParameterSpec::new(names::hand_detected(side), Bool, 0.0, 1.0));
        }
        for side in Side::BOTH {
            specs.push(ParameterSpec::new(names::leg_lift(side), Float, 0.0, 1.0));
            specs.push(ParameterSpec::new(names::leg_detected(side), Bool, 0.0, 1.0));
        }
        Self::from_specs(specs)
    }

    pub fn all_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.values()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.get(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Fail unless `name` is cataloged with `kind`.
    pub fn require(&self, layer: &str, name: &str, kind: ValueKind) -> Result<(), GenerateError> {
        match self.specs.get(name) {
            Some(spec) if spec.kind == kind => Ok(()),
            _ => Err(GenerateError::UndeclaredParameter {
                layer: layer.to_string(),
                name: name.to_string(),
                expected: kind,
            }),
        }
    }

    /// First graph parameter that shares a name but not a kind with the catalog.
    pub fn check_conflicts<G: AnimatorGraph + ?Sized>(&self, graph: &G) -> Result<(), GenerateError> {
        for existing in graph.parameters() {
            if let Some(spec) = self.specs.get(&existing.name) {
                if spec.kind != existing.kind {
                    return Err(GenerateError::ParameterConflict {
                        name: existing.name,
                        existing: existing.kind,
                        expected: spec.kind,
                    });
                }
            }
        }
        Ok(())
    }

    /// Declare every missing catalog parameter on `graph`, in catalog order.
    ///
    /// Existing same-kind parameters are left as they are. A kind conflict is
    /// reported before anything is added. Returns the names added.
    pub fn ensure_declared<G: AnimatorGraph + ?Sized>(
        &self,
        graph: &mut G,
    ) -> Result<Vec<String>, GenerateError> {
        self.check_conflicts(graph)?;
        let existing: Vec<String> = graph.parameters().into_iter().map(|p| p.name).collect();
        let mut added = Vec::new();
        for spec in self.specs.values() {
            if existing.contains(&spec.name) {
                continue;
            }
            graph.add_parameter(spec.decl());
            added.push(spec.name.clone());
        }
        if !added.is_empty() {
            log::debug!("declared {} parameters: {}", added.len(), added.join(", "));
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ControllerGraph;

    #[test]
    fn standard_catalog_order_and_kinds() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.len(), 17);
        let names: Vec<&str> = catalog.all_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names[0], "TrackingEnabled");
        assert_eq!(names[3..6], ["LeftArmX", "LeftArmHeight", "LeftArmDetected"]);
        assert_eq!(names[16], "RightLegDetected");

        let enabled = catalog.get("TrackingEnabled").unwrap();
        assert!(enabled.persisted && enabled.networked);
        assert!(catalog
            .all_parameters()
            .skip(1)
            .all(|p| !p.persisted && p.networked));
        assert_eq!(catalog.get("LeftHandGesture").unwrap().kind, ValueKind::Int);
    }

    #[test]
    fn effective_ranges() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.get("BodyRotation").unwrap().effective_range(), (-1.0, 1.0));
        assert_eq!(catalog.get("LeftLegLift").unwrap().effective_range(), (0.0, 1.0));
        assert_eq!(catalog.get("RightHandGesture").unwrap().effective_range(), (0.0, 2.0));
        let odd = ParameterSpec::new("Odd", ValueKind::Bool, -5.0, 5.0);
        assert_eq!(odd.effective_range(), (0.0, 1.0));
    }

    #[test]
    fn declaration_is_idempotent_and_keeps_existing() {
        let catalog = ParameterCatalog::standard();
        let mut graph = ControllerGraph::new("Test");
        graph.add_parameter(ParameterDecl {
            name: "TrackingEnabled".into(),
            kind: ValueKind::Bool,
            default: Value::Bool(true),
        });

        let added = catalog.ensure_declared(&mut graph).unwrap();
        assert_eq!(added.len(), 16);
        assert_eq!(graph.parameters.len(), 17);
        assert_eq!(
            graph.parameter("TrackingEnabled").unwrap().default,
            Value::Bool(true)
        );

        let again = catalog.ensure_declared(&mut graph).unwrap();
        assert!(again.is_empty());
        assert_eq!(graph.parameters.len(), 17);
    }

    #[test]
    fn conflicting_kind_leaves_graph_untouched() {
        let catalog = ParameterCatalog::standard();
        let mut graph = ControllerGraph::new("Test");
        graph.add_parameter(ParameterDecl {
            name: "LeftHandGesture".into(),
            kind: ValueKind::Float,
            default: Value::Float(0.0),
        });
        let err = catalog.ensure_declared(&mut graph).unwrap_err();
        assert!(matches!(
            &err,
            GenerateError::ParameterConflict { name, existing: ValueKind::Float, expected: ValueKind::Int }
                if name == "LeftHandGesture"
        ));
        assert_eq!(graph.parameters.len(), 1);
    }

    #[test]
    fn require_checks_name_and_kind() {
        let catalog = ParameterCatalog::standard();
        assert!(catalog.require("Body Rotation", "BodyRotation", ValueKind::Float).is_ok());
        assert!(catalog.require("Body Rotation", "BodyRotation", ValueKind::Int).is_err());
        assert!(catalog.require("Tail", "TailWag", ValueKind::Float).is_err());
    }
}
