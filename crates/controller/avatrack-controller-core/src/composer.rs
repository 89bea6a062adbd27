//! Whole-graph composition.
//!
//! Every layer is built as a value first; the target graph is only touched
//! once nothing else can fail: parameters are declared (conflicts checked
//! before the first addition), prior layers are cleared, then the new layers
//! are appended in order.

use serde::Serialize;

use avatrack_rig_core::{BoneMapping, BoneResolver, CachedResolver, JointId, SkeletonSource};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::graph::AnimatorGraph;
use crate::layer::{Layer, LayerAssembler};
use crate::params::ParameterCatalog;
use crate::region::{Region, RegionSpec};

/// A joint left out of a layer's clips.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnresolvedJoint {
    pub layer: String,
    pub joint: JointId,
}

/// Outcome of a successful composition.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Layer names in graph order.
    pub layers: Vec<String>,
    /// Parameters newly declared on the graph.
    pub declared_parameters: Vec<String>,
    /// Layers the graph held before and that were cleared.
    pub removed_layers: usize,
    pub unresolved: Vec<UnresolvedJoint>,
}

impl GenerationReport {
    /// Every joint of every layer resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

pub struct GraphComposer<'a> {
    catalog: &'a ParameterCatalog,
    config: &'a GeneratorConfig,
    regions: Vec<RegionSpec>,
}

impl<'a> GraphComposer<'a> {
    /// Composer over the standard region set.
    pub fn new(catalog: &'a ParameterCatalog, config: &'a GeneratorConfig) -> Self {
        Self {
            catalog,
            config,
            regions: Region::ALL.iter().map(|r| r.spec()).collect(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<RegionSpec>) -> Self {
        self.regions = regions;
        self
    }

    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    /// Build every layer without touching any graph.
    pub fn build_layers<S: SkeletonSource + ?Sized>(
        &self,
        skeleton: &S,
        overrides: &BoneMapping,
    ) -> Result<(Vec<Layer>, Vec<UnresolvedJoint>), GenerateError> {
        let assembler = LayerAssembler::new(self.catalog, self.config);
        let mut resolver = CachedResolver::new(BoneResolver::new(overrides, skeleton));
        let mut layers = Vec::with_capacity(self.regions.len() + 1);
        let mut unresolved = Vec::new();

        if self.config.include_base_layer {
            layers.push(assembler.build_base_layer()?);
        }
        for spec in &self.regions {
            let built = assembler.build_layer(spec, &mut resolver)?;
            unresolved.extend(built.unresolved.into_iter().map(|joint| UnresolvedJoint {
                layer: spec.layer_name.clone(),
                joint,
            }));
            layers.push(built.layer);
        }
        Ok((layers, unresolved))
    }

    /// Replace the generated content of `graph`.
    ///
    /// Fails without modifying the graph when the skeleton is missing or not
    /// humanoid, a layer cannot be built, or a parameter conflicts.
    pub fn compose<S, G>(
        &self,
        skeleton: Option<&S>,
        overrides: &BoneMapping,
        graph: &mut G,
    ) -> Result<GenerationReport, GenerateError>
    where
        S: SkeletonSource + ?Sized,
        G: AnimatorGraph + ?Sized,
    {
        let skeleton = skeleton.ok_or(GenerateError::MissingSkeleton)?;
        if !skeleton.is_humanoid() {
            return Err(GenerateError::NotHumanoid(
                skeleton.name(skeleton.root()).to_string(),
            ));
        }

        let (layers, unresolved) = self.build_layers(skeleton, overrides)?;
        let declared_parameters = self.catalog.ensure_declared(graph)?;

        // One removal per prior layer, even if the host keeps some.
        let removed_layers = graph.layer_count();
        for _ in 0..removed_layers {
            graph.remove_layer(0);
        }

        let names: Vec<String> = layers.iter().map(|l| l.name.clone()).collect();
        for layer in layers {
            graph.add_layer(layer);
        }

        log::info!(
            "generated {} layers ({} cleared, {} parameters declared, {} joints unresolved)",
            names.len(),
            removed_layers,
            declared_parameters.len(),
            unresolved.len()
        );
        Ok(GenerationReport {
            layers: names,
            declared_parameters,
            removed_layers,
            unresolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatrack_api_core::{Value, ValueKind};
    use avatrack_rig_core::Skeleton;

    use crate::graph::{ControllerGraph, ParameterDecl};

    fn tiny_humanoid() -> Skeleton {
        let mut s = Skeleton::new("Avatar");
        let hips = s.add_joint(JointId::Hips, "Hips", 0);
        s.add_joint(JointId::LeftUpperLeg, "Leg.L", hips);
        s
    }

    #[test]
    fn missing_skeleton_is_fatal_and_untouched() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let mut graph = ControllerGraph::new("C");
        let err = GraphComposer::new(&catalog, &config)
            .compose::<Skeleton, _>(None, &BoneMapping::new(), &mut graph)
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingSkeleton));
        assert!(graph.parameters.is_empty());
    }

    #[test]
    fn non_humanoid_is_fatal() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let mut skeleton = tiny_humanoid();
        skeleton.humanoid = false;
        let mut graph = ControllerGraph::new("C");
        let err = GraphComposer::new(&catalog, &config)
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap_err();
        assert!(matches!(err, GenerateError::NotHumanoid(name) if name == "Avatar"));
        assert!(graph.layers.is_empty());
    }

    #[test]
    fn conflict_leaves_prior_layers_in_place() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let skeleton = tiny_humanoid();
        let mut graph = ControllerGraph::new("C");
        graph.add_parameter(ParameterDecl {
            name: "BodyRotation".into(),
            kind: ValueKind::Bool,
            default: Value::Bool(false),
        });
        let previous = LayerAssembler::new(&catalog, &config).build_base_layer().unwrap();
        graph.add_layer(previous.clone());

        let err = GraphComposer::new(&catalog, &config)
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap_err();
        assert!(matches!(err, GenerateError::ParameterConflict { .. }));
        assert_eq!(graph.layers, vec![previous]);
        assert_eq!(graph.parameters.len(), 1);
    }

    #[test]
    fn regenerating_replaces_layers() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let skeleton = tiny_humanoid();
        let composer = GraphComposer::new(&catalog, &config);
        let mut graph = ControllerGraph::new("C");

        let first = composer
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap();
        assert_eq!(first.removed_layers, 0);
        assert_eq!(first.declared_parameters.len(), 17);

        let second = composer
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap();
        assert_eq!(second.removed_layers, 8);
        assert!(second.declared_parameters.is_empty());
        assert_eq!(graph.layers.len(), 8);
        assert_eq!(graph.parameters.len(), 17);
        assert_eq!(first.layers, second.layers);
    }

    #[test]
    fn unresolved_joints_are_reported_per_layer() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig {
            include_base_layer: false,
            ..Default::default()
        };
        let skeleton = tiny_humanoid();
        let mut graph = ControllerGraph::new("C");
        let report = GraphComposer::new(&catalog, &config)
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap();
        assert_eq!(graph.layers.len(), 7);
        assert!(!report.is_complete());
        // Hips and the left upper leg exist; everything else is missing.
        assert!(!report.unresolved.iter().any(|u| u.joint == JointId::Hips));
        assert!(report.unresolved.contains(&UnresolvedJoint {
            layer: "Right Leg Position".into(),
            joint: JointId::RightUpperLeg,
        }));
        assert_eq!(
            report
                .unresolved
                .iter()
                .filter(|u| u.layer == "Left Hand Gesture")
                .count(),
            16
        );
    }

    /// Host graph that refuses to drop layers.
    #[derive(Default)]
    struct StickyLayers {
        inner: ControllerGraph,
        removals: usize,
    }

    impl AnimatorGraph for StickyLayers {
        fn parameters(&self) -> Vec<ParameterDecl> {
            self.inner.parameters()
        }
        fn add_parameter(&mut self, decl: ParameterDecl) {
            self.inner.add_parameter(decl);
        }
        fn layer_count(&self) -> usize {
            self.inner.layer_count()
        }
        fn remove_layer(&mut self, _index: usize) {
            self.removals += 1;
        }
        fn add_layer(&mut self, layer: Layer) {
            self.inner.add_layer(layer);
        }
    }

    #[test]
    fn clearing_is_bounded_when_host_keeps_layers() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let skeleton = tiny_humanoid();
        let mut graph = StickyLayers::default();
        let previous = LayerAssembler::new(&catalog, &config).build_base_layer().unwrap();
        graph.add_layer(previous.clone());
        graph.add_layer(previous);

        let report = GraphComposer::new(&catalog, &config)
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap();
        assert_eq!(report.removed_layers, 2);
        assert_eq!(graph.removals, 2);
        assert_eq!(graph.layer_count(), 10);
    }

    #[test]
    fn custom_region_subset() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let skeleton = tiny_humanoid();
        let mut graph = ControllerGraph::new("C");
        let report = GraphComposer::new(&catalog, &config)
            .with_regions(vec![Region::Body.spec()])
            .compose(Some(&skeleton), &BoneMapping::new(), &mut graph)
            .unwrap();
        assert_eq!(report.layers, vec!["Base Layer", "Body Rotation"]);
        assert!(report.is_complete());
    }
}
