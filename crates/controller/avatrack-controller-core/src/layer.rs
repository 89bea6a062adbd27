//! Layer assembly: one masked, detection-gated layer per tracked region.

use serde::{Deserialize, Serialize};

use avatrack_api_core::ValueKind;
use avatrack_rig_core::{JointId, JointResolver};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::machine::{StateContent, StateId, StateMachine};
use crate::mask::AvatarMask;
use crate::motion::{BlendPosition, BlendTree, Clip, Curve, CurveBinding, Motion};
use crate::params::{names, ParameterCatalog};
use crate::poses::{HandPose, HandRole};
use crate::region::{MotionShape, Region, RegionSpec, SamplePose};
use crate::transitions::{gating_transitions, pose_matrix};

pub const BASE_LAYER_NAME: &str = "Base Layer";
pub const ENABLE_TRACKING_CLIP: &str = "EnableTracking";

const ACTIVE_POSITION: [f32; 2] = [300.0, 100.0];
const INACTIVE_POSITION: [f32; 2] = [300.0, 200.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// `None` leaves the whole body writable.
    pub mask: Option<AvatarMask>,
    pub state_machine: StateMachine,
    pub weight: f32,
}

impl Layer {
    /// Every clip referenced by the layer, including nested machines.
    pub fn clips(&self) -> Vec<&Clip> {
        let mut out = Vec::new();
        collect_clips(&self.state_machine, &mut out);
        out
    }
}

fn collect_clips<'a>(machine: &'a StateMachine, out: &mut Vec<&'a Clip>) {
    for state in machine.states() {
        match &state.content {
            StateContent::Empty => {}
            StateContent::Motion { motion } => out.extend(motion.clips()),
            StateContent::Machine { machine } => collect_clips(machine, out),
        }
    }
}

/// A finished layer plus the joints whose curves had to be left out.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltLayer {
    pub layer: Layer,
    pub unresolved: Vec<JointId>,
}

/// Resolves joints while clips are filled in; misses are remembered, not raised.
struct ClipBuilder<'r, R: JointResolver + ?Sized> {
    resolver: &'r mut R,
    unresolved: Vec<JointId>,
}

impl<'r, R: JointResolver + ?Sized> ClipBuilder<'r, R> {
    fn path(&mut self, joint: JointId) -> Option<String> {
        match self.resolver.resolve(joint) {
            Ok(path) => Some(path),
            Err(_) => {
                if !self.unresolved.contains(&joint) {
                    self.unresolved.push(joint);
                }
                None
            }
        }
    }

    fn sample_clip(&mut self, pose: &SamplePose) -> Clip {
        let mut clip = Clip::new(pose.clip_name.clone());
        for rotation in &pose.rotations {
            if let Some(path) = self.path(rotation.joint) {
                clip.set_axis(&path, rotation.axis, rotation.degrees);
            }
        }
        clip
    }

    fn pose_clip(&mut self, name: String, pose: HandPose, joints: &[JointId]) -> Clip {
        let mut clip = Clip::new(name);
        for &joint in joints {
            let Some(euler) = HandRole::of(joint).and_then(|role| pose.rotation(role)) else {
                continue;
            };
            if let Some(path) = self.path(joint) {
                clip.set_rotation(&path, euler);
            }
        }
        clip
    }
}

fn pose_position(index: usize) -> [f32; 2] {
    match index {
        0 => [200.0, 100.0],
        i => [500.0, ((i - 1) * 200) as f32],
    }
}

/// Builds layers as complete values; nothing touches the target graph.
pub struct LayerAssembler<'a> {
    catalog: &'a ParameterCatalog,
    config: &'a GeneratorConfig,
}

impl<'a> LayerAssembler<'a> {
    pub fn new(catalog: &'a ParameterCatalog, config: &'a GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    /// "Base Layer": one `Default` state playing a clip that holds
    /// `TrackingEnabled` at 1. Unmasked.
    pub fn build_base_layer(&self) -> Result<Layer, GenerateError> {
        self.catalog
            .require(BASE_LAYER_NAME, names::TRACKING_ENABLED, ValueKind::Bool)?;
        let mut clip = Clip::new(ENABLE_TRACKING_CLIP);
        clip.set_curve(Curve::constant(
            "",
            CurveBinding::AnimatorParameter {
                name: names::TRACKING_ENABLED.into(),
            },
            1.0,
        ));
        let mut machine = StateMachine::new(BASE_LAYER_NAME);
        let default = machine.add_state(
            "Default",
            [200.0, 0.0],
            StateContent::Motion {
                motion: Motion::Clip(clip),
            },
        );
        machine.set_default_state(default);
        machine.validate()?;
        Ok(Layer {
            name: BASE_LAYER_NAME.into(),
            region: None,
            mask: None,
            state_machine: machine,
            weight: 1.0,
        })
    }

    /// Build the layer of one region.
    ///
    /// Joints that fail to resolve are omitted from every clip and listed in
    /// [`BuiltLayer::unresolved`]; that is not an error.
    pub fn build_layer<R: JointResolver + ?Sized>(
        &self,
        spec: &RegionSpec,
        resolver: &mut R,
    ) -> Result<BuiltLayer, GenerateError> {
        self.check_parameters(spec)?;
        let mut clips = ClipBuilder {
            resolver,
            unresolved: Vec::new(),
        };

        let content = match &spec.shape {
            MotionShape::None { clip_name } => StateContent::Motion {
                motion: Motion::Clip(Clip::new(clip_name.clone())),
            },
            MotionShape::Linear1D {
                blend_tree,
                parameter,
                samples,
            } => {
                let mut tree = BlendTree::simple_1d(blend_tree.clone(), parameter.clone());
                for sample in samples {
                    tree.add_child(
                        Motion::Clip(clips.sample_clip(&sample.pose)),
                        BlendPosition::Threshold(sample.threshold),
                    );
                }
                StateContent::Motion {
                    motion: Motion::BlendTree(tree),
                }
            }
            MotionShape::Directional2D {
                blend_tree,
                x,
                y,
                samples,
            } => {
                let mut tree = BlendTree::directional_2d(blend_tree.clone(), x.clone(), y.clone());
                for sample in samples {
                    tree.add_child(
                        Motion::Clip(clips.sample_clip(&sample.pose)),
                        BlendPosition::Point(sample.position),
                    );
                }
                StateContent::Motion {
                    motion: Motion::BlendTree(tree),
                }
            }
            MotionShape::DiscretePoseSet {
                parameter,
                clip_prefix,
                poses,
            } => StateContent::Machine {
                machine: Box::new(self.pose_machine(
                    spec,
                    parameter,
                    clip_prefix,
                    poses,
                    &mut clips,
                )?),
            },
        };

        let mut machine = StateMachine::new(spec.layer_name.clone());
        let active = machine.add_state(spec.active_state_name(), ACTIVE_POSITION, content);
        let inactive = machine.add_state(
            spec.inactive_state_name(),
            INACTIVE_POSITION,
            StateContent::Empty,
        );
        for edge in gating_transitions(
            inactive,
            active,
            &spec.detection_parameter,
            self.config.gating_transition_duration,
        ) {
            machine.add_transition(edge);
        }
        machine.set_default_state(inactive);
        machine.validate()?;

        let unresolved = clips.unresolved;
        if !unresolved.is_empty() {
            log::warn!(
                "layer '{}': {} joint(s) unresolved, clips omit them",
                spec.layer_name,
                unresolved.len()
            );
        }
        log::debug!("built layer '{}'", spec.layer_name);

        Ok(BuiltLayer {
            layer: Layer {
                name: spec.layer_name.clone(),
                region: Some(spec.region),
                mask: Some(AvatarMask::for_region(spec.mask_name.clone(), spec.region)),
                state_machine: machine,
                weight: 1.0,
            },
            unresolved,
        })
    }

    /// Nested machine holding one state per pose; its default is the first
    /// pose, so leaving through the outer gating edges works from any pose.
    fn pose_machine<R: JointResolver + ?Sized>(
        &self,
        spec: &RegionSpec,
        parameter: &str,
        clip_prefix: &str,
        poses: &[HandPose],
        clips: &mut ClipBuilder<'_, R>,
    ) -> Result<StateMachine, GenerateError> {
        let mut machine = StateMachine::new(format!("{} Poses", spec.state_label));
        let mut ids: Vec<StateId> = Vec::with_capacity(poses.len());
        for (i, &pose) in poses.iter().enumerate() {
            if pose.index() != i as i32 {
                return Err(GenerateError::InvalidMachine {
                    machine: machine.name.clone(),
                    reason: format!(
                        "pose {pose} listed at position {i} but selected by value {}",
                        pose.index()
                    ),
                });
            }
            let clip = clips.pose_clip(format!("{clip_prefix}{pose}"), pose, &spec.joints);
            ids.push(machine.add_state(
                format!("{} {pose}", spec.state_label),
                pose_position(i),
                StateContent::Motion {
                    motion: Motion::Clip(clip),
                },
            ));
        }
        for edge in pose_matrix(&ids, parameter, self.config.pose_transition_duration) {
            machine.add_transition(edge);
        }
        if let Some(&first) = ids.first() {
            machine.set_default_state(first);
        }
        Ok(machine)
    }

    fn check_parameters(&self, spec: &RegionSpec) -> Result<(), GenerateError> {
        let layer = spec.layer_name.as_str();
        self.catalog
            .require(layer, names::TRACKING_ENABLED, ValueKind::Bool)?;
        self.catalog
            .require(layer, &spec.detection_parameter, ValueKind::Bool)?;
        match &spec.shape {
            MotionShape::None { .. } => Ok(()),
            MotionShape::Linear1D { parameter, .. } => {
                self.catalog.require(layer, parameter, ValueKind::Float)
            }
            MotionShape::Directional2D { x, y, .. } => {
                self.catalog.require(layer, x, ValueKind::Float)?;
                self.catalog.require(layer, y, ValueKind::Float)
            }
            MotionShape::DiscretePoseSet { parameter, .. } => {
                self.catalog.require(layer, parameter, ValueKind::Int)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatrack_api_core::Value;
    use avatrack_rig_core::{ResolveError, Side};

    use crate::machine::ConditionMode;
    use crate::motion::{Axis, BlendKind};

    /// Resolves every joint to its name, except the listed ones.
    struct NameResolver(Vec<JointId>);

    impl JointResolver for NameResolver {
        fn resolve(&mut self, joint: JointId) -> Result<String, ResolveError> {
            if self.0.contains(&joint) {
                Err(ResolveError::NotFound(joint))
            } else {
                Ok(format!("Armature/{joint}"))
            }
        }
    }

    fn build(region: Region, missing: Vec<JointId>) -> BuiltLayer {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        LayerAssembler::new(&catalog, &config)
            .build_layer(&region.spec(), &mut NameResolver(missing))
            .unwrap()
    }

    fn active_motion(layer: &Layer) -> &Motion {
        layer
            .state_machine
            .states()
            .iter()
            .find_map(|s| s.motion())
            .unwrap()
    }

    #[test]
    fn body_layer_blends_hips_yaw() {
        let built = build(Region::Body, vec![]);
        let layer = &built.layer;
        assert_eq!(layer.name, "Body Rotation");
        assert_eq!(layer.weight, 1.0);
        assert_eq!(layer.mask.as_ref().unwrap().name, "BodyRotationMask");

        let Motion::BlendTree(tree) = active_motion(layer) else {
            panic!("expected blend tree");
        };
        assert_eq!(
            tree.kind,
            BlendKind::Simple1D {
                parameter: "BodyRotation".into()
            }
        );
        let thresholds: Vec<BlendPosition> = tree.children.iter().map(|c| c.position).collect();
        assert_eq!(
            thresholds,
            vec![
                BlendPosition::Threshold(-1.0),
                BlendPosition::Threshold(0.0),
                BlendPosition::Threshold(1.0)
            ]
        );
        let left = tree.children[0].motion.clips()[0];
        assert_eq!(left.name, "BodyLeft");
        let yaw = left
            .curve("Armature/Hips", &CurveBinding::LocalEuler { axis: Axis::Y })
            .unwrap();
        assert_eq!(yaw.initial_value(), Some(-30.0));
        assert!(tree.children[1].motion.clips()[0].is_empty());
    }

    #[test]
    fn arm_layer_has_five_directional_children() {
        let built = build(Region::Arm(Side::Left), vec![]);
        let Motion::BlendTree(tree) = active_motion(&built.layer) else {
            panic!("expected blend tree");
        };
        assert_eq!(tree.name, "LeftArmBlend");
        let points: Vec<BlendPosition> = tree.children.iter().map(|c| c.position).collect();
        assert_eq!(
            points,
            vec![
                BlendPosition::Point([0.0, 0.0]),
                BlendPosition::Point([0.0, 1.0]),
                BlendPosition::Point([0.0, -1.0]),
                BlendPosition::Point([1.0, 0.0]),
                BlendPosition::Point([-1.0, 0.0]),
            ]
        );
        let up = tree.children[1].motion.clips()[0];
        assert_eq!(up.name, "LeftArmUp");
        assert_eq!(up.curves[0].path, "Armature/LeftUpperArm");
        assert_eq!(up.curves[0].initial_value(), Some(-90.0));
    }

    #[test]
    fn gating_machine_defaults_to_motionless_inactive() {
        for region in Region::ALL {
            let built = build(region, vec![]);
            let machine = &built.layer.state_machine;
            let default = machine.state(machine.default_state().unwrap()).unwrap();
            assert!(default.name.ends_with(" Inactive"), "{}", default.name);
            assert_eq!(default.content, StateContent::Empty);
            assert_eq!(default.position, [300.0, 200.0]);

            // Nothing fires while every flag is false.
            let all_false = |_: &str| Some(Value::Bool(false));
            assert_eq!(machine.next_state(default.id, all_false), None);
            // Detection alone is not enough.
            let detected_only = |p: &str| Some(Value::Bool(p != "TrackingEnabled"));
            assert_eq!(machine.next_state(default.id, detected_only), None);
            assert!(machine.next_state(default.id, |_| Some(Value::Bool(true))).is_some());
        }
    }

    #[test]
    fn hand_layer_nests_pose_matrix() {
        let built = build(Region::Hand(Side::Right), vec![]);
        let machine = &built.layer.state_machine;
        let active = machine.state_by_name("Right Hand Active").unwrap();
        let poses = active.machine().unwrap();
        let names: Vec<&str> = poses.states().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Right Hand Open", "Right Hand Peace", "Right Hand Point"]);
        assert_eq!(poses.default_state(), Some(poses.states()[0].id));
        assert_eq!(poses.transitions().len(), 6);
        assert!(poses
            .transitions()
            .iter()
            .all(|t| t.conditions.len() == 1 && t.conditions[0].mode == ConditionMode::Equals));
        assert_eq!(poses.states()[1].position, [500.0, 0.0]);

        let clips = built.layer.clips();
        let open = clips.iter().find(|c| c.name == "RightHandOpen").unwrap();
        assert_eq!(open.curves.len(), 16 * 3);
        let point = clips.iter().find(|c| c.name == "RightHandPoint").unwrap();
        assert_eq!(point.curves.len(), 12 * 3);
        let curl = point
            .curve(
                "Armature/RightMiddleProximal",
                &CurveBinding::LocalEuler { axis: Axis::X },
            )
            .unwrap();
        assert_eq!(curl.initial_value(), Some(-80.0));
    }

    #[test]
    fn unresolved_joint_is_omitted_not_fatal() {
        let built = build(Region::Hand(Side::Left), vec![JointId::LeftLittleDistal]);
        assert_eq!(built.unresolved, vec![JointId::LeftLittleDistal]);
        let clips = built.layer.clips();
        assert_eq!(clips.len(), 3);
        for clip in clips {
            assert!(!clip.animated_paths().contains(&"Armature/LeftLittleDistal"));
            assert!(!clip.is_empty());
        }
    }

    #[test]
    fn every_clip_missing_leaves_empty_clips() {
        let built = build(Region::Leg(Side::Left), vec![JointId::LeftUpperLeg]);
        assert!(built.layer.clips().iter().all(|c| c.is_empty()));
        assert_eq!(built.unresolved, vec![JointId::LeftUpperLeg]);
    }

    #[test]
    fn base_layer_forces_tracking_on() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let layer = LayerAssembler::new(&catalog, &config).build_base_layer().unwrap();
        assert_eq!(layer.name, "Base Layer");
        assert!(layer.mask.is_none());
        let clip = layer.clips()[0];
        assert_eq!(clip.name, "EnableTracking");
        assert_eq!(clip.curves[0].path, "");
        assert_eq!(clip.curves[0].binding.property(), "TrackingEnabled");
        assert_eq!(clip.curves[0].initial_value(), Some(1.0));
    }

    #[test]
    fn custom_region_with_neutral_shape() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig {
            gating_transition_duration: 0.5,
            ..Default::default()
        };
        let spec = RegionSpec {
            shape: MotionShape::None {
                clip_name: "BodyIdle".into(),
            },
            ..Region::Body.spec()
        };
        let built = LayerAssembler::new(&catalog, &config)
            .build_layer(&spec, &mut NameResolver(vec![]))
            .unwrap();
        assert_eq!(built.layer.clips()[0].name, "BodyIdle");
        assert!(built
            .layer
            .state_machine
            .transitions()
            .iter()
            .all(|t| t.duration == 0.5));
    }

    #[test]
    fn undeclared_parameter_is_rejected() {
        let catalog = ParameterCatalog::from_specs(
            ParameterCatalog::standard()
                .all_parameters()
                .filter(|p| p.name != "LeftLegLift")
                .cloned(),
        );
        let config = GeneratorConfig::default();
        let err = LayerAssembler::new(&catalog, &config)
            .build_layer(&Region::Leg(Side::Left).spec(), &mut NameResolver(vec![]))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UndeclaredParameter { ref name, .. } if name == "LeftLegLift"
        ));
    }

    #[test]
    fn misordered_poses_are_rejected() {
        let catalog = ParameterCatalog::standard();
        let config = GeneratorConfig::default();
        let mut spec = Region::Hand(Side::Left).spec();
        if let MotionShape::DiscretePoseSet { poses, .. } = &mut spec.shape {
            poses.swap(0, 1);
        }
        let err = LayerAssembler::new(&catalog, &config)
            .build_layer(&spec, &mut NameResolver(vec![]))
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidMachine { .. }));
    }
}
