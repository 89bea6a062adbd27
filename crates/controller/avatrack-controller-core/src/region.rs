//! Tracked regions and the fixed authoring data of each one.

use serde::{Deserialize, Serialize};

use avatrack_rig_core::{JointId, Side};

use crate::motion::Axis;
use crate::params::names;
use crate::poses::HandPose;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Body,
    Arm(Side),
    Leg(Side),
    Hand(Side),
}

impl Region {
    /// Region layers in graph order (after the base layer).
    pub const ALL: [Region; 7] = [
        Region::Body,
        Region::Arm(Side::Left),
        Region::Arm(Side::Right),
        Region::Leg(Side::Left),
        Region::Leg(Side::Right),
        Region::Hand(Side::Left),
        Region::Hand(Side::Right),
    ];

    pub fn side(self) -> Option<Side> {
        match self {
            Region::Body => None,
            Region::Arm(side) | Region::Leg(side) | Region::Hand(side) => Some(side),
        }
    }

    pub fn detection_parameter(self) -> String {
        match self {
            Region::Body => names::BODY_DETECTED.to_string(),
            Region::Arm(side) => names::arm_detected(side),
            Region::Leg(side) => names::leg_detected(side),
            Region::Hand(side) => names::hand_detected(side),
        }
    }

    pub fn spec(self) -> RegionSpec {
        match self {
            Region::Body => body_spec(),
            Region::Arm(side) => arm_spec(side),
            Region::Leg(side) => leg_spec(side),
            Region::Hand(side) => hand_spec(side),
        }
    }
}

/// A fixed rotation component on one joint.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointRotation {
    pub joint: JointId,
    pub axis: Axis,
    pub degrees: f32,
}

/// A sample clip: its name and the rotations it holds. Neutral samples hold nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePose {
    pub clip_name: String,
    pub rotations: Vec<JointRotation>,
}

impl SamplePose {
    pub fn neutral(clip_name: impl Into<String>) -> Self {
        Self {
            clip_name: clip_name.into(),
            rotations: Vec::new(),
        }
    }

    pub fn rotated(clip_name: impl Into<String>, joint: JointId, axis: Axis, degrees: f32) -> Self {
        Self {
            clip_name: clip_name.into(),
            rotations: vec![JointRotation {
                joint,
                axis,
                degrees,
            }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearSample {
    pub threshold: f32,
    pub pose: SamplePose,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalSample {
    pub position: [f32; 2],
    pub pose: SamplePose,
}

/// How the active state of a region moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MotionShape {
    /// One neutral clip.
    None { clip_name: String },
    Linear1D {
        blend_tree: String,
        parameter: String,
        samples: Vec<LinearSample>,
    },
    Directional2D {
        blend_tree: String,
        x: String,
        y: String,
        samples: Vec<DirectionalSample>,
    },
    /// One clip per pose, selected by an int parameter.
    DiscretePoseSet {
        parameter: String,
        clip_prefix: String,
        poses: Vec<HandPose>,
    },
}

/// Everything needed to author one region layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub region: Region,
    pub layer_name: String,
    /// Prefix of the layer's state names (`"<label> Active"`).
    pub state_label: String,
    pub mask_name: String,
    pub detection_parameter: String,
    pub shape: MotionShape,
    /// Joints the region animates.
    pub joints: Vec<JointId>,
}

impl RegionSpec {
    pub fn active_state_name(&self) -> String {
        format!("{} Active", self.state_label)
    }

    pub fn inactive_state_name(&self) -> String {
        format!("{} Inactive", self.state_label)
    }
}

fn body_spec() -> RegionSpec {
    let hips = JointId::Hips;
    RegionSpec {
        region: Region::Body,
        layer_name: "Body Rotation".into(),
        state_label: "Body Rotation".into(),
        mask_name: "BodyRotationMask".into(),
        detection_parameter: Region::Body.detection_parameter(),
        shape: MotionShape::Linear1D {
            blend_tree: "BodyRotation".into(),
            parameter: names::BODY_ROTATION.into(),
            samples: vec![
                LinearSample {
                    threshold: -1.0,
                    pose: SamplePose::rotated("BodyLeft", hips, Axis::Y, -30.0),
                },
                LinearSample {
                    threshold: 0.0,
                    pose: SamplePose::neutral("BodyNeutral"),
                },
                LinearSample {
                    threshold: 1.0,
                    pose: SamplePose::rotated("BodyRight", hips, Axis::Y, 30.0),
                },
            ],
        },
        joints: vec![hips],
    }
}

fn arm_spec(side: Side) -> RegionSpec {
    let upper_arm = JointId::upper_arm(side);
    // Raising rotates about Z; the sign flips with the side.
    let up = match side {
        Side::Left => -90.0,
        Side::Right => 90.0,
    };
    let sample = |position: [f32; 2], suffix: &str, rotation: Option<(Axis, f32)>| {
        let clip_name = format!("{side}Arm{suffix}");
        DirectionalSample {
            position,
            pose: match rotation {
                Some((axis, degrees)) => SamplePose::rotated(clip_name, upper_arm, axis, degrees),
                None => SamplePose::neutral(clip_name),
            },
        }
    };
    RegionSpec {
        region: Region::Arm(side),
        layer_name: format!("{side} Arm Position"),
        state_label: format!("{side} Arm Movement"),
        mask_name: format!("{side}ArmMask"),
        detection_parameter: Region::Arm(side).detection_parameter(),
        shape: MotionShape::Directional2D {
            blend_tree: format!("{side}ArmBlend"),
            x: names::arm_x(side),
            y: names::arm_height(side),
            samples: vec![
                sample([0.0, 0.0], "Neutral", None),
                sample([0.0, 1.0], "Up", Some((Axis::Z, up))),
                sample([0.0, -1.0], "Down", Some((Axis::Z, -up))),
                sample([1.0, 0.0], "Forward", Some((Axis::X, -60.0))),
                sample([-1.0, 0.0], "Back", Some((Axis::X, 60.0))),
            ],
        },
        joints: vec![upper_arm],
    }
}

fn leg_spec(side: Side) -> RegionSpec {
    let upper_leg = JointId::upper_leg(side);
    RegionSpec {
        region: Region::Leg(side),
        layer_name: format!("{side} Leg Position"),
        state_label: format!("{side} Leg Movement"),
        mask_name: format!("{side}LegMask"),
        detection_parameter: Region::Leg(side).detection_parameter(),
        shape: MotionShape::Linear1D {
            blend_tree: format!("{side}LegBlend"),
            parameter: names::leg_lift(side),
            samples: vec![
                LinearSample {
                    threshold: 0.0,
                    pose: SamplePose::neutral(format!("{side}LegNeutral")),
                },
                LinearSample {
                    threshold: 1.0,
                    pose: SamplePose::rotated(
                        format!("{side}LegLifted"),
                        upper_leg,
                        Axis::X,
                        -45.0,
                    ),
                },
            ],
        },
        joints: vec![upper_leg],
    }
}

fn hand_spec(side: Side) -> RegionSpec {
    RegionSpec {
        region: Region::Hand(side),
        layer_name: format!("{side} Hand Gesture"),
        state_label: format!("{side} Hand"),
        mask_name: format!("{side}HandMask"),
        detection_parameter: Region::Hand(side).detection_parameter(),
        shape: MotionShape::DiscretePoseSet {
            parameter: names::hand_gesture(side),
            clip_prefix: format!("{side}Hand"),
            poses: HandPose::ALL.to_vec(),
        },
        joints: JointId::hand_chain(side).to_vec(),
    }
}
