//! Motions: constant-keyed clips and the 1-D / 2-D blend trees that mix them.

use serde::{Deserialize, Serialize};

/// Local euler axis of a transform rotation curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn property(self) -> &'static str {
        match self {
            Axis::X => "localEulerAngles.x",
            Axis::Y => "localEulerAngles.y",
            Axis::Z => "localEulerAngles.z",
        }
    }
}

/// What a curve animates at its path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveBinding {
    /// One euler component of the transform's local rotation, in degrees.
    LocalEuler { axis: Axis },
    /// An animator parameter written by the clip (path is the controller root).
    AnimatorParameter { name: String },
}

impl CurveBinding {
    pub fn property(&self) -> &str {
        match self {
            CurveBinding::LocalEuler { axis } => axis.property(),
            CurveBinding::AnimatorParameter { name } => name,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Hierarchy path relative to the animated root; empty for the root itself.
    pub path: String,
    pub binding: CurveBinding,
    pub keys: Vec<Keyframe>,
}

impl Curve {
    /// Single key at t = 0.
    pub fn constant(path: impl Into<String>, binding: CurveBinding, value: f32) -> Self {
        Self {
            path: path.into(),
            binding,
            keys: vec![Keyframe { time: 0.0, value }],
        }
    }

    pub fn initial_value(&self) -> Option<f32> {
        self.keys.first().map(|k| k.value)
    }
}

/// A named clip; stored as its own asset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    pub curves: Vec<Curve>,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// Hold one euler component of `path` at `degrees`.
    pub fn set_axis(&mut self, path: &str, axis: Axis, degrees: f32) {
        self.set_curve(Curve::constant(
            path,
            CurveBinding::LocalEuler { axis },
            degrees,
        ));
    }

    /// Hold the full local rotation of `path` at `euler` (x, y, z degrees).
    pub fn set_rotation(&mut self, path: &str, euler: [f32; 3]) {
        for (axis, degrees) in Axis::ALL.into_iter().zip(euler) {
            self.set_axis(path, axis, degrees);
        }
    }

    /// Insert a curve, replacing any curve with the same path and binding.
    pub fn set_curve(&mut self, curve: Curve) {
        match self
            .curves
            .iter_mut()
            .find(|c| c.path == curve.path && c.binding == curve.binding)
        {
            Some(existing) => *existing = curve,
            None => self.curves.push(curve),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Distinct animated paths in first-seen order.
    pub fn animated_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for curve in &self.curves {
            if !paths.contains(&curve.path.as_str()) {
                paths.push(&curve.path);
            }
        }
        paths
    }

    pub fn curve(&self, path: &str, binding: &CurveBinding) -> Option<&Curve> {
        self.curves
            .iter()
            .find(|c| c.path == path && &c.binding == binding)
    }
}

/// Placement of a blend-tree child.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendPosition {
    Threshold(f32),
    Point([f32; 2]),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendChild {
    pub motion: Motion,
    pub position: BlendPosition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlendKind {
    Simple1D { parameter: String },
    SimpleDirectional2D { x: String, y: String },
}

/// Blend tree with explicit (non-automatic) thresholds. Embedded in the
/// controller rather than stored as its own asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendTree {
    pub name: String,
    pub kind: BlendKind,
    pub children: Vec<BlendChild>,
}

impl BlendTree {
    pub fn simple_1d(name: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlendKind::Simple1D {
                parameter: parameter.into(),
            },
            children: Vec::new(),
        }
    }

    pub fn directional_2d(
        name: impl Into<String>,
        x: impl Into<String>,
        y: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BlendKind::SimpleDirectional2D {
                x: x.into(),
                y: y.into(),
            },
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, motion: Motion, position: BlendPosition) {
        self.children.push(BlendChild { motion, position });
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "motion", rename_all = "snake_case")]
pub enum Motion {
    Clip(Clip),
    BlendTree(BlendTree),
}

impl Motion {
    pub fn name(&self) -> &str {
        match self {
            Motion::Clip(clip) => &clip.name,
            Motion::BlendTree(tree) => &tree.name,
        }
    }

    /// Every clip reachable from this motion, depth first.
    pub fn clips(&self) -> Vec<&Clip> {
        let mut out = Vec::new();
        self.collect_clips(&mut out);
        out
    }

    fn collect_clips<'a>(&'a self, out: &mut Vec<&'a Clip>) {
        match self {
            Motion::Clip(clip) => out.push(clip),
            Motion::BlendTree(tree) => {
                for child in &tree.children {
                    child.motion.collect_clips(out);
                }
            }
        }
    }
}
