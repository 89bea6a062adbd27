//! avatrack-controller-core
//!
//! Authors a layered animator controller that drives a humanoid avatar from
//! body-tracking parameters. Each body region gets one layer with a
//! detection-gated two-state machine (`Inactive` / `<Region> Active`); the
//! active state plays a blend tree sampling the tracking parameters, or, for
//! hands, a nested machine over discrete gesture poses.
//!
//! Entry points:
//! - [`ParameterCatalog`] for the tracking parameter contract
//! - [`GraphComposer`] to build and install the layers on an [`AnimatorGraph`]
//! - [`persist_generated`] to write the resulting assets through an [`AssetSink`]
//! - [`AvatarDescriptor::configure_tracking_layers`] to bind the controller

pub mod assets;
pub mod composer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod expressions;
pub mod graph;
pub mod layer;
pub mod machine;
pub mod mask;
pub mod motion;
pub mod params;
pub mod poses;
pub mod region;
pub mod transitions;

pub use assets::{persist_generated, AssetLayout, AssetSink, DirectoryAssetSink, GeneratedAssets};
pub use composer::{GenerationReport, GraphComposer, UnresolvedJoint};
pub use config::GeneratorConfig;
pub use descriptor::{AvatarDescriptor, PlayableLayer, PlayableLayerType};
pub use error::{AssetError, GenerateError};
pub use expressions::{ControlType, ExpressionParameter, ExpressionParameters, ExpressionsMenu, MenuControl};
pub use graph::{AnimatorGraph, ControllerGraph, ParameterDecl};
pub use layer::{BuiltLayer, Layer, LayerAssembler, BASE_LAYER_NAME, ENABLE_TRACKING_CLIP};
pub use machine::{
    Condition, ConditionMode, State, StateContent, StateId, StateMachine, Transition,
};
pub use mask::{mask_for, zone_of, AvatarMask, BodyZone, ZoneMask};
pub use motion::{
    Axis, BlendChild, BlendKind, BlendPosition, BlendTree, Clip, Curve, CurveBinding, Keyframe,
    Motion,
};
pub use params::{names, ParameterCatalog, ParameterSpec};
pub use poses::{FingerPolicy, HandPose, HandRole, CURL_DEGREES};
pub use region::{
    DirectionalSample, JointRotation, LinearSample, MotionShape, Region, RegionSpec, SamplePose,
};
pub use transitions::{gating_transitions, pose_matrix};
