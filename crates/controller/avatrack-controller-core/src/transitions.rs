//! Guarded edges: detection gating and complete pose matrices.

use crate::machine::{Condition, StateId, Transition};
use crate::params::names;

/// Edges between a region's Inactive and Active states.
///
/// Entering needs tracking enabled and the region detected (one edge, two
/// conditions). Leaving needs either to drop, expressed as two parallel
/// single-condition edges.
pub fn gating_transitions(
    inactive: StateId,
    active: StateId,
    detection_parameter: &str,
    duration: f32,
) -> Vec<Transition> {
    vec![
        Transition::new(inactive, active, duration)
            .when(Condition::is_true(names::TRACKING_ENABLED))
            .when(Condition::is_true(detection_parameter)),
        Transition::new(active, inactive, duration)
            .when(Condition::is_false(names::TRACKING_ENABLED)),
        Transition::new(active, inactive, duration)
            .when(Condition::is_false(detection_parameter)),
    ]
}

/// One edge per ordered pair of distinct poses, guarded by
/// `parameter == index of the destination`. `poses[i]` is selected by value `i`.
pub fn pose_matrix(poses: &[StateId], parameter: &str, duration: f32) -> Vec<Transition> {
    let mut edges = Vec::with_capacity(poses.len() * poses.len().saturating_sub(1));
    for (from_idx, &from) in poses.iter().enumerate() {
        for (to_idx, &to) in poses.iter().enumerate() {
            if from_idx == to_idx {
                continue;
            }
            edges.push(
                Transition::new(from, to, duration)
                    .when(Condition::equals(parameter, to_idx as i32)),
            );
        }
    }
    edges
}
