//! Hand poses and the per-joint finger policy behind them.

use std::fmt;

use serde::{Deserialize, Serialize};

use avatrack_rig_core::{Digit, JointId};

/// Bend applied to a curled finger segment (local X, degrees).
pub const CURL_DEGREES: f32 = -80.0;

/// Discrete hand poses, in gesture-index order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandPose {
    Open,
    Peace,
    Point,
}

impl HandPose {
    pub const ALL: [HandPose; 3] = [HandPose::Open, HandPose::Peace, HandPose::Point];

    /// Value of the gesture parameter selecting this pose.
    pub fn index(self) -> i32 {
        match self {
            HandPose::Open => 0,
            HandPose::Peace => 1,
            HandPose::Point => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandPose::Open => "Open",
            HandPose::Peace => "Peace",
            HandPose::Point => "Point",
        }
    }

    pub fn policy(self, role: HandRole) -> FingerPolicy {
        use FingerPolicy::*;
        match (self, role) {
            (HandPose::Open, _) => Straight,
            (_, HandRole::Wrist | HandRole::Finger(Digit::Thumb)) => Untouched,
            (HandPose::Peace, HandRole::Finger(Digit::Index | Digit::Middle)) => Straight,
            (HandPose::Peace, HandRole::Finger(_)) => Curled,
            (HandPose::Point, HandRole::Finger(Digit::Index)) => Straight,
            (HandPose::Point, HandRole::Finger(_)) => Curled,
        }
    }

    /// Local euler rotation this pose holds on a joint, if it touches it.
    pub fn rotation(self, role: HandRole) -> Option<[f32; 3]> {
        match self.policy(role) {
            FingerPolicy::Straight => Some([0.0, 0.0, 0.0]),
            FingerPolicy::Curled => Some([CURL_DEGREES, 0.0, 0.0]),
            FingerPolicy::Untouched => None,
        }
    }
}

impl fmt::Display for HandPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a hand joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandRole {
    Wrist,
    Finger(Digit),
}

impl HandRole {
    /// `None` for joints outside the hands.
    pub fn of(joint: JointId) -> Option<HandRole> {
        match joint {
            JointId::LeftHand | JointId::RightHand => Some(HandRole::Wrist),
            other => other.digit().map(HandRole::Finger),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FingerPolicy {
    Straight,
    Curled,
    Untouched,
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatrack_rig_core::Side;

    fn straight_and_curled(pose: HandPose, side: Side) -> (usize, usize) {
        let mut straight = 0;
        let mut curled = 0;
        for joint in JointId::hand_chain(side) {
            let role = HandRole::of(joint).unwrap();
            match pose.policy(role) {
                FingerPolicy::Straight => straight += 1,
                FingerPolicy::Curled => curled += 1,
                FingerPolicy::Untouched => {}
            }
        }
        (straight, curled)
    }

    #[test]
    fn open_straightens_every_hand_joint() {
        assert_eq!(straight_and_curled(HandPose::Open, Side::Left), (16, 0));
    }

    #[test]
    fn peace_keeps_two_fingers_up() {
        assert_eq!(straight_and_curled(HandPose::Peace, Side::Right), (6, 6));
        assert_eq!(
            HandPose::Peace.rotation(HandRole::Finger(Digit::Ring)),
            Some([-80.0, 0.0, 0.0])
        );
        assert_eq!(HandPose::Peace.rotation(HandRole::Wrist), None);
    }

    #[test]
    fn point_keeps_index_up_and_thumb_untouched() {
        assert_eq!(straight_and_curled(HandPose::Point, Side::Left), (3, 9));
        assert_eq!(HandPose::Point.rotation(HandRole::Finger(Digit::Thumb)), None);
    }

    #[test]
    fn roles_come_from_the_joint_table() {
        assert_eq!(HandRole::of(JointId::RightHand), Some(HandRole::Wrist));
        assert_eq!(
            HandRole::of(JointId::LeftLittleDistal),
            Some(HandRole::Finger(Digit::Little))
        );
        assert_eq!(HandRole::of(JointId::LeftLowerArm), None);
        let indices: Vec<i32> = HandPose::ALL.iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
