//! Humanoid joint identifiers.
//!
//! The set mirrors the standard humanoid avatar definition (55 joints). Each
//! joint has a canonical PascalCase name which is also its serde form and the
//! key used by the bone-mapping interchange format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RigError;

macro_rules! joints {
    ($($variant:ident),+ $(,)?) => {
        /// A humanoid joint.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum JointId {
            $($variant),+
        }

        impl JointId {
            /// Every joint, in canonical order.
            pub const ALL: &'static [JointId] = &[$(JointId::$variant),+];

            /// Canonical name, e.g. `"LeftLittleDistal"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(JointId::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for JointId {
            type Err = RigError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(JointId::$variant),)+
                    _ => Err(RigError::UnknownJoint(s.to_string())),
                }
            }
        }
    };
}

joints! {
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    UpperChest,
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Body side of a paired joint or region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The digit a finger joint belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Digit {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl JointId {
    /// Upper arm joint of a side.
    pub fn upper_arm(side: Side) -> JointId {
        match side {
            Side::Left => JointId::LeftUpperArm,
            Side::Right => JointId::RightUpperArm,
        }
    }

    /// Upper leg joint of a side.
    pub fn upper_leg(side: Side) -> JointId {
        match side {
            Side::Left => JointId::LeftUpperLeg,
            Side::Right => JointId::RightUpperLeg,
        }
    }

    /// Wrist joint of a side.
    pub fn hand(side: Side) -> JointId {
        match side {
            Side::Left => JointId::LeftHand,
            Side::Right => JointId::RightHand,
        }
    }

    /// Wrist followed by every finger segment of one hand (16 joints).
    pub fn hand_chain(side: Side) -> [JointId; 16] {
        use JointId::*;
        match side {
            Side::Left => [
                LeftHand,
                LeftIndexProximal,
                LeftIndexIntermediate,
                LeftIndexDistal,
                LeftMiddleProximal,
                LeftMiddleIntermediate,
                LeftMiddleDistal,
                LeftRingProximal,
                LeftRingIntermediate,
                LeftRingDistal,
                LeftLittleProximal,
                LeftLittleIntermediate,
                LeftLittleDistal,
                LeftThumbProximal,
                LeftThumbIntermediate,
                LeftThumbDistal,
            ],
            Side::Right => [
                RightHand,
                RightIndexProximal,
                RightIndexIntermediate,
                RightIndexDistal,
                RightMiddleProximal,
                RightMiddleIntermediate,
                RightMiddleDistal,
                RightRingProximal,
                RightRingIntermediate,
                RightRingDistal,
                RightLittleProximal,
                RightLittleIntermediate,
                RightLittleDistal,
                RightThumbProximal,
                RightThumbIntermediate,
                RightThumbDistal,
            ],
        }
    }

    /// Digit of a finger segment; `None` for every non-finger joint.
    pub fn digit(self) -> Option<Digit> {
        use JointId::*;
        match self {
            LeftThumbProximal | LeftThumbIntermediate | LeftThumbDistal | RightThumbProximal
            | RightThumbIntermediate | RightThumbDistal => Some(Digit::Thumb),
            LeftIndexProximal | LeftIndexIntermediate | LeftIndexDistal | RightIndexProximal
            | RightIndexIntermediate | RightIndexDistal => Some(Digit::Index),
            LeftMiddleProximal | LeftMiddleIntermediate | LeftMiddleDistal
            | RightMiddleProximal | RightMiddleIntermediate | RightMiddleDistal => {
                Some(Digit::Middle)
            }
            LeftRingProximal | LeftRingIntermediate | LeftRingDistal | RightRingProximal
            | RightRingIntermediate | RightRingDistal => Some(Digit::Ring),
            LeftLittleProximal | LeftLittleIntermediate | LeftLittleDistal
            | RightLittleProximal | RightLittleIntermediate | RightLittleDistal => {
                Some(Digit::Little)
            }
            _ => None,
        }
    }
}
