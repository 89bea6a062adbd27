//! Skeletal zones and per-region layer masks.

use serde::{Deserialize, Serialize};

use avatrack_rig_core::JointId;

use crate::region::Region;

/// Coarse body zone a mask can enable. Finger joints belong to their arm zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyZone {
    Root,
    Torso,
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl BodyZone {
    pub const ALL: [BodyZone; 7] = [
        BodyZone::Root,
        BodyZone::Torso,
        BodyZone::Head,
        BodyZone::LeftArm,
        BodyZone::RightArm,
        BodyZone::LeftLeg,
        BodyZone::RightLeg,
    ];

    pub fn flag(self) -> ZoneMask {
        match self {
            BodyZone::Root => ZoneMask::ROOT,
            BodyZone::Torso => ZoneMask::TORSO,
            BodyZone::Head => ZoneMask::HEAD,
            BodyZone::LeftArm => ZoneMask::LEFT_ARM,
            BodyZone::RightArm => ZoneMask::RIGHT_ARM,
            BodyZone::LeftLeg => ZoneMask::LEFT_LEG,
            BodyZone::RightLeg => ZoneMask::RIGHT_LEG,
        }
    }
}

/// Zone membership of a joint.
pub fn zone_of(joint: JointId) -> BodyZone {
    use JointId::*;
    match joint {
        Hips | Spine | Chest | UpperChest => BodyZone::Torso,
        Neck | Head | LeftEye | RightEye | Jaw => BodyZone::Head,
        LeftUpperLeg | LeftLowerLeg | LeftFoot | LeftToes => BodyZone::LeftLeg,
        RightUpperLeg | RightLowerLeg | RightFoot | RightToes => BodyZone::RightLeg,
        LeftShoulder | LeftUpperArm | LeftLowerArm | LeftHand | LeftThumbProximal
        | LeftThumbIntermediate | LeftThumbDistal | LeftIndexProximal | LeftIndexIntermediate
        | LeftIndexDistal | LeftMiddleProximal | LeftMiddleIntermediate | LeftMiddleDistal
        | LeftRingProximal | LeftRingIntermediate | LeftRingDistal | LeftLittleProximal
        | LeftLittleIntermediate | LeftLittleDistal => BodyZone::LeftArm,
        RightShoulder | RightUpperArm | RightLowerArm | RightHand | RightThumbProximal
        | RightThumbIntermediate | RightThumbDistal | RightIndexProximal
        | RightIndexIntermediate | RightIndexDistal | RightMiddleProximal
        | RightMiddleIntermediate | RightMiddleDistal | RightRingProximal
        | RightRingIntermediate | RightRingDistal | RightLittleProximal
        | RightLittleIntermediate | RightLittleDistal => BodyZone::RightArm,
    }
}

/// Set of enabled zones. Serialized as the list of zone names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<BodyZone>", into = "Vec<BodyZone>")]
pub struct ZoneMask(u8);

bitflags::bitflags! {
    impl ZoneMask: u8 {
        const ROOT      = 0b0000_0001;
        const TORSO     = 0b0000_0010;
        const HEAD      = 0b0000_0100;
        const LEFT_ARM  = 0b0000_1000;
        const RIGHT_ARM = 0b0001_0000;
        const LEFT_LEG  = 0b0010_0000;
        const RIGHT_LEG = 0b0100_0000;
    }
}

impl ZoneMask {
    pub fn is_disjoint(&self, other: &ZoneMask) -> bool {
        !self.intersects(*other)
    }

    pub fn zones(&self) -> impl Iterator<Item = BodyZone> + '_ {
        BodyZone::ALL
            .into_iter()
            .filter(|z| self.contains(z.flag()))
    }

    pub fn allows(&self, joint: JointId) -> bool {
        self.contains(zone_of(joint).flag())
    }
}

impl FromIterator<BodyZone> for ZoneMask {
    fn from_iter<I: IntoIterator<Item = BodyZone>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ZoneMask::empty(), |mask, zone| mask | zone.flag())
    }
}

impl From<Vec<BodyZone>> for ZoneMask {
    fn from(zones: Vec<BodyZone>) -> Self {
        zones.into_iter().collect()
    }
}

impl From<ZoneMask> for Vec<BodyZone> {
    fn from(mask: ZoneMask) -> Self {
        mask.zones().collect()
    }
}

/// Enabled zones per region. Hands share their arm zone with the arm layer;
/// the two never animate the same joints (upper arm vs. hand chain).
pub fn mask_for(region: Region) -> ZoneMask {
    use avatrack_rig_core::Side;
    match region {
        Region::Body => ZoneMask::ROOT | ZoneMask::TORSO,
        Region::Arm(Side::Left) | Region::Hand(Side::Left) => ZoneMask::LEFT_ARM,
        Region::Arm(Side::Right) | Region::Hand(Side::Right) => ZoneMask::RIGHT_ARM,
        Region::Leg(Side::Left) => ZoneMask::LEFT_LEG,
        Region::Leg(Side::Right) => ZoneMask::RIGHT_LEG,
    }
}

/// A named mask asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarMask {
    pub name: String,
    pub zones: ZoneMask,
}

impl AvatarMask {
    pub fn for_region(name: impl Into<String>, region: Region) -> Self {
        Self {
            name: name.into(),
            zones: mask_for(region),
        }
    }
}
