//! Bone segment geometry.

use glam::{Quat, Vec3};

/// Position of a bone within a finger, base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneKind {
    /// Bone in the palm of the hand.
    Metacarpal,
    /// First bone in the finger, closest to the palm.
    Proximal,
    /// Middle bone in the finger.
    Intermediate,
    /// Last bone in the finger, closest to the tip.
    Distal,
}

impl BoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metacarpal => "metacarpal",
            Self::Proximal => "proximal",
            Self::Intermediate => "intermediate",
            Self::Distal => "distal",
        }
    }
}

/// A single bone segment between two joints, in world space.
///
/// Center, direction, and length are derived from the joint endpoints, so
/// `center == midpoint(prev, next)` and `length == |next - prev|` hold by
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct Bone {
    /// Joint closer to the wrist.
    pub prev_joint: Vec3,
    /// Joint closer to the fingertip.
    pub next_joint: Vec3,
    /// Bone orientation; identity when the backend does not report one.
    pub rotation: Quat,
    pub kind: BoneKind,
}

impl Bone {
    pub fn new(prev_joint: Vec3, next_joint: Vec3, kind: BoneKind) -> Self {
        Self {
            prev_joint,
            next_joint,
            rotation: Quat::IDENTITY,
            kind,
        }
    }

    pub fn with_rotation(prev_joint: Vec3, next_joint: Vec3, rotation: Quat, kind: BoneKind) -> Self {
        Self {
            prev_joint,
            next_joint,
            rotation,
            kind,
        }
    }

    /// Midpoint between the two joints.
    pub fn center(&self) -> Vec3 {
        (self.prev_joint + self.next_joint) / 2.0
    }

    /// Unit vector from the previous joint toward the next joint.
    pub fn direction(&self) -> Vec3 {
        (self.next_joint - self.prev_joint).normalize_or_zero()
    }

    /// Distance between the two joints.
    pub fn length(&self) -> f32 {
        self.prev_joint.distance(self.next_joint)
    }
}
