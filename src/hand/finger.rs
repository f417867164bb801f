//! Finger geometry and the derived extension classification.

use glam::Vec3;

use super::bone::{Bone, BoneKind};

/// Maximum angle (degrees) between the proximal and distal bone directions
/// for a finger to count as extended. The boundary is exclusive.
pub const EXTENDED_MAX_ANGLE_DEG: f32 = 30.0;

/// Which finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Number of fingers per hand.
pub const FINGER_COUNT: usize = 5;

impl FingerKind {
    /// All fingers in anatomical order, thumb first.
    pub const ALL: [FingerKind; FINGER_COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Array index, 0-4.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

/// One finger: up to four bones in world space.
///
/// The thumb has no metacarpal; all other fingers carry the full chain.
#[derive(Debug, Clone)]
pub struct Finger {
    pub kind: FingerKind,
    metacarpal: Option<Bone>,
    proximal: Bone,
    intermediate: Bone,
    distal: Bone,
}

impl Finger {
    pub fn new(
        metacarpal: Option<Bone>,
        proximal: Bone,
        intermediate: Bone,
        distal: Bone,
        kind: FingerKind,
    ) -> Self {
        Self {
            kind,
            metacarpal,
            proximal,
            intermediate,
            distal,
        }
    }

    /// Bone of the given kind, or `None` where the finger has no such bone
    /// (the thumb's metacarpal).
    pub fn bone(&self, kind: BoneKind) -> Option<&Bone> {
        match kind {
            BoneKind::Metacarpal => self.metacarpal.as_ref(),
            BoneKind::Proximal => Some(&self.proximal),
            BoneKind::Intermediate => Some(&self.intermediate),
            BoneKind::Distal => Some(&self.distal),
        }
    }

    /// Present bones, base to tip.
    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.metacarpal
            .iter()
            .chain([&self.proximal, &self.intermediate, &self.distal])
    }

    /// Fingertip position: the distal bone's outer joint.
    pub fn tip(&self) -> Vec3 {
        self.distal.next_joint
    }

    /// Overall pointing direction, from the proximal base to the tip.
    pub fn direction(&self) -> Vec3 {
        (self.distal.next_joint - self.proximal.prev_joint).normalize_or_zero()
    }

    /// Whether the finger is extended: the distal bone still points the
    /// same way as the proximal bone (angle strictly below the threshold).
    pub fn is_extended(&self) -> bool {
        let angle = self
            .proximal
            .direction()
            .angle_between(self.distal.direction())
            .to_degrees();
        angle < EXTENDED_MAX_ANGLE_DEG
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Build a straight finger along `dir` starting at `base`, with the distal
/// bone bent by `bend_deg` in the base-to-`bend_axis` plane.
#[cfg(test)]
pub fn make_finger(kind: FingerKind, base: Vec3, dir: Vec3, bend_deg: f32) -> Finger {
    use glam::Quat;

    let dir = dir.normalize();
    let seg = 0.03_f32;
    let bend_axis = dir.cross(Vec3::Z).normalize_or_zero();
    let bend_axis = if bend_axis == Vec3::ZERO {
        Vec3::X
    } else {
        bend_axis
    };
    let bent = Quat::from_axis_angle(bend_axis, bend_deg.to_radians()) * dir;

    let metacarpal = (kind != FingerKind::Thumb).then(|| {
        Bone::new(base, base + dir * seg, BoneKind::Metacarpal)
    });
    let p0 = base + dir * seg;
    let proximal = Bone::new(p0, p0 + dir * seg, BoneKind::Proximal);
    let p1 = p0 + dir * seg;
    let intermediate = Bone::new(p1, p1 + dir * seg, BoneKind::Intermediate);
    let p2 = p1 + dir * seg;
    let distal = Bone::new(p2, p2 + bent * seg, BoneKind::Distal);

    Finger::new(metacarpal, proximal, intermediate, distal, kind)
}

// ── Tests ──────────────────────────────────────────────────
