//! Device-agnostic hand model.
//!
//! Pure geometric data in one consistent world frame. Device adapters in
//! `crate::tracking` are responsible for transforming device-local data
//! into this frame before construction; nothing here knows about devices.

mod bone;
mod finger;

pub use bone::{Bone, BoneKind};
pub use finger::{Finger, FingerKind, EXTENDED_MAX_ANGLE_DEG, FINGER_COUNT};

#[cfg(test)]
pub use finger::make_finger;

use glam::{Quat, Vec3};

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Complete tracked state for one hand, rebuilt or refreshed every frame
/// by exactly one device adapter.
#[derive(Debug, Clone)]
pub struct Hand {
    pub handedness: Handedness,
    /// Palm center position.
    pub palm_position: Vec3,
    /// Palm velocity in meters per second; zero when the backend does not
    /// measure velocity.
    pub palm_velocity: Vec3,
    /// Unit normal pointing out of the palm surface.
    pub palm_normal: Vec3,
    /// Unit vector from the palm toward the fingers.
    pub direction: Vec3,
    /// Wrist position.
    pub wrist: Vec3,
    /// Palm orientation.
    pub rotation: Quat,
    /// Elbow position when the backend tracks the forearm.
    pub elbow: Option<Vec3>,
    /// All five fingers, thumb first.
    pub fingers: [Finger; FINGER_COUNT],
}

impl Hand {
    pub fn finger(&self, kind: FingerKind) -> &Finger {
        &self.fingers[kind.index()]
    }

    /// Endpoints for the forearm line: elbow (or a point below the wrist
    /// when the forearm is untracked) and wrist.
    pub fn elbow_line(&self) -> [Vec3; 2] {
        [self.elbow.unwrap_or(self.wrist - Vec3::Y), self.wrist]
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Build a hand with each finger straight (`true`) or curled (`false`).
#[cfg(test)]
pub fn make_hand(handedness: Handedness, extended: [bool; FINGER_COUNT]) -> Hand {
    let fingers = FingerKind::ALL.map(|kind| {
        let base = Vec3::new(kind.index() as f32 * 0.02, 0.0, 0.0);
        let bend = if extended[kind.index()] { 0.0 } else { 90.0 };
        make_finger(kind, base, Vec3::Y, bend)
    });
    Hand {
        handedness,
        palm_position: Vec3::new(0.04, 0.0, 0.0),
        palm_velocity: Vec3::ZERO,
        palm_normal: Vec3::NEG_Z,
        direction: Vec3::Y,
        wrist: Vec3::new(0.04, -0.05, 0.0),
        rotation: Quat::IDENTITY,
        elbow: None,
        fingers,
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_lookup_by_kind() {
        let hand = make_hand(Handedness::Right, [true; 5]);
        assert_eq!(hand.finger(FingerKind::Thumb).kind, FingerKind::Thumb);
        assert_eq!(hand.finger(FingerKind::Pinky).kind, FingerKind::Pinky);
    }

    #[test]
    fn elbow_line_falls_back_below_wrist() {
        let hand = make_hand(Handedness::Left, [true; 5]);
        let [elbow, wrist] = hand.elbow_line();
        assert_eq!(wrist, hand.wrist);
        assert_eq!(elbow, hand.wrist - Vec3::Y);
    }

    #[test]
    fn elbow_line_uses_tracked_elbow() {
        let mut hand = make_hand(Handedness::Left, [true; 5]);
        hand.elbow = Some(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(hand.elbow_line()[0], Vec3::new(1.0, 2.0, 3.0));
    }
}
