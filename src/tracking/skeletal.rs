//! Skeletal tracker backend.
//!
//! Wraps the native per-frame skeletal pose delivered by the tracking
//! service. The adapter is a thin projection of native fields into the
//! hand model; the only computation is millimeter-to-meter conversion.

use glam::{Quat, Vec3};
use tracing::warn;

use crate::hand::{Bone, BoneKind, Finger, FingerKind, Hand, Handedness, FINGER_COUNT};
use crate::player::PlayerFrame;

/// Native device units are millimeters.
const MM_TO_M: f32 = 0.001;

/// One bone as reported by the skeletal service, in device units.
#[derive(Debug, Clone, Copy)]
pub struct SkeletalBone {
    pub prev_joint: Vec3,
    pub next_joint: Vec3,
    pub rotation: Quat,
}

/// One hand as reported by the skeletal service, in device units.
///
/// The service reports four bones per finger; the thumb's metacarpal is a
/// zero-length placeholder and is dropped during projection.
#[derive(Debug, Clone)]
pub struct SkeletalHand {
    pub palm_position: Vec3,
    pub palm_velocity: Vec3,
    pub palm_normal: Vec3,
    pub direction: Vec3,
    pub wrist: Vec3,
    pub elbow: Vec3,
    pub rotation: Quat,
    /// Bones per finger, thumb first, base to tip within each finger.
    pub fingers: [[SkeletalBone; 4]; FINGER_COUNT],
}

/// A complete pose snapshot from the skeletal service.
#[derive(Debug, Clone, Default)]
pub struct SkeletalFrame {
    pub left: Option<SkeletalHand>,
    pub right: Option<SkeletalHand>,
}

/// Adapter holding the latest submitted frame and the hands projected
/// from it.
#[derive(Default)]
pub struct SkeletalTracker {
    pending: Option<SkeletalFrame>,
    left: Option<Hand>,
    right: Option<Hand>,
}

impl SkeletalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest pose snapshot from the service. A new frame
    /// replaces an unconsumed one.
    pub fn submit_frame(&mut self, frame: SkeletalFrame) {
        self.pending = Some(frame);
    }

    /// Project the latest snapshot into hand model instances.
    pub fn refresh(&mut self, _player: &PlayerFrame) {
        let Some(frame) = self.pending.take() else {
            // No fresh data: the previous hands stay current until the
            // service reports again or explicitly drops a hand.
            return;
        };

        self.left = frame
            .left
            .map(|native| project_hand(&native, Handedness::Left));
        self.right = frame
            .right
            .map(|native| project_hand(&native, Handedness::Right));

        if let Some(hand) = &self.right {
            if hand.palm_velocity.y.is_nan() {
                warn!("skeletal palm velocity is NaN; tracking service may need a restart");
            }
        }
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        match handedness {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }
}

fn project_bone(native: &SkeletalBone, kind: BoneKind) -> Bone {
    Bone::with_rotation(
        native.prev_joint * MM_TO_M,
        native.next_joint * MM_TO_M,
        native.rotation,
        kind,
    )
}

fn project_finger(bones: &[SkeletalBone; 4], kind: FingerKind) -> Finger {
    // The thumb's reported metacarpal is a zero-length placeholder.
    let metacarpal =
        (kind != FingerKind::Thumb).then(|| project_bone(&bones[0], BoneKind::Metacarpal));
    Finger::new(
        metacarpal,
        project_bone(&bones[1], BoneKind::Proximal),
        project_bone(&bones[2], BoneKind::Intermediate),
        project_bone(&bones[3], BoneKind::Distal),
        kind,
    )
}

fn project_hand(native: &SkeletalHand, handedness: Handedness) -> Hand {
    let fingers = FingerKind::ALL.map(|kind| project_finger(&native.fingers[kind.index()], kind));
    Hand {
        handedness,
        palm_position: native.palm_position * MM_TO_M,
        palm_velocity: native.palm_velocity * MM_TO_M,
        palm_normal: native.palm_normal,
        direction: native.direction,
        wrist: native.wrist * MM_TO_M,
        rotation: native.rotation,
        elbow: Some(native.elbow * MM_TO_M),
        fingers,
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
pub fn make_native_hand() -> SkeletalHand {
    let straight = |base: Vec3, dir: Vec3| {
        let seg = 30.0;
        core::array::from_fn::<_, 4, _>(|i| SkeletalBone {
            prev_joint: base + dir * (i as f32 * seg),
            next_joint: base + dir * ((i + 1) as f32 * seg),
            rotation: Quat::IDENTITY,
        })
    };
    SkeletalHand {
        palm_position: Vec3::new(0.0, 1000.0, 0.0),
        palm_velocity: Vec3::new(0.0, 500.0, 0.0),
        palm_normal: Vec3::NEG_Y,
        direction: Vec3::Z,
        wrist: Vec3::new(0.0, 950.0, 0.0),
        elbow: Vec3::new(0.0, 700.0, 0.0),
        rotation: Quat::IDENTITY,
        fingers: core::array::from_fn(|i| {
            straight(Vec3::new(i as f32 * 20.0, 1000.0, 0.0), Vec3::Z)
        }),
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_converts_units() {
        let mut tracker = SkeletalTracker::new();
        tracker.submit_frame(SkeletalFrame {
            left: None,
            right: Some(make_native_hand()),
        });
        tracker.refresh(&PlayerFrame::default());

        let hand = tracker.hand(Handedness::Right).expect("right hand");
        assert!((hand.palm_position.y - 1.0).abs() < 1e-6);
        assert!((hand.palm_velocity.y - 0.5).abs() < 1e-6);
        assert_eq!(hand.elbow, Some(Vec3::new(0.0, 0.7, 0.0)));
        assert!(tracker.hand(Handedness::Left).is_none());
    }

    #[test]
    fn thumb_metacarpal_is_dropped() {
        let mut tracker = SkeletalTracker::new();
        tracker.submit_frame(SkeletalFrame {
            left: Some(make_native_hand()),
            right: None,
        });
        tracker.refresh(&PlayerFrame::default());

        let hand = tracker.hand(Handedness::Left).expect("left hand");
        assert!(hand
            .finger(FingerKind::Thumb)
            .bone(BoneKind::Metacarpal)
            .is_none());
        assert!(hand
            .finger(FingerKind::Index)
            .bone(BoneKind::Metacarpal)
            .is_some());
    }

    #[test]
    fn refresh_without_frame_keeps_previous_hands() {
        let mut tracker = SkeletalTracker::new();
        tracker.submit_frame(SkeletalFrame {
            left: None,
            right: Some(make_native_hand()),
        });
        tracker.refresh(&PlayerFrame::default());
        tracker.refresh(&PlayerFrame::default());
        assert!(tracker.hand(Handedness::Right).is_some());
    }

    #[test]
    fn dropped_hand_becomes_absent() {
        let mut tracker = SkeletalTracker::new();
        tracker.submit_frame(SkeletalFrame {
            left: None,
            right: Some(make_native_hand()),
        });
        tracker.refresh(&PlayerFrame::default());
        tracker.submit_frame(SkeletalFrame::default());
        tracker.refresh(&PlayerFrame::default());
        assert!(tracker.hand(Handedness::Right).is_none());
    }
}
