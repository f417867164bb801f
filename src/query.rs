//! Per-frame hand query facade.
//!
//! A snapshot of both hands plus the player frame, taken once per tick
//! after the tracker refresh. Every pose predicate the gesture layer uses
//! lives here; gestures never touch the tracker or the raw hand arrays.
//! All predicates are false and all positional accessors return zero for
//! an absent hand, so callers need no presence checks of their own.

use glam::Vec3;

use crate::hand::{FingerKind, Hand, Handedness};
use crate::player::PlayerFrame;
use crate::tracking::Tracker;

/// Dot-product magnitude above which a palm counts as facing toward or
/// away from the player.
pub const FACING_DOT_LIMIT: f32 = 0.6;

/// Immutable view of both hands for one tick.
#[derive(Clone, Default)]
pub struct HandQuery {
    left: Option<Hand>,
    right: Option<Hand>,
    player: PlayerFrame,
}

impl HandQuery {
    /// Snapshot the tracker's current hands.
    pub fn snapshot(tracker: &Tracker, player: &PlayerFrame) -> Self {
        Self {
            left: tracker.hand(Handedness::Left).cloned(),
            right: tracker.hand(Handedness::Right).cloned(),
            player: *player,
        }
    }

    pub fn from_hands(left: Option<Hand>, right: Option<Hand>, player: PlayerFrame) -> Self {
        Self {
            left,
            right,
            player,
        }
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        match handedness {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    pub fn player(&self) -> &PlayerFrame {
        &self.player
    }

    // ── Presence and pose shape ────────────────────────────

    pub fn is_present(&self, handedness: Handedness) -> bool {
        self.hand(handedness).is_some()
    }

    pub fn both_present(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// All five fingers extended.
    pub fn is_open(&self, handedness: Handedness) -> bool {
        self.all_fingers(handedness, |f| f.is_extended())
    }

    /// No finger extended.
    pub fn is_closed(&self, handedness: Handedness) -> bool {
        self.all_fingers(handedness, |f| !f.is_extended())
    }

    /// Fist ignoring the thumb, which camera estimates often misreport
    /// on a closed hand.
    pub fn is_closed_without_thumb(&self, handedness: Handedness) -> bool {
        self.all_fingers(handedness, |f| {
            f.kind == FingerKind::Thumb || !f.is_extended()
        })
    }

    /// Only the index finger extended.
    pub fn is_pointing(&self, handedness: Handedness) -> bool {
        self.all_fingers(handedness, |f| {
            (f.kind == FingerKind::Index) == f.is_extended()
        })
    }

    /// Pointing, tolerating the middle finger trailing along with the
    /// index (a common tracking artifact on a pointing hand).
    pub fn is_pointing_tolerant(&self, handedness: Handedness) -> bool {
        self.is_pointing(handedness)
            || self.all_fingers(handedness, |f| match f.kind {
                FingerKind::Index | FingerKind::Middle => f.is_extended(),
                _ => !f.is_extended(),
            })
    }

    /// Single-finger extension check.
    pub fn is_finger_extended(&self, handedness: Handedness, finger: FingerKind) -> bool {
        self.hand(handedness)
            .is_some_and(|h| h.finger(finger).is_extended())
    }

    /// Index and middle extended, ring and pinky folded; the thumb is
    /// free.
    pub fn is_peace_sign(&self, handedness: Handedness) -> bool {
        self.all_fingers(handedness, |f| match f.kind {
            FingerKind::Index | FingerKind::Middle => f.is_extended(),
            FingerKind::Thumb => true,
            _ => !f.is_extended(),
        })
    }

    /// Fist with the thumb extended and pointing below the horizontal.
    pub fn is_thumbs_down(&self, handedness: Handedness) -> bool {
        let Some(hand) = self.hand(handedness) else {
            return false;
        };
        let shape = hand
            .fingers
            .iter()
            .all(|f| (f.kind == FingerKind::Thumb) == f.is_extended());
        shape && hand.finger(FingerKind::Thumb).direction().y < -0.5
    }

    pub fn both_peace_sign(&self) -> bool {
        self.is_peace_sign(Handedness::Left) && self.is_peace_sign(Handedness::Right)
    }

    pub fn both_open(&self) -> bool {
        self.is_open(Handedness::Left) && self.is_open(Handedness::Right)
    }

    pub fn both_closed(&self) -> bool {
        self.is_closed(Handedness::Left) && self.is_closed(Handedness::Right)
    }

    // ── Orientation relative to the player ─────────────────

    /// Palm turned toward the player's face.
    pub fn is_facing_player(&self, handedness: Handedness) -> bool {
        self.facing_dot(handedness)
            .is_some_and(|d| d < -FACING_DOT_LIMIT)
    }

    /// Palm turned away from the player.
    pub fn is_facing_away(&self, handedness: Handedness) -> bool {
        self.facing_dot(handedness)
            .is_some_and(|d| d > FACING_DOT_LIMIT)
    }

    pub fn both_facing_player(&self) -> bool {
        self.is_facing_player(Handedness::Left) && self.is_facing_player(Handedness::Right)
    }

    pub fn both_facing_away(&self) -> bool {
        self.is_facing_away(Handedness::Left) && self.is_facing_away(Handedness::Right)
    }

    // ── Motion ─────────────────────────────────────────────

    /// Palm rising faster than `speed` meters per second.
    pub fn is_moving_up(&self, handedness: Handedness, speed: f32) -> bool {
        self.hand(handedness)
            .is_some_and(|h| h.palm_velocity.y > speed)
    }

    /// Palm dropping faster than `speed` meters per second.
    pub fn is_moving_down(&self, handedness: Handedness, speed: f32) -> bool {
        self.hand(handedness)
            .is_some_and(|h| h.palm_velocity.y < -speed)
    }

    /// Palm moving away from the player faster than `speed` meters per
    /// second, with a forward component.
    pub fn is_moving_forward(&self, handedness: Handedness, speed: f32) -> bool {
        self.hand(handedness).is_some_and(|h| {
            h.palm_velocity.dot(self.player.forward()) > 0.0 && h.palm_velocity.length() > speed
        })
    }

    /// Palm moving vertically in either direction faster than `speed`.
    pub fn is_moving(&self, handedness: Handedness, speed: f32) -> bool {
        self.is_moving_up(handedness, speed) || self.is_moving_down(handedness, speed)
    }

    // ── Positional accessors ───────────────────────────────

    pub fn palm_position(&self, handedness: Handedness) -> Vec3 {
        self.hand(handedness)
            .map_or(Vec3::ZERO, |h| h.palm_position)
    }

    pub fn palm_normal(&self, handedness: Handedness) -> Vec3 {
        self.hand(handedness).map_or(Vec3::ZERO, |h| h.palm_normal)
    }

    pub fn palm_velocity(&self, handedness: Handedness) -> Vec3 {
        self.hand(handedness)
            .map_or(Vec3::ZERO, |h| h.palm_velocity)
    }

    /// Overall hand direction, palm toward fingers.
    pub fn hand_direction(&self, handedness: Handedness) -> Vec3 {
        self.hand(handedness).map_or(Vec3::ZERO, |h| h.direction)
    }

    pub fn tip_position(&self, handedness: Handedness, finger: FingerKind) -> Vec3 {
        self.hand(handedness)
            .map_or(Vec3::ZERO, |h| h.finger(finger).tip())
    }

    pub fn finger_direction(&self, handedness: Handedness, finger: FingerKind) -> Vec3 {
        self.hand(handedness)
            .map_or(Vec3::ZERO, |h| h.finger(finger).direction())
    }

    /// Index finger direction, the aiming ray for pointing poses.
    pub fn pointing_direction(&self, handedness: Handedness) -> Vec3 {
        self.finger_direction(handedness, FingerKind::Index)
    }

    /// Forearm line endpoints, elbow then wrist.
    pub fn elbow_line(&self, handedness: Handedness) -> [Vec3; 2] {
        self.hand(handedness)
            .map_or([Vec3::ZERO, Vec3::ZERO], |h| h.elbow_line())
    }

    fn all_fingers(&self, handedness: Handedness, pred: impl Fn(&crate::hand::Finger) -> bool) -> bool {
        self.hand(handedness)
            .is_some_and(|h| h.fingers.iter().all(pred))
    }

    fn facing_dot(&self, handedness: Handedness) -> Option<f32> {
        self.hand(handedness)
            .map(|h| h.palm_normal.dot(self.player.forward()))
    }
}

// ── Tests ──────────────────────────────────────────────────
