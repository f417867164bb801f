//! Fireball gesture: conjure in a downturned fist, release by flipping
//! the palm open.

use crate::hand::Handedness;
use crate::query::HandQuery;

use super::Gesture;

const START_NORMAL_Y: f32 = -0.85;
const CAST_NORMAL_Y: f32 = 0.6;

/// Skeletal variant, keyed on the world-up component of the palm normal.
#[derive(Default)]
pub struct FireballSkeletal;

impl Gesture for FireballSkeletal {
    /// Right fist with the palm facing down.
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present()
            && q.is_closed(Handedness::Right)
            && q.palm_normal(Handedness::Right).y < START_NORMAL_Y
    }

    /// The fist opened before the palm was rotated up.
    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        if !q.both_present() {
            return true;
        }
        !q.is_closed_without_thumb(Handedness::Right) && q.palm_normal(Handedness::Right).y < 0.0
    }

    /// Open hand with the palm facing up.
    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && q.palm_normal(Handedness::Right).y > CAST_NORMAL_Y
    }
}

const CAMERA_START_DOT: f32 = 0.8;
const CAMERA_CAST_DOT: f32 = -0.6;

/// Camera variant. Without a reliable world-up palm normal the pose is
/// keyed on the palm facing toward or away from the player's body.
#[derive(Default)]
pub struct FireballCamera;

impl FireballCamera {
    fn player_dot(q: &HandQuery, handedness: Handedness) -> f32 {
        let to_player =
            (q.player().position - q.palm_position(handedness)).normalize_or_zero();
        q.palm_normal(handedness).dot(to_player)
    }

    fn closed_facing_player(q: &HandQuery, handedness: Handedness) -> bool {
        q.is_closed(handedness) && Self::player_dot(q, handedness) > CAMERA_START_DOT
    }
}

impl Gesture for FireballCamera {
    /// Right fist turned toward the player, and only the right one; a
    /// mirrored left fist would make the shield pose ambiguous.
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present()
            && Self::closed_facing_player(q, Handedness::Right)
            && !Self::closed_facing_player(q, Handedness::Left)
    }

    /// The fist opened before the palm was turned outward.
    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        if !q.both_present() {
            return true;
        }
        !q.is_closed_without_thumb(Handedness::Right)
            && Self::player_dot(q, Handedness::Right) > CAMERA_CAST_DOT
    }

    /// Open hand with the palm turned away from the player.
    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && Self::player_dot(q, Handedness::Right) < CAMERA_CAST_DOT
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::make_hand;
    use crate::player::PlayerFrame;
    use glam::Vec3;

    fn both_hands(right_extended: [bool; 5], right_normal: Vec3) -> HandQuery {
        let mut right = make_hand(Handedness::Right, right_extended);
        right.palm_normal = right_normal;
        HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            Some(right),
            PlayerFrame::default(),
        )
    }

    #[test]
    fn skeletal_triple() {
        let mut g = FireballSkeletal;

        // Downturned fist starts.
        let fist_down = both_hands([false; 5], Vec3::NEG_Y);
        assert!(g.start_pose(&fist_down, 0.0));
        assert!(!g.break_pose(&fist_down, 0.0));
        assert!(!g.cast_pose(&fist_down, 0.0));

        // Opening while still facing down breaks.
        let open_down = both_hands([true; 5], Vec3::NEG_Y);
        assert!(g.break_pose(&open_down, 0.0));

        // Open palm flipped up casts.
        let open_up = both_hands([true; 5], Vec3::Y);
        assert!(g.cast_pose(&open_up, 0.0));
        assert!(!g.break_pose(&open_up, 0.0));
    }

    #[test]
    fn skeletal_needs_both_hands() {
        let mut right = make_hand(Handedness::Right, [false; 5]);
        right.palm_normal = Vec3::NEG_Y;
        let q = HandQuery::from_hands(None, Some(right), PlayerFrame::default());

        let mut g = FireballSkeletal;
        assert!(!g.start_pose(&q, 0.0));
        assert!(g.break_pose(&q, 0.0));
        assert!(!g.cast_pose(&q, 0.0));
    }

    #[test]
    fn camera_triple() {
        // Player at the origin; make_hand palms sit near it, so a palm
        // normal pointing at the origin counts as facing the player.
        let mut g = FireballCamera;

        let toward = |q: &HandQuery| {
            (q.player().position - q.palm_position(Handedness::Right)).normalize()
        };

        let mut q = both_hands([false; 5], Vec3::ZERO);
        let t = toward(&q);
        q = both_hands([false; 5], t);
        assert!(g.start_pose(&q, 0.0));
        assert!(!g.cast_pose(&q, 0.0));

        // Open hand turned away casts.
        let mut q = both_hands([true; 5], Vec3::ZERO);
        let away = -toward(&q);
        q = both_hands([true; 5], away);
        assert!(g.cast_pose(&q, 0.0));
        assert!(!g.break_pose(&q, 0.0));

        // Open hand still turned toward the player breaks.
        let mut q = both_hands([true; 5], Vec3::ZERO);
        let t = toward(&q);
        q = both_hands([true; 5], t);
        assert!(g.break_pose(&q, 0.0));
    }

    #[test]
    fn camera_start_rejects_mirrored_left_fist() {
        let player = PlayerFrame::default();
        let mut right = make_hand(Handedness::Right, [false; 5]);
        right.palm_normal =
            (player.position - right.palm_position).normalize();
        let mut left = make_hand(Handedness::Left, [false; 5]);
        left.palm_normal = (player.position - left.palm_position).normalize();

        let q = HandQuery::from_hands(Some(left), Some(right), player);
        let mut g = FireballCamera;
        assert!(!g.start_pose(&q, 0.0));
    }
}
