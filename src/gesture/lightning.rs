//! Lightning gesture: hold the charging pose high until the bolt is
//! ready.

use crate::hand::Handedness;
use crate::query::HandQuery;

use super::{palm_height, Gesture};

const POSE_DOT: f32 = 0.8;

/// Skeletal variant: open right palm turned up, held above shoulder
/// height. Once the pose has been held for the charge time the break
/// predicate stops firing, so a twitch during release cannot abort a
/// fully charged bolt.
pub struct LightningSkeletal {
    min_height: f32,
    charge_secs: f64,
    held_since: Option<f64>,
}

impl Default for LightningSkeletal {
    fn default() -> Self {
        Self {
            min_height: 0.65,
            charge_secs: 2.0,
            held_since: None,
        }
    }
}

impl LightningSkeletal {
    fn pose(&self, q: &HandQuery) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && q.palm_normal(Handedness::Right).normalize_or_zero().y > POSE_DOT
            && palm_height(q, Handedness::Right) > self.min_height
    }

    fn charged(&self, now: f64) -> bool {
        self.held_since
            .is_some_and(|since| now - since > self.charge_secs)
    }
}

impl Gesture for LightningSkeletal {
    fn start_pose(&mut self, q: &HandQuery, now: f64) -> bool {
        if self.pose(q) {
            self.held_since = Some(now);
            return true;
        }
        false
    }

    fn break_pose(&mut self, q: &HandQuery, now: f64) -> bool {
        if self.charged(now) {
            return false;
        }
        !self.pose(q)
    }

    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }
}

/// Camera variant: index finger pointing straight up, hand held high.
/// No palm-up check; the estimator's palm normal is too jittery on a
/// vertical hand.
pub struct LightningCamera {
    min_height: f32,
}

impl Default for LightningCamera {
    fn default() -> Self {
        Self { min_height: 0.5 }
    }
}

impl LightningCamera {
    fn pose(&self, q: &HandQuery) -> bool {
        q.both_present()
            && q.is_pointing(Handedness::Right)
            && q.pointing_direction(Handedness::Right).normalize_or_zero().y > POSE_DOT
            && palm_height(q, Handedness::Right) > self.min_height
    }
}

impl Gesture for LightningCamera {
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }

    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        !self.pose(q)
    }

    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{make_hand, FingerKind};
    use crate::player::PlayerFrame;
    use glam::Vec3;

    fn open_palm_up_at(y: f32) -> HandQuery {
        let mut right = make_hand(Handedness::Right, [true; 5]);
        right.palm_normal = Vec3::Y;
        right.palm_position.y = y;
        HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            Some(right),
            PlayerFrame::default(),
        )
    }

    fn high_open_palm_up() -> HandQuery {
        open_palm_up_at(1.0)
    }

    #[test]
    fn skeletal_pose_requires_height() {
        let mut g = LightningSkeletal::default();
        assert!(g.start_pose(&high_open_palm_up(), 0.0));

        let low = open_palm_up_at(0.3);
        assert!(!g.start_pose(&low, 0.0));
        assert!(g.break_pose(&low, 0.1));
    }

    #[test]
    fn skeletal_charge_suppresses_break() {
        let mut g = LightningSkeletal::default();
        let held = high_open_palm_up();
        assert!(g.start_pose(&held, 0.0));

        // Before the charge time, dropping the pose breaks.
        assert!(g.break_pose(&HandQuery::default(), 1.0));

        // Held past the charge time, even a dropped pose no longer breaks.
        assert!(g.start_pose(&held, 0.0));
        assert!(!g.break_pose(&HandQuery::default(), 2.5));
    }

    #[test]
    fn camera_pose_is_a_high_upward_point() {
        let mut right = make_hand(Handedness::Right, [false, true, false, false, false]);
        right.palm_position.y = 1.0;
        // make_hand grows fingers along +Y, so the index already points up.
        let q = HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            Some(right.clone()),
            PlayerFrame::default(),
        );
        let mut g = LightningCamera::default();
        assert!(g.start_pose(&q, 0.0));
        assert!(g.cast_pose(&q, 0.0));
        assert!(!g.break_pose(&q, 0.0));
        assert_eq!(
            q.pointing_direction(Handedness::Right).y.round() as i32,
            1
        );
        assert!(q.is_pointing(Handedness::Right));
        assert!(q
            .finger_direction(Handedness::Right, FingerKind::Index)
            .y
            > POSE_DOT);

        // Too low: no pose.
        right.palm_position.y = 0.2;
        let low = HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            Some(right),
            PlayerFrame::default(),
        );
        assert!(!g.start_pose(&low, 0.0));
        assert!(g.break_pose(&low, 0.0));
    }
}
