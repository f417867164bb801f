//! Telekinesis gestures: lift, push, and slam. All three arm on a held
//! orientation and fire on a fast palm motion, so they exist only for
//! the velocity-reporting skeletal backend.

use crate::hand::Handedness;
use crate::query::HandQuery;

use super::Gesture;

/// Open right palm turned up; casting is a sharp upward flick.
pub struct ForceLift {
    normal_min_y: f32,
    cast_speed: f32,
}

impl Default for ForceLift {
    fn default() -> Self {
        Self {
            normal_min_y: 0.7,
            cast_speed: 2.0,
        }
    }
}

impl ForceLift {
    fn pose(&self, q: &HandQuery) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && q.palm_normal(Handedness::Right).y > self.normal_min_y
    }
}

impl Gesture for ForceLift {
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }

    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        !self.pose(q)
    }

    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present() && q.is_moving_up(Handedness::Right, self.cast_speed)
    }
}

/// Open right palm turned away from the player; casting is a forward
/// shove.
pub struct ForcePush {
    cast_speed: f32,
}

impl Default for ForcePush {
    fn default() -> Self {
        Self { cast_speed: 3.0 }
    }
}

impl ForcePush {
    fn pose(&self, q: &HandQuery) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && q.is_facing_away(Handedness::Right)
    }
}

impl Gesture for ForcePush {
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }

    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        !self.pose(q)
    }

    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present() && q.is_moving_forward(Handedness::Right, self.cast_speed)
    }
}

/// Open right palm turned down; casting is a downward slam.
pub struct ForceStop {
    normal_max_y: f32,
    cast_speed: f32,
}

impl Default for ForceStop {
    fn default() -> Self {
        Self {
            normal_max_y: -0.85,
            cast_speed: 3.0,
        }
    }
}

impl ForceStop {
    fn pose(&self, q: &HandQuery) -> bool {
        q.both_present()
            && q.is_open(Handedness::Right)
            && q.palm_normal(Handedness::Right).y < self.normal_max_y
    }
}

impl Gesture for ForceStop {
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        self.pose(q)
    }

    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        !self.pose(q)
    }

    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present() && q.is_moving_down(Handedness::Right, self.cast_speed)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::make_hand;
    use crate::player::PlayerFrame;
    use glam::Vec3;

    fn open_right(normal: Vec3, velocity: Vec3) -> HandQuery {
        let mut right = make_hand(Handedness::Right, [true; 5]);
        right.palm_normal = normal;
        right.palm_velocity = velocity;
        HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            Some(right),
            PlayerFrame::default(),
        )
    }

    #[test]
    fn lift_arms_palm_up_and_fires_on_upward_flick() {
        let mut g = ForceLift::default();
        let armed = open_right(Vec3::Y, Vec3::ZERO);
        assert!(g.start_pose(&armed, 0.0));
        assert!(!g.break_pose(&armed, 0.0));
        assert!(!g.cast_pose(&armed, 0.0));

        let flick = open_right(Vec3::Y, Vec3::new(0.0, 2.5, 0.0));
        assert!(g.cast_pose(&flick, 0.0));

        let tilted = open_right(Vec3::Z, Vec3::ZERO);
        assert!(g.break_pose(&tilted, 0.0));
    }

    #[test]
    fn push_arms_facing_away_and_fires_on_shove() {
        let mut g = ForcePush::default();
        // Player forward is +Z by default.
        let armed = open_right(Vec3::Z, Vec3::ZERO);
        assert!(g.start_pose(&armed, 0.0));
        assert!(!g.break_pose(&armed, 0.0));

        let shove = open_right(Vec3::Z, Vec3::new(0.0, 0.0, 3.5));
        assert!(g.cast_pose(&shove, 0.0));

        // Too slow.
        let slow = open_right(Vec3::Z, Vec3::new(0.0, 0.0, 2.0));
        assert!(!g.cast_pose(&slow, 0.0));

        let turned = open_right(Vec3::NEG_Z, Vec3::ZERO);
        assert!(g.break_pose(&turned, 0.0));
    }

    #[test]
    fn stop_arms_palm_down_and_fires_on_slam() {
        let mut g = ForceStop::default();
        let armed = open_right(Vec3::NEG_Y, Vec3::ZERO);
        assert!(g.start_pose(&armed, 0.0));

        let slam = open_right(Vec3::NEG_Y, Vec3::new(0.0, -3.5, 0.0));
        assert!(g.cast_pose(&slam, 0.0));
        assert!(!g.cast_pose(&armed, 0.0));
    }

    #[test]
    fn all_break_when_a_hand_is_lost() {
        let absent = HandQuery::default();
        assert!(ForceLift::default().break_pose(&absent, 0.0));
        assert!(ForcePush::default().break_pose(&absent, 0.0));
        assert!(ForceStop::default().break_pose(&absent, 0.0));
        assert!(!ForceLift::default().start_pose(&absent, 0.0));
        assert!(!ForcePush::default().cast_pose(&absent, 0.0));
    }
}
