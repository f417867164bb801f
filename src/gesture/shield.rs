//! Shield gesture: raise two fists turned outward, drop the shield by
//! turning both palms back toward yourself.

use crate::hand::Handedness;
use crate::query::HandQuery;

use super::{palm_height, Gesture};

/// Orientation-only pose, shared by both backends.
pub struct Shield {
    min_height: f32,
}

impl Default for Shield {
    fn default() -> Self {
        Self { min_height: 0.5 }
    }
}

impl Shield {
    fn hands_high(&self, q: &HandQuery) -> bool {
        palm_height(q, Handedness::Left) > self.min_height
            && palm_height(q, Handedness::Right) > self.min_height
    }
}

impl Gesture for Shield {
    /// Both fists raised, neither palm turned toward the player.
    fn start_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_present() && !q.both_facing_player() && self.hands_high(q) && q.both_closed()
    }

    /// Hands opened, dropped, or lost.
    fn break_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        !q.both_present() || q.both_open() || !self.hands_high(q)
    }

    /// Both fists still raised and now turned toward the player.
    fn cast_pose(&mut self, q: &HandQuery, _now: f64) -> bool {
        q.both_closed() && self.hands_high(q) && q.both_facing_player()
    }
}

// ── Tests ──────────────────────────────────────────────────
