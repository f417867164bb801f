//! Fireball: armed in a downturned fist, thrown by flipping the palm
//! open toward the target.

use glam::Vec3;

use crate::collab::EffectCommand;
use crate::gesture::Gesture;
use crate::hand::Handedness;

use super::engine::{SpellBehavior, SpellCx};

/// Holding the armed fist longer than this breaks the spell.
pub const MAX_HOLD_SECS: f64 = 5.0;

/// Launch speed in meters per second.
const PROJECTILE_SPEED: f32 = 30.0;
const SMOKE_FADE_SECS: f32 = 0.3;
/// Fallback aim distance when nothing is targeted.
const UNAIMED_REACH: f32 = 100.0;

pub struct Fireball {
    gesture: Box<dyn Gesture>,
    mana_cost: f32,
    armed_at: f64,
    smoke_active: bool,
}

impl Fireball {
    pub fn new(gesture: Box<dyn Gesture>, mana_cost: f32) -> Self {
        Self {
            gesture,
            mana_cost,
            armed_at: 0.0,
            smoke_active: false,
        }
    }

    fn fade_smoke(&mut self, cx: &mut SpellCx) {
        if self.smoke_active {
            cx.effects.submit(EffectCommand::FadeSmoke {
                secs: SMOKE_FADE_SECS,
            });
            self.smoke_active = false;
        }
    }
}

impl SpellBehavior for Fireball {
    fn name(&self) -> &'static str {
        "fireball"
    }

    fn mana_cost(&self) -> f32 {
        self.mana_cost
    }

    /// Arming is blocked while the player is steering.
    fn detect_start(&mut self, cx: &mut SpellCx) -> bool {
        if cx.q.player().moving || !self.gesture.start_pose(cx.q, cx.now) {
            return false;
        }
        self.armed_at = cx.now;
        true
    }

    /// Conjuring smoke at the casting palm.
    fn after_start(&mut self, cx: &mut SpellCx) {
        if cx.q.is_present(Handedness::Right) {
            cx.effects.submit(EffectCommand::SpawnSmoke {
                at: cx.q.palm_position(Handedness::Right),
            });
            self.smoke_active = true;
        }
    }

    fn performing(&mut self, cx: &mut SpellCx) {
        if self.smoke_active {
            cx.effects.submit(EffectCommand::MoveSmoke {
                to: cx.q.palm_position(Handedness::Right),
            });
        }
    }

    fn is_broken(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.break_pose(cx.q, cx.now)
            || cx.q.player().moving
            || cx.now - self.armed_at > MAX_HOLD_SECS
    }

    fn on_broken(&mut self, cx: &mut SpellCx) {
        self.fade_smoke(cx);
    }

    fn should_cast(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.cast_pose(cx.q, cx.now)
    }

    /// Launch toward the aim point, or past the off hand along the
    /// aiming direction when nothing is targeted.
    fn cast(&mut self, cx: &mut SpellCx) {
        let palm = cx.q.palm_position(Handedness::Right);
        let direction = match cx.aim.target {
            Some(target) => target - palm,
            None => {
                let off_palm = cx.q.palm_position(Handedness::Left);
                (off_palm + cx.aim.direction * UNAIMED_REACH) - palm
            }
        };
        cx.effects.submit(EffectCommand::LaunchProjectile {
            origin: palm,
            velocity: direction.normalize_or_zero() * PROJECTILE_SPEED,
        });
        cx.audio.play_at("fireball_spawn", palm);
    }

    fn after_cast(&mut self, cx: &mut SpellCx) {
        self.fade_smoke(cx);
    }
}

// ── Tests ──────────────────────────────────────────────────
