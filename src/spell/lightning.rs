//! Lightning: charge a bolt overhead, then channel it into the target.

use glam::Vec3;

use crate::collab::EffectCommand;
use crate::gesture::Gesture;
use crate::hand::Handedness;

use super::engine::{LastingBehavior, SpellBehavior, SpellCx};

/// Seconds the pose must be held before the bolt can be released.
pub const CHARGE_SECS: f64 = 3.0;

/// The charging bolt strikes down from this far above the player.
const SKY_HEIGHT: f32 = 10.0;
const CHARGE_BOLT_WIDTH: f32 = 0.1;
const TARGET_BOLT_WIDTH: f32 = 0.6;
/// Palms count as facing each other above this mutual dot product.
const FACING_EACH_OTHER_DOT: f32 = 0.6;

pub struct Lightning {
    gesture: Box<dyn Gesture>,
    mana_cost: f32,
    upkeep: f32,
    started_at: f64,
    charged: bool,
}

impl Lightning {
    pub fn new(gesture: Box<dyn Gesture>, mana_cost: f32, upkeep: f32) -> Self {
        Self {
            gesture,
            mana_cost,
            upkeep,
            started_at: 0.0,
            charged: false,
        }
    }

    fn reset(&mut self, cx: &mut SpellCx) {
        cx.audio.stop("electricity");
        cx.effects.submit(EffectCommand::ClearBolt);
        self.charged = false;
        self.started_at = 0.0;
    }

    fn hands_facing_each_other(cx: &SpellCx) -> bool {
        let right_pos = cx.q.palm_position(Handedness::Right);
        let left_pos = cx.q.palm_position(Handedness::Left);
        let right_to_left = (left_pos - right_pos).normalize_or_zero();

        let dot_right = cx
            .q
            .palm_normal(Handedness::Right)
            .normalize_or_zero()
            .dot(right_to_left);
        let dot_left = cx
            .q
            .palm_normal(Handedness::Left)
            .normalize_or_zero()
            .dot(-right_to_left);

        dot_right > FACING_EACH_OTHER_DOT && dot_left > FACING_EACH_OTHER_DOT
    }
}

impl SpellBehavior for Lightning {
    fn name(&self) -> &'static str {
        "lightning"
    }

    fn mana_cost(&self) -> f32 {
        self.mana_cost
    }

    fn detect_start(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.start_pose(cx.q, cx.now)
    }

    /// The charge bolt arcs from the sky into the raised palm.
    fn after_start(&mut self, cx: &mut SpellCx) {
        self.started_at = cx.now;
        self.charged = false;
        cx.effects.submit(EffectCommand::Bolt {
            start: cx.q.player().position + Vec3::Y * SKY_HEIGHT,
            end: cx.q.palm_position(Handedness::Right),
            width: CHARGE_BOLT_WIDTH,
        });
        cx.audio.play("electricity");
    }

    fn performing(&mut self, cx: &mut SpellCx) {
        cx.effects.submit(EffectCommand::Bolt {
            start: cx.q.player().position + Vec3::Y * SKY_HEIGHT,
            end: cx.q.palm_position(Handedness::Right),
            width: CHARGE_BOLT_WIDTH,
        });
        self.charged = cx.now - self.started_at >= CHARGE_SECS;
    }

    /// A fully charged bolt can no longer be broken by a pose slip.
    fn is_broken(&mut self, cx: &mut SpellCx) -> bool {
        if !cx.q.both_present() {
            return true;
        }
        self.gesture.break_pose(cx.q, cx.now) && !self.charged
    }

    fn on_broken(&mut self, cx: &mut SpellCx) {
        self.reset(cx);
    }

    fn should_cast(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.cast_pose(cx.q, cx.now) && self.charged
    }

    /// The aim line would cross the beam; hide it while channeling.
    fn cast(&mut self, cx: &mut SpellCx) {
        cx.effects
            .submit(EffectCommand::AimIndicator { visible: false });
    }

    fn after_cast(&mut self, cx: &mut SpellCx) {
        cx.audio.play("electricity_charged");
    }
}

impl LastingBehavior for Lightning {
    fn upkeep_cost(&self) -> f32 {
        self.upkeep
    }

    fn should_finish(&mut self, cx: &mut SpellCx) -> bool {
        !cx.q.both_present() || cx.q.both_closed()
    }

    /// With a target the beam jumps to it and electrifies enemies; with
    /// palms turned toward each other (or nothing targeted) it plays
    /// between the hands instead.
    fn keep_casting(&mut self, cx: &mut SpellCx) {
        let right = cx.q.palm_position(Handedness::Right);
        match cx.aim.target {
            Some(target) if !Self::hands_facing_each_other(cx) => {
                cx.effects.submit(EffectCommand::Bolt {
                    start: right,
                    end: target,
                    width: TARGET_BOLT_WIDTH,
                });
                if let Some(entity) = cx.aim.entity {
                    if entity.is_enemy {
                        cx.effects.submit(EffectCommand::Electrify { target: entity.id });
                    }
                }
            }
            _ => {
                cx.effects.submit(EffectCommand::Bolt {
                    start: right,
                    end: cx.q.palm_position(Handedness::Left),
                    width: CHARGE_BOLT_WIDTH,
                });
            }
        }
    }

    fn finish(&mut self, cx: &mut SpellCx) {
        cx.effects
            .submit(EffectCommand::AimIndicator { visible: true });
        self.reset(cx);
    }
}

// ── Tests ──────────────────────────────────────────────────
