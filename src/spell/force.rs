//! Telekinesis: grab the aimed object with an open upturned palm, steer
//! it with the left index finger, then shove it away or slam it still.

use crate::collab::EffectCommand;
use crate::gesture::Gesture;
use crate::hand::{FingerKind, Handedness};
use glam::Vec3;

use super::engine::{LastingBehavior, SpellBehavior, SpellCx};

/// The held object floats this far past the steering fingertip.
const HOLD_DISTANCE: f32 = 5.0;
const PUSH_IMPULSE: f32 = 350.0;

/// Nested gesture armed/fired latch, mirroring the main lifecycle at a
/// smaller scale.
struct SubGesture {
    gesture: Box<dyn Gesture>,
    armed: bool,
}

impl SubGesture {
    fn new(gesture: Box<dyn Gesture>) -> Self {
        Self {
            gesture,
            armed: false,
        }
    }

    /// Returns true on the tick the gesture fires.
    fn poll(&mut self, cx: &mut SpellCx) -> bool {
        if self.gesture.start_pose(cx.q, cx.now) {
            self.armed = true;
        } else if self.gesture.break_pose(cx.q, cx.now) {
            self.armed = false;
        }
        if self.armed && self.gesture.cast_pose(cx.q, cx.now) {
            self.armed = false;
            return true;
        }
        false
    }
}

pub struct Force {
    hold: Box<dyn Gesture>,
    push: SubGesture,
    stop: SubGesture,
    mana_cost: f32,
    upkeep: f32,
    controlled: Option<crate::aim::TargetId>,
    released: bool,
}

impl Force {
    pub fn new(
        hold: Box<dyn Gesture>,
        push: Box<dyn Gesture>,
        stop: Box<dyn Gesture>,
        mana_cost: f32,
        upkeep: f32,
    ) -> Self {
        Self {
            hold,
            push: SubGesture::new(push),
            stop: SubGesture::new(stop),
            mana_cost,
            upkeep,
            controlled: None,
            released: false,
        }
    }

    fn steer_point(cx: &SpellCx) -> Vec3 {
        cx.q.tip_position(Handedness::Left, FingerKind::Index)
            + cx.q.pointing_direction(Handedness::Left) * HOLD_DISTANCE
    }
}

impl SpellBehavior for Force {
    fn name(&self) -> &'static str {
        "force"
    }

    fn mana_cost(&self) -> f32 {
        self.mana_cost
    }

    fn detect_start(&mut self, cx: &mut SpellCx) -> bool {
        self.hold.start_pose(cx.q, cx.now)
    }

    fn is_broken(&mut self, cx: &mut SpellCx) -> bool {
        self.hold.break_pose(cx.q, cx.now)
    }

    /// The grab lands only when the aim rests on a grabbable object.
    fn should_cast(&mut self, cx: &mut SpellCx) -> bool {
        let Some(entity) = cx.aim.entity else {
            return false;
        };
        self.controlled = entity.is_grabbable.then_some(entity.id);
        self.hold.cast_pose(cx.q, cx.now)
    }

    fn cast(&mut self, cx: &mut SpellCx) {
        if !cx.q.both_present() {
            return;
        }
        self.released = false;
        if let Some(target) = self.controlled {
            let anchor = cx.q.tip_position(Handedness::Right, FingerKind::Index)
                + cx.q.pointing_direction(Handedness::Right) * HOLD_DISTANCE;
            cx.effects.submit(EffectCommand::HoldAt {
                target,
                position: anchor,
            });
            cx.audio.play("force_cast");
        }
    }
}

impl LastingBehavior for Force {
    fn upkeep_cost(&self) -> f32 {
        self.upkeep
    }

    /// The hold ends when nothing is grabbed, a shove or slam released
    /// it, or the steering finger curls.
    fn should_finish(&mut self, cx: &mut SpellCx) -> bool {
        if self.controlled.is_none() || self.released {
            return true;
        }
        !cx.q.is_finger_extended(Handedness::Left, FingerKind::Index)
    }

    fn keep_casting(&mut self, cx: &mut SpellCx) {
        let Some(target) = self.controlled else {
            return;
        };

        if self.push.poll(cx) {
            let direction = cx.q.pointing_direction(Handedness::Left).normalize_or_zero();
            cx.effects.submit(EffectCommand::Impulse {
                target,
                impulse: direction * PUSH_IMPULSE,
            });
            self.released = true;
            return;
        }
        if self.stop.poll(cx) {
            cx.effects.submit(EffectCommand::Halt { target });
            self.released = true;
            return;
        }

        cx.effects.submit(EffectCommand::HoldAt {
            target,
            position: Self::steer_point(cx),
        });
    }

    fn finish(&mut self, _cx: &mut SpellCx) {
        self.controlled = None;
        self.released = false;
    }
}

// ── Tests ──────────────────────────────────────────────────
