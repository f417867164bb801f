//! Spell lifecycle state machine.
//!
//! Each spell advances at most one state per tick. The machine owns the
//! transition rules and the mana gate; behaviors supply the pose checks
//! and effects. A one-shot spell runs `idle -> started -> performed ->
//! casted -> finished -> idle`, a lasting spell inserts `casting` between
//! `casted` and `finished`, and a break in `performed` routes through
//! `broken` back to `idle` without spending mana.

use tracing::debug;

use crate::aim::AimState;
use crate::collab::{AudioSink, EffectSink};
use crate::query::HandQuery;

use super::mana::ManaPool;
use super::state::SpellState;

/// Everything a behavior may read or command during one tick.
pub struct SpellCx<'a> {
    pub q: &'a HandQuery,
    pub aim: &'a AimState,
    /// Session clock, seconds.
    pub now: f64,
    pub audio: &'a mut dyn AudioSink,
    pub effects: &'a mut dyn EffectSink,
}

/// Hooks for a one-shot spell. Mandatory methods decide transitions;
/// the rest are effect hooks with no-op defaults.
pub trait SpellBehavior {
    fn name(&self) -> &'static str;

    /// Mana paid once, at the cast transition.
    fn mana_cost(&self) -> f32 {
        0.0
    }

    fn detect_start(&mut self, cx: &mut SpellCx) -> bool;
    fn is_broken(&mut self, cx: &mut SpellCx) -> bool;
    fn should_cast(&mut self, cx: &mut SpellCx) -> bool;
    fn cast(&mut self, cx: &mut SpellCx);

    fn after_start(&mut self, cx: &mut SpellCx) {
        let _ = cx;
    }

    /// Runs each tick the spell holds in `performed` without casting.
    fn performing(&mut self, cx: &mut SpellCx) {
        let _ = cx;
    }

    fn on_broken(&mut self, cx: &mut SpellCx) {
        let _ = cx;
    }

    fn after_cast(&mut self, cx: &mut SpellCx) {
        let _ = cx;
    }
}

/// Additional hooks for a spell that channels after casting.
pub trait LastingBehavior: SpellBehavior {
    /// Mana paid every tick while channeling.
    fn upkeep_cost(&self) -> f32 {
        0.0
    }

    fn should_finish(&mut self, cx: &mut SpellCx) -> bool;

    /// Runs each channeling tick that does not finish.
    fn keep_casting(&mut self, cx: &mut SpellCx);

    fn finish(&mut self, cx: &mut SpellCx);
}

enum Behavior {
    OneShot(Box<dyn SpellBehavior>),
    Lasting(Box<dyn LastingBehavior>),
}

impl Behavior {
    fn base(&mut self) -> &mut dyn SpellBehavior {
        match self {
            Self::OneShot(b) => b.as_mut(),
            Self::Lasting(b) => b.as_mut(),
        }
    }
}

/// One spell instance: a behavior plus its lifecycle state.
pub struct Spell {
    name: &'static str,
    state: SpellState,
    behavior: Behavior,
}

impl Spell {
    pub fn one_shot(behavior: Box<dyn SpellBehavior>) -> Self {
        Self {
            name: behavior.name(),
            state: SpellState::Idle,
            behavior: Behavior::OneShot(behavior),
        }
    }

    pub fn lasting(behavior: Box<dyn LastingBehavior>) -> Self {
        Self {
            name: behavior.name(),
            state: SpellState::Idle,
            behavior: Behavior::Lasting(behavior),
        }
    }

    pub fn state(&self) -> SpellState {
        self.state
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Advance the lifecycle by at most one transition.
    pub fn tick(&mut self, cx: &mut SpellCx, mana: &mut ManaPool) {
        let next = match self.state {
            SpellState::Idle => {
                let b = self.behavior.base();
                b.detect_start(cx).then_some(SpellState::Started)
            }
            SpellState::Started => {
                self.behavior.base().after_start(cx);
                Some(SpellState::Performed)
            }
            SpellState::Performed => self.tick_performed(cx, mana),
            SpellState::Broken => {
                self.behavior.base().on_broken(cx);
                Some(SpellState::Idle)
            }
            SpellState::Casted => {
                self.behavior.base().after_cast(cx);
                Some(match self.behavior {
                    Behavior::OneShot(_) => SpellState::Finished,
                    Behavior::Lasting(_) => SpellState::Casting,
                })
            }
            SpellState::Casting => self.tick_casting(cx, mana),
            SpellState::Finished => {
                if let Behavior::Lasting(b) = &mut self.behavior {
                    b.finish(cx);
                }
                Some(SpellState::Idle)
            }
        };

        if let Some(next) = next {
            debug!(
                spell = self.name,
                from = self.state.as_str(),
                to = next.as_str(),
                "spell transition"
            );
            self.state = next;
        }
    }

    /// Break wins over cast; the cast is gated on the one-time mana
    /// cost, and an unaffordable cast simply holds in `performed`.
    fn tick_performed(&mut self, cx: &mut SpellCx, mana: &mut ManaPool) -> Option<SpellState> {
        let b = self.behavior.base();
        if b.is_broken(cx) {
            return Some(SpellState::Broken);
        }
        if b.should_cast(cx) {
            let cost = b.mana_cost();
            if mana.enough(cost) {
                b.cast(cx);
                mana.spend(cost);
                return Some(SpellState::Casted);
            }
            return None;
        }
        b.performing(cx);
        None
    }

    /// Upkeep is deducted before the finish check, so the final tick of
    /// a channel is paid for.
    fn tick_casting(&mut self, cx: &mut SpellCx, mana: &mut ManaPool) -> Option<SpellState> {
        let Behavior::Lasting(b) = &mut self.behavior else {
            // One-shot spells never enter this state.
            return Some(SpellState::Finished);
        };
        let upkeep = b.upkeep_cost();
        mana.spend(upkeep);
        if b.should_finish(cx) || !mana.enough(upkeep) {
            return Some(SpellState::Finished);
        }
        b.keep_casting(cx);
        None
    }
}

// ── Tests ──────────────────────────────────────────────────
