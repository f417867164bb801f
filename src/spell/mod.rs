//! Spell lifecycle engine, mana, and the concrete spell set.

mod engine;
mod fireball;
mod force;
mod lightning;
mod mana;
mod shield;
mod state;

pub use engine::{LastingBehavior, Spell, SpellBehavior, SpellCx};
pub use fireball::{Fireball, MAX_HOLD_SECS};
pub use force::Force;
pub use lightning::{Lightning, CHARGE_SECS};
pub use mana::{ManaPool, MANA_REGEN_PER_TICK};
pub use shield::Shield;
pub use state::SpellState;

use crate::gesture;
use crate::tracking::DeviceKind;

/// Default mana economy.
pub const FIREBALL_MANA_COST: f32 = 20.0;
pub const LIGHTNING_MANA_COST: f32 = 30.0;
pub const LIGHTNING_UPKEEP: f32 = 0.2;
pub const FORCE_MANA_COST: f32 = 10.0;
pub const FORCE_UPKEEP: f32 = 0.1;

/// Every spell the device can express, with its device-specific gestures
/// already bound. Force is skeletal-only and is simply absent from the
/// camera set.
pub fn standard_set(device: DeviceKind) -> Vec<Spell> {
    let mut spells = Vec::new();

    if let Ok(g) = gesture::fireball(device) {
        spells.push(Spell::one_shot(Box::new(Fireball::new(
            g,
            FIREBALL_MANA_COST,
        ))));
    }
    if let Ok(g) = gesture::lightning(device) {
        spells.push(Spell::lasting(Box::new(Lightning::new(
            g,
            LIGHTNING_MANA_COST,
            LIGHTNING_UPKEEP,
        ))));
    }
    if let (Ok(hold), Ok(push), Ok(stop)) = (
        gesture::force_lift(device),
        gesture::force_push(device),
        gesture::force_stop(device),
    ) {
        spells.push(Spell::lasting(Box::new(Force::new(
            hold,
            push,
            stop,
            FORCE_MANA_COST,
            FORCE_UPKEEP,
        ))));
    }
    if let Ok(g) = gesture::shield(device) {
        spells.push(Spell::lasting(Box::new(Shield::new(g))));
    }

    spells
}
