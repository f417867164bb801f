//! Spell lifecycle states.

/// One spell's position in its lifecycle. `Started`, `Broken`, `Casted`
/// and `Finished` are single-tick effect states; a spell rests in `Idle`,
/// holds in `Performed`, and lasting spells channel in `Casting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellState {
    Idle,
    Started,
    Performed,
    Broken,
    Casted,
    Casting,
    Finished,
}

impl SpellState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Performed => "performed",
            Self::Broken => "broken",
            Self::Casted => "casted",
            Self::Casting => "casting",
            Self::Finished => "finished",
        }
    }
}
