//! Player mana pool.

/// Passive regeneration per tick.
pub const MANA_REGEN_PER_TICK: f32 = 0.05;

/// Bounded mana reserve. Every mutation clamps to `0..=max` and notifies
/// the change observer, which drives the mana bar in the embedding UI.
pub struct ManaPool {
    max: f32,
    current: f32,
    on_change: Option<Box<dyn FnMut(f32)>>,
}

impl ManaPool {
    /// Full pool.
    pub fn new(max: f32) -> Self {
        Self {
            max,
            current: max,
            on_change: None,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set_on_change(&mut self, observer: Box<dyn FnMut(f32)>) {
        self.on_change = Some(observer);
    }

    /// Whether `amount` can be paid right now.
    pub fn enough(&self, amount: f32) -> bool {
        self.current >= amount
    }

    pub fn spend(&mut self, amount: f32) {
        self.current -= amount;
        self.settle();
    }

    pub fn regenerate(&mut self, amount: f32) {
        self.current += amount;
        self.settle();
    }

    fn settle(&mut self) {
        self.current = self.current.clamp(0.0, self.max);
        if let Some(observer) = &mut self.on_change {
            observer(self.current);
        }
    }
}
