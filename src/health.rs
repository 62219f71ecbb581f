//! Hit points shared by the player and enemies.
use serde::{Deserialize, Serialize};

/// Current and maximum hit points.
///
/// `current` never exceeds `max` and never wraps below zero; reaching zero
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u16,
    max: u16,
}

impl Health {
    /// Creates a full health pool.
    #[must_use]
    pub const fn full(max: u16) -> Self {
        Self { current: max, max }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> u16 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Whether the pool is empty.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Subtracts `amount`, saturating at zero.
    ///
    /// Returns `true` when this call emptied the pool.
    pub fn apply_damage(&mut self, amount: u16) -> bool {
        if self.is_dead() {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.is_dead()
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(1)
    }
}
