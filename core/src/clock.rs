//! Simulation clock: owns the time counter and the step size.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub time: Tick,
    /// Ticks between train steps; the line's travel time.
    pub step: Tick,
    /// Number of advances so far.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(step: Tick) -> Self {
        assert!(step > 0, "clock step must be positive");
        Self { time: 0, step, ticks: 0 }
    }

    /// Whether trains act at the current time.
    pub fn is_active(&self) -> bool {
        self.time.is_multiple_of(self.step)
    }

    /// Advance one step. Returns the new time, or None when the next
    /// step would leave the Tick range; the clock is then unchanged.
    pub fn advance(&mut self) -> Option<Tick> {
        self.time = self.time.checked_add(self.step)?;
        self.ticks += 1;
        Some(self.time)
    }
}
