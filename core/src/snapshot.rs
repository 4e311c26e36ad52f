//! Point-in-time view of the line.
//!
//! Taken between ticks. Used by the conservation checks and by the
//! runner's JSON summary; never read back into an engine.

use crate::{
    train::Direction,
    types::{StationId, Tick, TrainId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainView {
    pub id:        TrainId,
    pub position:  StationId,
    pub direction: Direction,
    pub onboard:   usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time:     Tick,
    pub roster:   usize,
    pub finished: usize,
    pub trains:   Vec<TrainView>,
    /// Waiting count per station, index 0 is station 1.
    pub waiting:  Vec<usize>,
}

impl SimSnapshot {
    pub fn onboard_total(&self) -> usize {
        self.trains.iter().map(|t| t.onboard).sum()
    }

    pub fn waiting_total(&self) -> usize {
        self.waiting.iter().sum()
    }

    /// finished + onboard + waiting == roster.
    pub fn is_conserved(&self) -> bool {
        self.finished + self.onboard_total() + self.waiting_total() == self.roster
    }
}
