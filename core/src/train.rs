//! Trains: movement along the line and the per-passenger admission gate.

use crate::{
    passenger::{Passenger, PassengerClass},
    types::{StationId, Tick, TrainId},
};
use serde::{Deserialize, Serialize};

/// Direction of travel. Fixed for a train's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards higher station indices (+1). Spawned at station 1.
    Forward,
    /// Towards lower station indices (-1). Spawned at the last station.
    Backward,
}

impl Direction {
    pub fn step(&self) -> i64 {
        match self {
            Self::Forward  =>  1,
            Self::Backward => -1,
        }
    }
}

/// Why a passenger was turned away. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    WrongDirection,
    NotReady,
    Full,
    LowPriority,
}

/// A refused boarding. Hands the passenger back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub passenger: Passenger,
    pub reason:    RejectReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id:        TrainId,
    pub position:  StationId,
    pub direction: Direction,
    pub capacity:  usize,
    pub clock:     Tick,
    onboard:       Vec<Passenger>,
}

impl Train {
    pub fn new(
        id: TrainId,
        position: StationId,
        direction: Direction,
        capacity: usize,
        clock: Tick,
    ) -> Self {
        Self {
            id,
            position,
            direction,
            capacity,
            clock,
            onboard: Vec::with_capacity(capacity),
        }
    }

    pub fn onboard(&self) -> &[Passenger] {
        &self.onboard
    }

    pub fn onboard_count(&self) -> usize {
        self.onboard.len()
    }

    pub fn set_clock(&mut self, t: Tick) {
        self.clock = t;
    }

    /// Advance one station in the direction of travel. At either end of
    /// the line the train holds position.
    pub fn move_along(&mut self, num_stations: StationId) {
        let next = i64::from(self.position) + self.direction.step();
        if (1..=i64::from(num_stations)).contains(&next) {
            self.position = next as StationId;
        }
    }

    /// The admission gate without side effects.
    pub fn check_admission(&self, passenger: &Passenger) -> Option<RejectReason> {
        let behind = match self.direction {
            Direction::Forward  => passenger.destination < self.position,
            Direction::Backward => passenger.destination > self.position,
        };
        if behind {
            return Some(RejectReason::WrongDirection);
        }
        if passenger.ready_time > self.clock {
            return Some(RejectReason::NotReady);
        }
        let count = self.onboard.len();
        if count >= self.capacity {
            return Some(RejectReason::Full);
        }
        // "More than half full" under real division: count > capacity / 2.
        if passenger.class == PassengerClass::B && 2 * count > self.capacity {
            return Some(RejectReason::LowPriority);
        }
        None
    }

    /// Board `passenger` if the gate allows it, otherwise give it back.
    pub fn admit(&mut self, passenger: Passenger) -> Result<(), Rejection> {
        match self.check_admission(&passenger) {
            Some(reason) => Err(Rejection { passenger, reason }),
            None => {
                self.onboard.push(passenger);
                Ok(())
            }
        }
    }

    /// Remove every passenger whose destination is the current station.
    pub fn disembark(&mut self) -> Vec<Passenger> {
        let position = self.position;
        let (arrived, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.onboard)
            .into_iter()
            .partition(|p| p.destination == position);
        self.onboard = staying;
        arrived
    }
}
