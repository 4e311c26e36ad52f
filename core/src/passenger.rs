//! Passenger travel requests.
//!
//! A passenger is created once at load time and never mutated. Ownership
//! moves Station -> Train -> finished list; no two holders at once.

use crate::types::{PassengerId, StationId, Tick, TrainId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two priority tiers. Class A is offered a seat first and is never
/// subject to the half-full rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PassengerClass {
    A,
    B,
}

impl PassengerClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassengerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            other => Err(format!("unknown passenger class '{other}', expected A or B")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub id:          PassengerId,
    pub class:       PassengerClass,
    pub ready_time:  Tick,
    pub destination: StationId,
    pub origin:      StationId,
}

impl Passenger {
    pub fn new(
        id: PassengerId,
        class: PassengerClass,
        ready_time: Tick,
        destination: StationId,
        origin: StationId,
    ) -> Self {
        Self { id, class, ready_time, destination, origin }
    }

    /// Stations between `position` and this passenger's destination.
    pub fn distance_from(&self, position: StationId) -> u32 {
        self.destination.abs_diff(position)
    }
}

/// A delivered passenger, in disembarkation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedTrip {
    pub passenger: Passenger,
    pub train_id:  TrainId,
    pub time:      Tick,
}
