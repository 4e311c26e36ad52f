//! The simulation trace.
//!
//! RULE: The engine never prints. Everything a reporting layer needs
//! is emitted here, in the order it happened.

use crate::{
    passenger::PassengerClass,
    train::{Direction, RejectReason},
    types::{PassengerId, RunId, StationId, Tick, TrainId},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Run lifecycle ──────────────────────────────
    RunInitialized {
        num_stations: StationId,
        passengers:   usize,
    },
    RunCompleted {
        time: Tick,
    },
    RunDidNotConverge {
        time:      Tick,
        ticks:     u64,
        remaining: usize,
    },

    // ── Engine ─────────────────────────────────────
    TickStarted {
        time: Tick,
    },
    TrainSpawned {
        time:      Tick,
        train_id:  TrainId,
        station:   StationId,
        direction: Direction,
    },

    // ── Boarding ───────────────────────────────────
    BoardAttempted {
        time:         Tick,
        train_id:     TrainId,
        passenger_id: PassengerId,
        class:        PassengerClass,
        station:      StationId,
    },
    Boarded {
        time:         Tick,
        train_id:     TrainId,
        passenger_id: PassengerId,
        station:      StationId,
    },
    BoardRejected {
        time:         Tick,
        train_id:     TrainId,
        passenger_id: PassengerId,
        station:      StationId,
        reason:       RejectReason,
    },
    Disembarked {
        time:         Tick,
        train_id:     TrainId,
        passenger_id: PassengerId,
        station:      StationId,
    },
}

impl SimEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }    => "run_initialized",
            Self::RunCompleted { .. }      => "run_completed",
            Self::RunDidNotConverge { .. } => "run_did_not_converge",
            Self::TickStarted { .. }       => "tick_started",
            Self::TrainSpawned { .. }      => "train_spawned",
            Self::BoardAttempted { .. }    => "board_attempted",
            Self::Boarded { .. }           => "boarded",
            Self::BoardRejected { .. }     => "board_rejected",
            Self::Disembarked { .. }       => "disembarked",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub tick: Tick,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}

impl EventLogEntry {
    pub fn from_event(run_id: &str, tick: Tick, event: &SimEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            run_id:     run_id.to_string(),
            tick,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        })
    }
}
