//! Shared primitive types used across the entire simulation.

/// A point on the simulation time axis. Trains act on multiples of
/// the line's travel time.
pub type Tick = u64;

/// A station index on the line, 1..=num_stations.
pub type StationId = u32;

/// Assigned at load time, in input order, starting at 1.
pub type PassengerId = u64;

/// Assigned at spawn, in creation order, starting at 1.
pub type TrainId = u64;

/// The canonical run identifier used by the event log.
pub type RunId = String;
