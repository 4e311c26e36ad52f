//! Discrete-time simulation of bidirectional train traffic on a single
//! line of stations.
//!
//! A [`engine::SimEngine`] is built from a [`config::LineConfig`] and a
//! passenger roster, then driven with `tick()` or `run()` until every
//! passenger has reached its destination.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod passenger;
pub mod rng;
pub mod snapshot;
pub mod station;
pub mod store;
pub mod train;
pub mod types;
