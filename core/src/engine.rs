//! The simulation engine.
//!
//! EXECUTION ORDER per tick (fixed, documented, never reordered):
//!   1. Spawn check: a forward/backward train pair every `train_frequency`.
//!   2. If time is a multiple of `travel_time`, for each train in
//!      ascending id order:
//!        a. set the train clock to the current time
//!        b. disembark arrivals (the run ends the instant the last one lands)
//!        c. offer boarding at the train's current station
//!   3. Move every train one station.
//!   4. Advance time by `travel_time`.
//!
//! RULES:
//!   - The engine owns every passenger, train and station exclusively.
//!   - Passengers move by value: station -> train -> finished.
//!   - The engine never prints; everything observable is a SimEvent.

use crate::{
    clock::SimClock,
    config::LineConfig,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    passenger::{FinishedTrip, Passenger},
    snapshot::{SimSnapshot, TrainView},
    station::Station,
    store::SimStore,
    train::{Direction, Train},
    types::{RunId, StationId, Tick, TrainId},
};
use serde::{Deserialize, Serialize};

/// Tick cap used by the runner when none is given.
pub const DEFAULT_MAX_TICKS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    Running,
    Done,
}

/// How a call to run() ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { finish_time: Tick },
    /// The tick cap was reached, or the clock ran out of range, with
    /// passengers still travelling.
    DidNotConverge { time: Tick, ticks: u64 },
}

impl RunOutcome {
    pub fn finish_time(&self) -> Option<Tick> {
        match self {
            Self::Completed { finish_time } => Some(*finish_time),
            Self::DidNotConverge { .. }     => None,
        }
    }
}

pub struct SimEngine {
    config:          LineConfig,
    clock:           SimClock,
    /// Set once the clock can no longer advance.
    exhausted:       bool,
    trains:          Vec<Train>,
    stations:        Vec<Station>,
    roster:          usize,
    finished:        Vec<FinishedTrip>,
    next_train_id:   TrainId,
    last_spawn_time: Option<Tick>,
    finish_time:     Option<Tick>,
    trace:           Vec<SimEvent>,
    sink:            Option<(SimStore, RunId)>,
}

impl SimEngine {
    /// Validate the configuration and roster, then seat every passenger
    /// in the waiting queue of its origin station.
    pub fn new(config: LineConfig, passengers: Vec<Passenger>) -> SimResult<Self> {
        config.validate()?;
        config.check_roster(&passengers)?;

        let mut stations: Vec<Station> = (1..=config.num_stations).map(Station::new).collect();
        let roster = passengers.len();
        for passenger in passengers {
            stations[station_index(passenger.origin)].enqueue(passenger);
        }

        let mut engine = Self {
            clock: SimClock::new(config.travel_time),
            config,
            trains: Vec::new(),
            stations,
            roster,
            finished: Vec::with_capacity(roster),
            next_train_id: 1,
            last_spawn_time: None,
            finish_time: None,
            trace: Vec::new(),
            sink: None,
            exhausted: false,
        };
        engine.trace.push(SimEvent::RunInitialized {
            num_stations: config.num_stations,
            passengers:   roster,
        });
        if roster == 0 {
            engine.finish_time = Some(0);
            engine.trace.push(SimEvent::RunCompleted { time: 0 });
        }
        log::debug!(
            "engine ready: {} stations, {roster} passengers, travel_time={} frequency={} capacity={}",
            config.num_stations,
            config.travel_time,
            config.train_frequency,
            config.train_capacity
        );
        Ok(engine)
    }

    /// Persist every event, including those already emitted, to `store`.
    pub fn with_store(mut self, store: SimStore, run_id: RunId) -> SimResult<Self> {
        for event in &self.trace {
            store.append_event(&EventLogEntry::from_event(&run_id, self.clock.time, event)?)?;
        }
        self.sink = Some((store, run_id));
        Ok(self)
    }

    /// Give back the attached store, if any.
    pub fn into_store(self) -> Option<SimStore> {
        self.sink.map(|(store, _)| store)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn config(&self) -> &LineConfig { &self.config }
    pub fn time(&self) -> Tick { self.clock.time }
    pub fn ticks(&self) -> u64 { self.clock.ticks }
    pub fn trains(&self) -> &[Train] { &self.trains }
    pub fn stations(&self) -> &[Station] { &self.stations }
    pub fn finished(&self) -> &[FinishedTrip] { &self.finished }
    pub fn roster_size(&self) -> usize { self.roster }
    pub fn finish_time(&self) -> Option<Tick> { self.finish_time }
    pub fn trace(&self) -> &[SimEvent] { &self.trace }

    pub fn state(&self) -> SimState {
        if self.finished.len() == self.roster {
            SimState::Done
        } else {
            SimState::Running
        }
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            time:     self.clock.time,
            roster:   self.roster,
            finished: self.finished.len(),
            trains:   self
                .trains
                .iter()
                .map(|t| TrainView {
                    id:        t.id,
                    position:  t.position,
                    direction: t.direction,
                    onboard:   t.onboard_count(),
                })
                .collect(),
            waiting:  self.stations.iter().map(Station::waiting_count).collect(),
        }
    }

    // ── Stepping ───────────────────────────────────────────────

    /// Advance one tick. A no-op once the run is done or the clock
    /// has run out of range.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        if self.state() == SimState::Done || self.exhausted {
            return Ok(Vec::new());
        }

        let time = self.clock.time;
        let mut events = Vec::new();
        self.spawn_trains(time, &mut events);

        if self.clock.is_active() {
            events.push(SimEvent::TickStarted { time });
            if let Some(finish_time) = self.step_trains(time, &mut events) {
                log::info!("all {} passengers delivered at t={finish_time}", self.roster);
                self.finish_time = Some(finish_time);
                events.push(SimEvent::RunCompleted { time: finish_time });
                self.record(time, &events)?;
                return Ok(events);
            }
            let num_stations = self.config.num_stations;
            for train in &mut self.trains {
                train.move_along(num_stations);
            }
        }

        if self.clock.advance().is_none() {
            log::warn!("t={time}: next step of {} overflows the clock", self.clock.step);
            self.exhausted = true;
        }
        self.record(time, &events)?;
        Ok(events)
    }

    /// Tick until every passenger is delivered, `max_ticks` ticks pass,
    /// or the clock cannot advance any further.
    pub fn run(&mut self, max_ticks: u64) -> SimResult<RunOutcome> {
        let mut ticks = 0;
        while self.state() == SimState::Running {
            if ticks == max_ticks || self.exhausted {
                let remaining = self.roster - self.finished.len();
                log::warn!(
                    "no convergence after {ticks} ticks (t={}), {remaining} passengers undelivered",
                    self.clock.time
                );
                let event = SimEvent::RunDidNotConverge {
                    time: self.clock.time,
                    ticks: self.clock.ticks,
                    remaining,
                };
                self.record(self.clock.time, std::slice::from_ref(&event))?;
                return Ok(RunOutcome::DidNotConverge {
                    time:  self.clock.time,
                    ticks: self.clock.ticks,
                });
            }
            self.tick()?;
            ticks += 1;
        }
        Ok(RunOutcome::Completed {
            finish_time: self.finish_time.unwrap_or(self.clock.time),
        })
    }

    fn spawn_trains(&mut self, time: Tick, events: &mut Vec<SimEvent>) {
        let frequency = self.config.train_frequency;
        if !time.is_multiple_of(frequency) {
            return;
        }
        if let Some(last) = self.last_spawn_time {
            if time - last < frequency {
                return;
            }
        }

        let ends = [
            (1, Direction::Forward),
            (self.config.num_stations, Direction::Backward),
        ];
        for (station, direction) in ends {
            let id = self.next_train_id;
            self.next_train_id += 1;
            self.trains.push(Train::new(id, station, direction, self.config.train_capacity, time));
            events.push(SimEvent::TrainSpawned { time, train_id: id, station, direction });
        }
        self.last_spawn_time = Some(time);
        log::debug!("t={time} spawned trains {} and {}", self.next_train_id - 2, self.next_train_id - 1);
    }

    /// Disembark and board for every train. Returns the finishing time
    /// if the last passenger landed during this pass.
    fn step_trains(&mut self, time: Tick, events: &mut Vec<SimEvent>) -> Option<Tick> {
        for train in &mut self.trains {
            train.set_clock(time);

            for passenger in train.disembark() {
                events.push(SimEvent::Disembarked {
                    time:         train.clock,
                    train_id:     train.id,
                    passenger_id: passenger.id,
                    station:      train.position,
                });
                self.finished.push(FinishedTrip {
                    passenger,
                    train_id: train.id,
                    time:     train.clock,
                });
                if self.finished.len() == self.roster {
                    return Some(train.clock);
                }
            }

            let station = &mut self.stations[station_index(train.position)];
            events.extend(station.offer_boarding(train));
        }
        log::trace!("t={time} stepped {} trains", self.trains.len());
        None
    }

    fn record(&mut self, tick: Tick, events: &[SimEvent]) -> SimResult<()> {
        if let Some((store, run_id)) = &self.sink {
            for event in events {
                store.append_event(&EventLogEntry::from_event(run_id, tick, event)?)?;
            }
        }
        self.trace.extend_from_slice(events);
        Ok(())
    }
}

fn station_index(station: StationId) -> usize {
    (station - 1) as usize
}
