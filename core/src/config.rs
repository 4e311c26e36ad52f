//! Line configuration and scenario loading.
//!
//! Scenario text format:
//!   line 1:   <num_stations> <travel_time> <train_frequency> <train_capacity>
//!   line 2..: <class A|B> <ready_time> <destination> <origin>
//! Blank lines are skipped. Passenger ids follow line order from 1.

use crate::{
    error::{SimError, SimResult},
    passenger::{Passenger, PassengerClass},
    types::{PassengerId, StationId, Tick},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    pub num_stations:    StationId,
    pub travel_time:     Tick,
    pub train_frequency: Tick,
    pub train_capacity:  usize,
}

impl LineConfig {
    pub fn new(
        num_stations: StationId,
        travel_time: Tick,
        train_frequency: Tick,
        train_capacity: usize,
    ) -> Self {
        Self { num_stations, travel_time, train_frequency, train_capacity }
    }

    pub fn validate(&self) -> SimResult<()> {
        let positive = |field: &'static str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(SimError::Configuration { field, reason: "must be positive".into() })
            }
        };
        if self.num_stations < 1 {
            return Err(SimError::Configuration {
                field:  "num_stations",
                reason: "must be at least 1".into(),
            });
        }
        positive("travel_time", self.travel_time > 0)?;
        positive("train_frequency", self.train_frequency > 0)?;
        positive("train_capacity", self.train_capacity > 0)?;
        Ok(())
    }

    /// Reject any passenger that names a station off the line, or reuses an id.
    pub fn check_roster(&self, passengers: &[Passenger]) -> SimResult<()> {
        let mut seen: HashSet<PassengerId> = HashSet::with_capacity(passengers.len());
        for p in passengers {
            for (field, station) in [("origin", p.origin), ("destination", p.destination)] {
                if !(1..=self.num_stations).contains(&station) {
                    return Err(SimError::OutOfRangeReference {
                        passenger_id: p.id,
                        field,
                        station,
                        num_stations: self.num_stations,
                    });
                }
            }
            if !seen.insert(p.id) {
                return Err(SimError::DuplicatePassenger { passenger_id: p.id });
            }
        }
        Ok(())
    }
}

/// A line configuration plus its passenger roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub config:     LineConfig,
    pub passengers: Vec<Passenger>,
}

impl Scenario {
    /// Load from a scenario file on disk. Read and parse failures come
    /// back as `SimError::Other`, with the path in the message.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let scenario = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(scenario)
    }

    /// Parse the scenario text format. Validates the header and every
    /// passenger's station references.
    pub fn parse(input: &str) -> SimResult<Self> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or(SimError::Parse {
            line:   1,
            reason: "missing header line".into(),
        })?;
        let fields = split_fields::<4>(header_line, header)?;
        let config = LineConfig {
            num_stations:    parse_field(header_line, "num_stations", fields[0])?,
            travel_time:     parse_field(header_line, "travel_time", fields[1])?,
            train_frequency: parse_field(header_line, "train_frequency", fields[2])?,
            train_capacity:  parse_field(header_line, "train_capacity", fields[3])?,
        };
        config.validate()?;

        let mut passengers = Vec::new();
        for (line, text) in lines {
            let fields = split_fields::<4>(line, text)?;
            let id = passengers.len() as PassengerId + 1;
            let class: PassengerClass = parse_field(line, "class", fields[0])?;
            passengers.push(Passenger::new(
                id,
                class,
                parse_field(line, "ready_time", fields[1])?,
                parse_field(line, "destination", fields[2])?,
                parse_field(line, "origin", fields[3])?,
            ));
        }
        config.check_roster(&passengers)?;

        Ok(Self { config, passengers })
    }

    /// Inverse of parse(). Ids are implied by line order.
    pub fn to_text(&self) -> String {
        let c = &self.config;
        let mut out = format!(
            "{} {} {} {}\n",
            c.num_stations, c.travel_time, c.train_frequency, c.train_capacity
        );
        for p in &self.passengers {
            out.push_str(&format!("{} {} {} {}\n", p.class, p.ready_time, p.destination, p.origin));
        }
        out
    }
}

fn split_fields<const N: usize>(line: usize, text: &str) -> SimResult<[&str; N]> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts.try_into().map_err(|parts: Vec<&str>| SimError::Parse {
        line,
        reason: format!("expected {N} fields, found {}", parts.len()),
    })
}

fn parse_field<T>(line: usize, name: &str, raw: &str) -> SimResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| SimError::Parse {
        line,
        reason: format!("{name} '{raw}': {e}"),
    })
}
