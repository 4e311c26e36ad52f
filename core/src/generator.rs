//! Synthetic scenario generation.
//!
//! Every generated passenger has origin != destination, so every trip
//! is reachable by one of the two spawn directions.

use crate::{
    config::{LineConfig, Scenario},
    error::{SimError, SimResult},
    passenger::{Passenger, PassengerClass},
    rng::SimRng,
    types::{PassengerId, StationId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub line:           LineConfig,
    pub passengers:     usize,
    /// Latest ready time handed out.
    pub max_ready_time: Tick,
    /// Probability a passenger is class B.
    pub class_b_share:  f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            line:           LineConfig::new(8, 1, 3, 6),
            passengers:     40,
            max_ready_time: 20,
            class_b_share:  0.5,
        }
    }
}

pub struct ScenarioGenerator {
    params: GeneratorParams,
    rng:    SimRng,
}

impl ScenarioGenerator {
    pub fn new(params: GeneratorParams, seed: u64) -> SimResult<Self> {
        params.line.validate()?;
        if params.passengers > 0 && params.line.num_stations < 2 {
            return Err(SimError::Configuration {
                field:  "num_stations",
                reason: "must be at least 2 to generate trips".into(),
            });
        }
        if !(0.0..=1.0).contains(&params.class_b_share) {
            return Err(SimError::Configuration {
                field:  "class_b_share",
                reason: format!("{} is not a probability", params.class_b_share),
            });
        }
        Ok(Self { params, rng: SimRng::new(seed) })
    }

    pub fn generate(&mut self) -> Scenario {
        let n = u64::from(self.params.line.num_stations);
        let passengers = (1..=self.params.passengers as PassengerId)
            .map(|id| {
                let origin = self.rng.range_inclusive(1, n);
                // Pick among the other n-1 stations.
                let mut destination = self.rng.range_inclusive(1, n - 1);
                if destination >= origin {
                    destination += 1;
                }
                let class = if self.rng.chance(self.params.class_b_share) {
                    PassengerClass::B
                } else {
                    PassengerClass::A
                };
                let ready_time = self.rng.range_inclusive(0, self.params.max_ready_time);
                Passenger::new(id, class, ready_time, destination as StationId, origin as StationId)
            })
            .collect();
        Scenario { config: self.params.line, passengers }
    }
}
