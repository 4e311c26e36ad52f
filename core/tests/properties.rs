//! Invariants checked over generated scenarios.
//!
//! Every property is replayed from the event trace, so a violation
//! names the exact event that broke it.

use railsim_core::{
    config::{LineConfig, Scenario},
    engine::{RunOutcome, SimEngine, SimState, DEFAULT_MAX_TICKS},
    event::SimEvent,
    generator::{GeneratorParams, ScenarioGenerator},
    passenger::{Passenger, PassengerClass},
    train::Direction,
};
use std::collections::HashMap;

const SEEDS: [u64; 6] = [1, 7, 42, 99, 2024, 0xDEAD_BEEF];

fn scenario(seed: u64, params: GeneratorParams) -> Scenario {
    ScenarioGenerator::new(params, seed).expect("valid params").generate()
}

fn param_grid() -> Vec<GeneratorParams> {
    vec![
        GeneratorParams::default(),
        GeneratorParams {
            line: LineConfig::new(5, 2, 3, 1),
            passengers: 15,
            max_ready_time: 10,
            class_b_share: 0.3,
        },
        GeneratorParams {
            line: LineConfig::new(12, 1, 4, 5),
            passengers: 80,
            max_ready_time: 40,
            class_b_share: 0.8,
        },
    ]
}

#[test]
fn conservation_holds_at_every_tick_boundary() {
    for params in param_grid() {
        for seed in SEEDS {
            let s = scenario(seed, params.clone());
            let mut engine = SimEngine::new(s.config, s.passengers).unwrap();
            assert!(engine.snapshot().is_conserved());

            let mut ticks = 0;
            while engine.state() == SimState::Running {
                engine.tick().unwrap();
                ticks += 1;
                let snap = engine.snapshot();
                assert!(
                    snap.is_conserved(),
                    "seed {seed} t={}: finished {} + onboard {} + waiting {} != {}",
                    snap.time, snap.finished, snap.onboard_total(), snap.waiting_total(), snap.roster
                );
                assert!(ticks < DEFAULT_MAX_TICKS, "seed {seed} did not converge");
            }
        }
    }
}

#[test]
fn generated_scenarios_terminate_and_deliver_everyone() {
    for params in param_grid() {
        for seed in SEEDS {
            let s = scenario(seed, params.clone());
            let roster: HashMap<u64, Passenger> =
                s.passengers.iter().map(|p| (p.id, p.clone())).collect();
            let mut engine = SimEngine::new(s.config, s.passengers).unwrap();

            let outcome = engine.run(DEFAULT_MAX_TICKS).unwrap();
            assert!(matches!(outcome, RunOutcome::Completed { .. }),
                "seed {seed}: {outcome:?}");
            assert_eq!(engine.finished().len(), roster.len());

            let mut delivered: Vec<_> = engine.finished().iter().map(|t| t.passenger.id).collect();
            delivered.sort_unstable();
            delivered.dedup();
            assert_eq!(delivered.len(), roster.len(), "seed {seed}: a passenger finished twice");

            let last = engine.finished().last().unwrap();
            assert_eq!(outcome.finish_time(), Some(last.time));
        }
    }
}

/// Replays a finished run's trace and checks every boarding decision.
#[test]
fn trace_never_violates_admission_rules() {
    for params in param_grid() {
        let capacity = params.line.train_capacity;
        for seed in SEEDS {
            let s = scenario(seed, params.clone());
            let roster: HashMap<u64, Passenger> =
                s.passengers.iter().map(|p| (p.id, p.clone())).collect();
            let mut engine = SimEngine::new(s.config, s.passengers).unwrap();
            engine.run(DEFAULT_MAX_TICKS).unwrap();

            let mut directions: HashMap<u64, Direction> = HashMap::new();
            let mut onboard: HashMap<u64, usize> = HashMap::new();

            for event in engine.trace() {
                match event {
                    SimEvent::TrainSpawned { train_id, direction, .. } => {
                        directions.insert(*train_id, *direction);
                    }
                    SimEvent::Boarded { time, train_id, passenger_id, station } => {
                        let p = &roster[passenger_id];
                        let count = onboard.entry(*train_id).or_default();

                        assert_eq!(p.origin, *station, "boarded away from origin");
                        assert!(p.ready_time <= *time,
                            "seed {seed}: passenger {passenger_id} boarded at t={time} before ready {}",
                            p.ready_time);
                        match directions[train_id] {
                            Direction::Forward  => assert!(p.destination >= *station),
                            Direction::Backward => assert!(p.destination <= *station),
                        }
                        assert!(*count < capacity, "seed {seed}: train {train_id} over capacity");
                        if p.class == PassengerClass::B {
                            assert!(2 * *count <= capacity,
                                "seed {seed}: class B boarded train {train_id} with {count}/{capacity} aboard");
                        }
                        *count += 1;
                    }
                    SimEvent::Disembarked { train_id, passenger_id, station, .. } => {
                        assert_eq!(roster[passenger_id].destination, *station);
                        *onboard.get_mut(train_id).unwrap() -= 1;
                    }
                    _ => {}
                }
            }
        }
    }
}

#[test]
fn trains_stay_on_the_line() {
    let s = scenario(3, GeneratorParams::default());
    let n = s.config.num_stations;
    let mut engine = SimEngine::new(s.config, s.passengers).unwrap();
    while engine.state() == SimState::Running {
        engine.tick().unwrap();
        assert!(engine.trains().iter().all(|t| (1..=n).contains(&t.position)));
    }
}
