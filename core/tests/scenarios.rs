//! End-to-end runs on small hand-built lines.

use railsim_core::{
    config::LineConfig,
    engine::{RunOutcome, SimEngine, SimState},
    event::SimEvent,
    passenger::{Passenger, PassengerClass},
    train::{Direction, RejectReason},
};

fn engine(config: LineConfig, passengers: Vec<Passenger>) -> SimEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    SimEngine::new(config, passengers).expect("valid scenario")
}

fn a(id: u64, ready_time: u64, origin: u32, destination: u32) -> Passenger {
    Passenger::new(id, PassengerClass::A, ready_time, destination, origin)
}

fn b(id: u64, ready_time: u64, origin: u32, destination: u32) -> Passenger {
    Passenger::new(id, PassengerClass::B, ready_time, destination, origin)
}

#[test]
fn single_passenger_boards_first_forward_train() {
    let mut engine = engine(LineConfig::new(3, 1, 2, 2), vec![a(1, 0, 1, 3)]);

    let outcome = engine.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Completed { finish_time: 2 });
    assert_eq!(engine.finish_time(), Some(2));
    assert_eq!(engine.state(), SimState::Done);

    assert!(engine.trace().contains(&SimEvent::Boarded {
        time: 0, train_id: 1, passenger_id: 1, station: 1,
    }));
    let trip = &engine.finished()[0];
    assert_eq!((trip.train_id, trip.time), (1, 2));
}

#[test]
fn capacity_one_defers_second_rider_to_next_spawn() {
    let mut engine = engine(
        LineConfig::new(3, 1, 2, 1),
        vec![a(1, 0, 1, 3), a(2, 0, 1, 3)],
    );

    let first_pass = engine.tick().unwrap();
    assert!(first_pass.contains(&SimEvent::Boarded {
        time: 0, train_id: 1, passenger_id: 1, station: 1,
    }));
    assert!(first_pass.contains(&SimEvent::BoardRejected {
        time: 0, train_id: 1, passenger_id: 2, station: 1, reason: RejectReason::Full,
    }));

    let outcome = engine.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Completed { finish_time: 4 });

    let trips: Vec<_> = engine
        .finished()
        .iter()
        .map(|t| (t.passenger.id, t.train_id, t.time))
        .collect();
    assert_eq!(trips, vec![(1, 1, 2), (2, 3, 4)],
        "second passenger should ride the second forward train");
}

#[test]
fn class_b_waits_while_class_a_takes_last_seat() {
    // Train 1 carries passenger 1 into station 2 half full; A and B wait there.
    let mut engine = engine(
        LineConfig::new(3, 1, 10, 2),
        vec![a(1, 0, 1, 3), b(2, 0, 2, 3), a(3, 0, 2, 3)],
    );

    engine.tick().unwrap();
    let at_station_two = engine.tick().unwrap();
    assert!(at_station_two.contains(&SimEvent::Boarded {
        time: 1, train_id: 1, passenger_id: 3, station: 2,
    }));
    assert!(at_station_two.contains(&SimEvent::BoardRejected {
        time: 1, train_id: 1, passenger_id: 2, station: 2, reason: RejectReason::Full,
    }));

    let outcome = engine.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Completed { finish_time: 12 });
    let last = engine.finished().last().unwrap();
    assert_eq!((last.passenger.id, last.train_id), (2, 3));
}

#[test]
fn passenger_not_ready_waits_for_a_later_train() {
    let mut engine = engine(LineConfig::new(3, 1, 2, 2), vec![a(1, 1, 1, 3)]);

    let first = engine.tick().unwrap();
    assert!(
        !first.iter().any(|e| matches!(e, SimEvent::BoardAttempted { passenger_id: 1, .. })),
        "passenger 1 is not ready at t=0 and must not be offered a seat"
    );
    assert_eq!(engine.stations()[0].waiting_count(), 1);

    assert_eq!(engine.run(100).unwrap(), RunOutcome::Completed { finish_time: 4 });
    assert_eq!(engine.finished()[0].train_id, 3);
}

#[test]
fn backward_trip_rides_the_backward_train() {
    let mut engine = engine(LineConfig::new(4, 1, 5, 3), vec![b(1, 0, 4, 1)]);

    assert_eq!(engine.run(100).unwrap(), RunOutcome::Completed { finish_time: 3 });
    assert_eq!(engine.finished()[0].train_id, 2);
}

#[test]
fn spawns_a_pair_every_frequency() {
    let mut engine = engine(LineConfig::new(5, 1, 3, 2), vec![a(1, 50, 1, 5)]);
    for _ in 0..7 {
        engine.tick().unwrap();
    }
    // Spawns at t=0, 3, 6.
    let spawned: Vec<_> = engine
        .trace()
        .iter()
        .filter_map(|e| match e {
            SimEvent::TrainSpawned { time, train_id, station, direction } => {
                Some((*time, *train_id, *station, *direction))
            }
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![
        (0, 1, 1, Direction::Forward), (0, 2, 5, Direction::Backward),
        (3, 3, 1, Direction::Forward), (3, 4, 5, Direction::Backward),
        (6, 5, 1, Direction::Forward), (6, 6, 5, Direction::Backward),
    ]);
}

#[test]
fn spawning_follows_time_steps_of_travel_time() {
    // Time advances 0, 2, 4, 6...; only multiples of 3 among them spawn.
    let mut engine = engine(LineConfig::new(3, 2, 3, 2), vec![a(1, 0, 1, 3)]);
    let outcome = engine.run(100).unwrap();

    assert_eq!(outcome, RunOutcome::Completed { finish_time: 4 });
    assert_eq!(engine.trains().len(), 2, "next spawn would be at t=6");
}

#[test]
fn trains_hold_at_line_ends() {
    let mut engine = engine(LineConfig::new(3, 1, 100, 2), vec![a(1, 20, 1, 3)]);
    for _ in 0..10 {
        engine.tick().unwrap();
    }
    let positions: Vec<_> = engine.trains().iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![3, 1]);
}

#[test]
fn empty_roster_is_done_at_time_zero() {
    let mut engine = engine(LineConfig::new(3, 1, 2, 2), vec![]);
    assert_eq!(engine.state(), SimState::Done);
    assert_eq!(engine.run(10).unwrap(), RunOutcome::Completed { finish_time: 0 });
    assert!(engine.tick().unwrap().is_empty());
    assert!(engine.trains().is_empty());
}

#[test]
fn unreachable_trip_reports_non_convergence() {
    // Origin == destination mid-line: the forward train boards and carries it away.
    let mut engine = engine(LineConfig::new(3, 1, 2, 2), vec![a(1, 0, 2, 2)]);

    let outcome = engine.run(50).unwrap();
    assert_eq!(outcome, RunOutcome::DidNotConverge { time: 50, ticks: 50 });
    assert_eq!((engine.time(), engine.ticks()), (50, 50));
    assert_eq!(outcome.finish_time(), None);
    assert_eq!(engine.state(), SimState::Running);
    assert!(engine.snapshot().is_conserved());
    assert!(matches!(
        engine.trace().last(),
        Some(SimEvent::RunDidNotConverge { remaining: 1, .. })
    ));
}

#[test]
fn single_station_line_boards_and_delivers_in_place() {
    let mut engine = engine(LineConfig::new(1, 1, 1, 1), vec![a(1, 0, 1, 1)]);
    assert_eq!(engine.run(10).unwrap(), RunOutcome::Completed { finish_time: 1 });
}

#[test]
fn clock_overflow_ends_the_run_without_converging() {
    // The second step would take time past u64::MAX.
    let huge = u64::MAX / 2 + 1;
    let mut engine = engine(LineConfig::new(3, huge, 1, 1), vec![a(1, 0, 1, 3)]);

    let outcome = engine.run(10).unwrap();
    assert_eq!(outcome, RunOutcome::DidNotConverge { time: huge, ticks: 1 });
    assert_eq!(engine.state(), SimState::Running);
    assert!(engine.snapshot().is_conserved());

    assert!(engine.tick().unwrap().is_empty(), "an exhausted clock does not step again");
    assert_eq!(engine.time(), huge);
}
