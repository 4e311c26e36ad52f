//! Stations and the boarding policy.
//!
//! Eligible passengers are offered seats longest trip first, class A
//! before class B on equal distance, lowest id after that. Each offer
//! sees the occupancy left by the offers before it.

use crate::{
    event::SimEvent,
    passenger::Passenger,
    train::Train,
    types::StationId,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    waiting: Vec<Passenger>,
}

impl Station {
    pub fn new(id: StationId) -> Self {
        Self { id, waiting: Vec::new() }
    }

    pub fn waiting(&self) -> &[Passenger] {
        &self.waiting
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    pub fn enqueue(&mut self, passenger: Passenger) {
        self.waiting.push(passenger);
    }

    /// Offer every ready passenger a seat on `train`, which must be
    /// standing at this station. Rejected passengers stay waiting.
    pub fn offer_boarding(&mut self, train: &mut Train) -> Vec<SimEvent> {
        debug_assert_eq!(train.position, self.id, "train offered boarding at the wrong station");

        let now = train.clock;
        let (mut ready, not_ready): (Vec<_>, Vec<_>) = std::mem::take(&mut self.waiting)
            .into_iter()
            .partition(|p| p.ready_time <= now);
        self.waiting = not_ready;

        let position = train.position;
        ready.sort_by_key(|p| (Reverse(p.distance_from(position)), p.class, p.id));

        let mut events = Vec::with_capacity(ready.len() * 2);
        for passenger in ready {
            let passenger_id = passenger.id;
            events.push(SimEvent::BoardAttempted {
                time: now,
                train_id: train.id,
                passenger_id,
                class: passenger.class,
                station: self.id,
            });
            match train.admit(passenger) {
                Ok(()) => {
                    log::trace!("t={now} train {} boarded passenger {passenger_id} at {}", train.id, self.id);
                    events.push(SimEvent::Boarded {
                        time: now,
                        train_id: train.id,
                        passenger_id,
                        station: self.id,
                    });
                }
                Err(rejection) => {
                    events.push(SimEvent::BoardRejected {
                        time: now,
                        train_id: train.id,
                        passenger_id,
                        station: self.id,
                        reason: rejection.reason,
                    });
                    self.waiting.push(rejection.passenger);
                }
            }
        }
        // Keep the queue in load order regardless of the offer order.
        self.waiting.sort_by_key(|p| p.id);
        events
    }
}
