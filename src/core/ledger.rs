use std::sync::Mutex;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::trip::{NewTrip, Trip, TripState};

#[derive(Debug)]
pub enum AssignOutcome {
    Assigned(Trip),
    AlreadyTaken,
    NotFound,
}

#[derive(Debug)]
pub enum CancelOutcome {
    Cancelled(Trip),
    NotCancellable(TripState),
    NotFound,
}

#[derive(Debug)]
pub enum CompleteOutcome {
    Completed(Trip),
    NotCompletable,
    NotFound,
}

/// Owner of all trip records. The only component allowed to mutate
/// `state`/`driver_id`, and the serialization point for the accept race:
/// `try_assign` holds the map's exclusive entry reference across its
/// read-check-write, so calls for the same trip id are linearizable while
/// calls for different trips do not contend beyond shard granularity.
pub struct TripLedger {
    trips: DashMap<Uuid, Trip>,
    // Insertion log so list_pending keeps oldest-request-first order;
    // DashMap iteration order is arbitrary.
    created_order: Mutex<Vec<Uuid>>,
}

impl TripLedger {
    pub fn new() -> Self {
        Self {
            trips: DashMap::new(),
            created_order: Mutex::new(Vec::new()),
        }
    }

    pub fn create(&self, new_trip: NewTrip) -> Trip {
        let trip = Trip {
            id: Uuid::new_v4(),
            rider_id: new_trip.rider_id,
            driver_id: None,
            origin: new_trip.origin,
            destination: new_trip.destination,
            origin_point: new_trip.origin_point,
            destination_point: new_trip.destination_point,
            fare: new_trip.fare,
            state: TripState::Pending,
            created_at: Utc::now(),
        };

        self.trips.insert(trip.id, trip.clone());
        self.created_order
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(trip.id);

        trip
    }

    pub fn get(&self, trip_id: Uuid) -> Option<Trip> {
        self.trips.get(&trip_id).map(|entry| entry.clone())
    }

    pub fn list_pending(&self) -> Vec<Trip> {
        let ids: Vec<Uuid> = self
            .created_order
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        ids.into_iter()
            .filter_map(|id| self.trips.get(&id).map(|entry| entry.clone()))
            .filter(|trip| trip.state == TripState::Pending)
            .collect()
    }

    /// Atomically assign a driver to a pending trip. Exactly one caller
    /// observes `Pending -> Accepted`; everyone else gets `AlreadyTaken`
    /// with no mutation, including the winner accepting twice.
    pub fn try_assign(&self, trip_id: Uuid, driver_id: Uuid) -> AssignOutcome {
        let Some(mut trip) = self.trips.get_mut(&trip_id) else {
            return AssignOutcome::NotFound;
        };

        if trip.state != TripState::Pending {
            return AssignOutcome::AlreadyTaken;
        }

        trip.state = TripState::Accepted;
        trip.driver_id = Some(driver_id);
        AssignOutcome::Assigned(trip.clone())
    }

    /// Cancel a trip that no driver has claimed yet. Accepted trips cannot
    /// be cancelled here: that would leave a driver id on a cancelled trip.
    pub fn try_cancel(&self, trip_id: Uuid) -> CancelOutcome {
        let Some(mut trip) = self.trips.get_mut(&trip_id) else {
            return CancelOutcome::NotFound;
        };

        if trip.state != TripState::Pending {
            return CancelOutcome::NotCancellable(trip.state);
        }

        trip.state = TripState::Cancelled;
        CancelOutcome::Cancelled(trip.clone())
    }

    /// Move an accepted trip to Completed. Only the assigned driver may
    /// complete it.
    pub fn try_complete(&self, trip_id: Uuid, driver_id: Uuid) -> CompleteOutcome {
        let Some(mut trip) = self.trips.get_mut(&trip_id) else {
            return CompleteOutcome::NotFound;
        };

        if trip.state != TripState::Accepted || trip.driver_id != Some(driver_id) {
            return CompleteOutcome::NotCompletable;
        }

        trip.state = TripState::Completed;
        CompleteOutcome::Completed(trip.clone())
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use uuid::Uuid;

    use super::{AssignOutcome, CancelOutcome, CompleteOutcome, TripLedger};
    use crate::models::trip::{NewTrip, TripState};

    fn new_trip(rider_seed: u128) -> NewTrip {
        NewTrip {
            rider_id: Uuid::from_u128(rider_seed),
            origin: "Centro".to_string(),
            destination: "Aeropuerto".to_string(),
            fare: 12.5,
            origin_point: None,
            destination_point: None,
        }
    }

    #[test]
    fn create_starts_pending_without_driver() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));

        assert_eq!(trip.state, TripState::Pending);
        assert!(trip.driver_id.is_none());

        let fetched = ledger.get(trip.id).unwrap();
        assert_eq!(fetched.state, TripState::Pending);
    }

    #[test]
    fn get_unknown_trip_is_none() {
        let ledger = TripLedger::new();
        assert!(ledger.get(Uuid::from_u128(99)).is_none());
    }

    #[test]
    fn assign_sets_driver_and_state() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));
        let driver = Uuid::from_u128(7);

        match ledger.try_assign(trip.id, driver) {
            AssignOutcome::Assigned(assigned) => {
                assert_eq!(assigned.state, TripState::Accepted);
                assert_eq!(assigned.driver_id, Some(driver));
            }
            other => panic!("expected Assigned, got {other:?}"),
        }
    }

    #[test]
    fn second_assign_is_rejected_even_for_same_driver() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));
        let driver = Uuid::from_u128(7);

        assert!(matches!(
            ledger.try_assign(trip.id, driver),
            AssignOutcome::Assigned(_)
        ));
        assert!(matches!(
            ledger.try_assign(trip.id, driver),
            AssignOutcome::AlreadyTaken
        ));
        assert!(matches!(
            ledger.try_assign(trip.id, Uuid::from_u128(8)),
            AssignOutcome::AlreadyTaken
        ));

        // loser attempts must not overwrite the winner
        assert_eq!(ledger.get(trip.id).unwrap().driver_id, Some(driver));
    }

    #[test]
    fn assign_unknown_trip_is_not_found() {
        let ledger = TripLedger::new();
        assert!(matches!(
            ledger.try_assign(Uuid::from_u128(1), Uuid::from_u128(2)),
            AssignOutcome::NotFound
        ));
    }

    #[test]
    fn concurrent_assigns_have_exactly_one_winner() {
        let ledger = Arc::new(TripLedger::new());
        let trip = ledger.create(new_trip(1));

        let drivers = 16;
        let barrier = Arc::new(Barrier::new(drivers));

        let handles: Vec<_> = (0..drivers)
            .map(|i| {
                let ledger = ledger.clone();
                let barrier = barrier.clone();
                let driver = Uuid::from_u128(100 + i as u128);
                thread::spawn(move || {
                    barrier.wait();
                    match ledger.try_assign(trip.id, driver) {
                        AssignOutcome::Assigned(_) => Some(driver),
                        AssignOutcome::AlreadyTaken => None,
                        AssignOutcome::NotFound => panic!("trip vanished"),
                    }
                })
            })
            .collect();

        let winners: Vec<Uuid> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(winners.len(), 1);
        let final_trip = ledger.get(trip.id).unwrap();
        assert_eq!(final_trip.state, TripState::Accepted);
        assert_eq!(final_trip.driver_id, Some(winners[0]));
    }

    #[test]
    fn list_pending_keeps_insertion_order_and_skips_taken() {
        let ledger = TripLedger::new();
        let first = ledger.create(new_trip(1));
        let second = ledger.create(new_trip(2));
        let third = ledger.create(new_trip(3));

        ledger.try_assign(second.id, Uuid::from_u128(7));

        let pending: Vec<Uuid> = ledger.list_pending().iter().map(|t| t.id).collect();
        assert_eq!(pending, vec![first.id, third.id]);
    }

    #[test]
    fn cancel_only_from_pending() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));

        assert!(matches!(
            ledger.try_cancel(trip.id),
            CancelOutcome::Cancelled(_)
        ));
        assert_eq!(ledger.get(trip.id).unwrap().state, TripState::Cancelled);

        let taken = ledger.create(new_trip(2));
        ledger.try_assign(taken.id, Uuid::from_u128(7));
        assert!(matches!(
            ledger.try_cancel(taken.id),
            CancelOutcome::NotCancellable(TripState::Accepted)
        ));
    }

    #[test]
    fn complete_requires_the_assigned_driver() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));
        let driver = Uuid::from_u128(7);
        ledger.try_assign(trip.id, driver);

        assert!(matches!(
            ledger.try_complete(trip.id, Uuid::from_u128(8)),
            CompleteOutcome::NotCompletable
        ));
        assert!(matches!(
            ledger.try_complete(trip.id, driver),
            CompleteOutcome::Completed(_)
        ));
        assert_eq!(ledger.get(trip.id).unwrap().state, TripState::Completed);
    }

    #[test]
    fn terminal_trips_never_return_to_pending() {
        let ledger = TripLedger::new();
        let trip = ledger.create(new_trip(1));
        let driver = Uuid::from_u128(7);

        ledger.try_assign(trip.id, driver);
        ledger.try_complete(trip.id, driver);

        assert!(matches!(
            ledger.try_assign(trip.id, Uuid::from_u128(8)),
            AssignOutcome::AlreadyTaken
        ));
        assert!(matches!(
            ledger.try_cancel(trip.id),
            CancelOutcome::NotCancellable(TripState::Completed)
        ));
        assert!(ledger.list_pending().is_empty());
        assert_eq!(ledger.get(trip.id).unwrap().state, TripState::Completed);
    }
}
