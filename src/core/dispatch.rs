use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::core::ledger::{AssignOutcome, CancelOutcome, CompleteOutcome};
use crate::error::AppError;
use crate::models::trip::{NewTrip, Trip, TripEvent};
use crate::state::AppState;

/// Record a rider's trip request. No matching happens here: drivers pull
/// pending trips and race to accept, the system never pushes a driver.
pub fn request_trip(state: &AppState, new_trip: NewTrip) -> Trip {
    let trip = state.ledger.create(new_trip);

    state.metrics.trips_created_total.inc();
    state.metrics.trips_pending.inc();
    let _ = state.trip_events_tx.send(TripEvent::Requested(trip.clone()));

    info!(trip_id = %trip.id, rider_id = %trip.rider_id, "trip requested");
    trip
}

/// A driver's attempt to claim a trip. At most one caller per trip ever
/// gets `Ok`; a `Conflict` means the trip is gone, not a transient error.
pub fn accept(state: &AppState, trip_id: Uuid, driver_id: Uuid) -> Result<Trip, AppError> {
    let start = Instant::now();
    let outcome = state.ledger.try_assign(trip_id, driver_id);
    let elapsed = start.elapsed().as_secs_f64();

    match outcome {
        AssignOutcome::Assigned(trip) => {
            state.metrics.observe_accept("won", elapsed);
            state.metrics.trips_pending.dec();
            let _ = state.trip_events_tx.send(TripEvent::Accepted(trip.clone()));

            info!(trip_id = %trip.id, driver_id = %driver_id, "trip accepted");
            Ok(trip)
        }
        AssignOutcome::AlreadyTaken => {
            state.metrics.observe_accept("conflict", elapsed);
            Err(AppError::Conflict(format!(
                "trip {trip_id} is no longer available"
            )))
        }
        AssignOutcome::NotFound => {
            state.metrics.observe_accept("not_found", elapsed);
            Err(AppError::NotFound(format!("trip {trip_id} not found")))
        }
    }
}

pub fn cancel(state: &AppState, trip_id: Uuid) -> Result<Trip, AppError> {
    match state.ledger.try_cancel(trip_id) {
        CancelOutcome::Cancelled(trip) => {
            state.metrics.trips_pending.dec();
            let _ = state.trip_events_tx.send(TripEvent::Cancelled(trip.clone()));

            info!(trip_id = %trip.id, "trip cancelled");
            Ok(trip)
        }
        CancelOutcome::NotCancellable(trip_state) => Err(AppError::Conflict(format!(
            "trip {trip_id} cannot be cancelled from state {trip_state:?}"
        ))),
        CancelOutcome::NotFound => Err(AppError::NotFound(format!("trip {trip_id} not found"))),
    }
}

pub fn complete(state: &AppState, trip_id: Uuid, driver_id: Uuid) -> Result<Trip, AppError> {
    match state.ledger.try_complete(trip_id, driver_id) {
        CompleteOutcome::Completed(trip) => {
            let _ = state.trip_events_tx.send(TripEvent::Completed(trip.clone()));

            info!(trip_id = %trip.id, driver_id = %driver_id, "trip completed");
            Ok(trip)
        }
        CompleteOutcome::NotCompletable => Err(AppError::Conflict(format!(
            "trip {trip_id} is not in progress for driver {driver_id}"
        ))),
        CompleteOutcome::NotFound => Err(AppError::NotFound(format!("trip {trip_id} not found"))),
    }
}
