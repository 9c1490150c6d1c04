use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TripState {
    Pending,
    Accepted,
    Cancelled,
    Completed,
}

/// A rider's transportation request.
///
/// Invariant: `driver_id` is set exactly when `state` is Accepted or
/// Completed, and only the ledger ever mutates `state`/`driver_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub origin: String,
    pub destination: String,
    pub origin_point: Option<GeoPoint>,
    pub destination_point: Option<GeoPoint>,
    pub fare: f64,
    pub state: TripState,
    pub created_at: DateTime<Utc>,
}

/// Fields a rider supplies when requesting a trip.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub rider_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub fare: f64,
    pub origin_point: Option<GeoPoint>,
    pub destination_point: Option<GeoPoint>,
}

/// Lifecycle event published on the broadcast channel and streamed to
/// websocket subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "trip")]
pub enum TripEvent {
    Requested(Trip),
    Accepted(Trip),
    Cancelled(Trip),
    Completed(Trip),
}
