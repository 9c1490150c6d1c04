use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::dispatch;
use crate::error::AppError;
use crate::models::driver::GeoPoint;
use crate::models::trip::{NewTrip, Trip};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trips", post(request_trip))
        .route("/trips/pending", get(list_pending))
        .route("/trips/:id", get(get_trip))
        .route("/trips/:id/accept", post(accept_trip))
        .route("/trips/:id/cancel", post(cancel_trip))
        .route("/trips/:id/complete", post(complete_trip))
}

#[derive(Deserialize)]
pub struct RequestTripBody {
    pub rider_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub fare: f64,
    pub origin_point: Option<GeoPoint>,
    pub destination_point: Option<GeoPoint>,
}

#[derive(Deserialize)]
pub struct DriverBody {
    pub driver_id: Uuid,
}

async fn request_trip(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RequestTripBody>,
) -> Result<Json<Trip>, AppError> {
    if payload.origin.trim().is_empty() {
        return Err(AppError::BadRequest("origin cannot be empty".to_string()));
    }
    if payload.destination.trim().is_empty() {
        return Err(AppError::BadRequest(
            "destination cannot be empty".to_string(),
        ));
    }
    if !payload.fare.is_finite() || payload.fare < 0.0 {
        return Err(AppError::BadRequest(
            "fare must be a non-negative number".to_string(),
        ));
    }
    for point in [&payload.origin_point, &payload.destination_point]
        .into_iter()
        .flatten()
    {
        if !point.is_valid() {
            return Err(AppError::BadRequest(format!(
                "coordinates out of range: ({}, {})",
                point.lat, point.lng
            )));
        }
    }

    let trip = dispatch::request_trip(
        &state,
        NewTrip {
            rider_id: payload.rider_id,
            origin: payload.origin,
            destination: payload.destination,
            fare: payload.fare,
            origin_point: payload.origin_point,
            destination_point: payload.destination_point,
        },
    );

    Ok(Json(trip))
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .ledger
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("trip {id} not found")))?;

    Ok(Json(trip))
}

async fn list_pending(State(state): State<Arc<AppState>>) -> Json<Vec<Trip>> {
    Json(state.ledger.list_pending())
}

async fn accept_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DriverBody>,
) -> Result<Json<Trip>, AppError> {
    let trip = dispatch::accept(&state, id, payload.driver_id)?;
    Ok(Json(trip))
}

async fn cancel_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = dispatch::cancel(&state, id)?;
    Ok(Json(trip))
}

async fn complete_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DriverBody>,
) -> Result<Json<Trip>, AppError> {
    let trip = dispatch::complete(&state, id, payload.driver_id)?;
    Ok(Json(trip))
}
