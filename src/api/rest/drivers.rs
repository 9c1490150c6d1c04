use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::{DriverLocation, GeoPoint, NearbyDriver};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers/nearby", get(nearby))
        .route("/drivers/:id/location", patch(update_location))
        .route("/drivers/:id/active", patch(set_active))
}

#[derive(Deserialize)]
pub struct UpdateLocationBody {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationBody>,
) -> Result<Json<DriverLocation>, AppError> {
    let position = GeoPoint {
        lat: payload.lat,
        lng: payload.lng,
    };
    if !position.is_valid() {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: ({}, {})",
            payload.lat, payload.lng
        )));
    }

    let record = state.drivers.update_location(id, position);
    state
        .metrics
        .drivers_active
        .set(state.drivers.active_count() as i64);

    Ok(Json(record))
}

async fn set_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveBody>,
) -> Json<DriverLocation> {
    let record = state.drivers.set_active(id, payload.active);
    state
        .metrics
        .drivers_active
        .set(state.drivers.active_count() as i64);

    Json(record)
}

async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyDriver>>, AppError> {
    let origin = GeoPoint {
        lat: query.lat,
        lng: query.lng,
    };
    if !origin.is_valid() {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: ({}, {})",
            query.lat, query.lng
        )));
    }

    let radius_km = query.radius_km.unwrap_or(state.default_radius_km);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(AppError::BadRequest(
            "radius_km must be a positive number".to_string(),
        ));
    }

    Ok(Json(state.drivers.nearby(origin, radius_km)))
}
