use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::alert::AlertEvent;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/alerts", post(record_alert))
}

#[derive(Deserialize)]
pub struct RecordAlertBody {
    pub user_id: Uuid,
    pub location: String,
    pub message: String,
}

async fn record_alert(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordAlertBody>,
) -> Result<Json<AlertEvent>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let event = state
        .alerts
        .record(payload.user_id, payload.location, payload.message);
    state.metrics.alerts_total.inc();

    warn!(alert_id = %event.id, user_id = %event.user_id, "sos alert recorded");
    Ok(Json(event))
}
