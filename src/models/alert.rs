use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A panic/SOS event. Immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
