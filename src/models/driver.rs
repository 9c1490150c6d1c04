use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Latest known state of a driver. One live record per driver,
/// replaced in place on every report; never deleted, only deactivated.
///
/// `position` stays absent when a driver toggles availability before
/// ever reporting a location; such drivers are invisible to proximity
/// search until their first report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverLocation {
    pub driver_id: Uuid,
    pub position: Option<GeoPoint>,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// One row of a proximity-search result.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyDriver {
    pub driver_id: Uuid,
    pub position: GeoPoint,
    pub distance_km: f64,
}
