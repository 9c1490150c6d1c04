use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::geo::haversine_km;
use crate::models::driver::{DriverLocation, GeoPoint, NearbyDriver};

/// Materialized view of each driver's last reported position and
/// availability. Last write wins; records for different drivers are
/// independent, so there is no cross-driver coordination here.
pub struct DriverLocationIndex {
    records: DashMap<Uuid, DriverLocation>,
}

impl DriverLocationIndex {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Upsert a driver's position and timestamp. Availability is left
    /// alone; a first report creates the record as active.
    pub fn update_location(&self, driver_id: Uuid, position: GeoPoint) -> DriverLocation {
        let mut record = self
            .records
            .entry(driver_id)
            .or_insert_with(|| DriverLocation {
                driver_id,
                position: None,
                active: true,
                updated_at: Utc::now(),
            });

        record.position = Some(position);
        record.updated_at = Utc::now();
        record.clone()
    }

    /// Upsert only the availability flag. A record created this way has no
    /// position yet and stays invisible to `nearby`.
    pub fn set_active(&self, driver_id: Uuid, active: bool) -> DriverLocation {
        let mut record = self
            .records
            .entry(driver_id)
            .or_insert_with(|| DriverLocation {
                driver_id,
                position: None,
                active,
                updated_at: Utc::now(),
            });

        record.active = active;
        record.updated_at = Utc::now();
        record.clone()
    }

    /// Active drivers within `radius_km` of `origin`, nearest first.
    /// Drivers without a location record are excluded, not treated as
    /// distance zero.
    pub fn nearby(&self, origin: GeoPoint, radius_km: f64) -> Vec<NearbyDriver> {
        let mut hits: Vec<NearbyDriver> = self
            .records
            .iter()
            .filter_map(|entry| {
                let record = entry.value();
                if !record.active {
                    return None;
                }
                let position = record.position?;
                let distance_km = haversine_km(origin, position);
                (distance_km <= radius_km).then_some(NearbyDriver {
                    driver_id: record.driver_id,
                    position,
                    distance_km,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        hits
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.value().active)
            .count()
    }
}
