use tokio::sync::broadcast;

use crate::core::alerts::SafetyAlertLog;
use crate::core::drivers::DriverLocationIndex;
use crate::core::ledger::TripLedger;
use crate::models::trip::TripEvent;
use crate::observability::metrics::Metrics;

/// Shared handle built once at startup and passed to every component by
/// `Arc`. There is no ambient global; each store is owned here.
pub struct AppState {
    pub ledger: TripLedger,
    pub drivers: DriverLocationIndex,
    pub alerts: SafetyAlertLog,
    pub trip_events_tx: broadcast::Sender<TripEvent>,
    pub default_radius_km: f64,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, default_radius_km: f64) -> Self {
        let (trip_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            ledger: TripLedger::new(),
            drivers: DriverLocationIndex::new(),
            alerts: SafetyAlertLog::new(),
            trip_events_tx,
            default_radius_km,
            metrics: Metrics::new(),
        }
    }
}
