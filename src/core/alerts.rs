use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::alert::AlertEvent;

/// Append-only SOS/panic log. Events are never updated or deleted; the
/// dispatch core exposes no query surface over them.
pub struct SafetyAlertLog {
    events: DashMap<Uuid, AlertEvent>,
}

impl SafetyAlertLog {
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
        }
    }

    pub fn record(&self, user_id: Uuid, location: String, message: String) -> AlertEvent {
        let event = AlertEvent {
            id: Uuid::new_v4(),
            user_id,
            location,
            message,
            created_at: Utc::now(),
        };

        self.events.insert(event.id, event.clone());
        event
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::SafetyAlertLog;

    #[test]
    fn record_appends_distinct_events() {
        let log = SafetyAlertLog::new();
        let user = Uuid::from_u128(1);

        let first = log.record(user, "Calle 26".to_string(), "help".to_string());
        let second = log.record(user, "Calle 26".to_string(), "help".to_string());

        assert_ne!(first.id, second.id);
        assert_eq!(log.len(), 2);
    }
}
