//! Reminder settings persisted alongside the journal.

use tracing::warn;

use super::error::Result;
use super::models::{ReminderSettings, TimeOfDay};
use super::storage::Storage;

const ENABLED_KEY: &str = "notificationsEnabled";
const TIME_KEY: &str = "notificationTime";

/// Load reminder settings, writing the defaults on first run
pub fn load_reminder(storage: &Storage) -> ReminderSettings {
    let defaults = ReminderSettings::default();

    let enabled = match storage.get(ENABLED_KEY) {
        Ok(Some(v)) => v == "true",
        Ok(None) => {
            if let Err(e) = save_reminder(storage, defaults) {
                warn!("could not store default reminder settings: {e}");
            }
            return defaults;
        }
        Err(e) => {
            warn!("using default reminder settings: {e}");
            return defaults;
        }
    };

    let time = match storage.get(TIME_KEY) {
        Ok(Some(v)) => v.parse::<TimeOfDay>().unwrap_or_else(|e| {
            warn!("ignoring stored reminder time: {e}");
            defaults.time
        }),
        _ => defaults.time,
    };

    ReminderSettings { enabled, time }
}

pub fn save_reminder(storage: &Storage, settings: ReminderSettings) -> Result<()> {
    storage.set(ENABLED_KEY, if settings.enabled { "true" } else { "false" })?;
    storage.set(TIME_KEY, &settings.time.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_writes_defaults() {
        let storage = Storage::open_in_memory().unwrap();
        let settings = load_reminder(&storage);
        assert_eq!(settings, ReminderSettings::default());
        assert_eq!(storage.get(ENABLED_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(storage.get(TIME_KEY).unwrap().as_deref(), Some("22:00"));
    }

    #[test]
    fn test_save_then_load() {
        let storage = Storage::open_in_memory().unwrap();
        let settings = ReminderSettings {
            enabled: false,
            time: TimeOfDay::new(8, 45).unwrap(),
        };
        save_reminder(&storage, settings).unwrap();
        assert_eq!(load_reminder(&storage), settings);
    }

    #[test]
    fn test_garbage_time_falls_back_to_default() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set(ENABLED_KEY, "true").unwrap();
        storage.set(TIME_KEY, "2024-01-01T22:00:00Z").unwrap();
        assert_eq!(load_reminder(&storage).time, TimeOfDay::default());
    }
}
