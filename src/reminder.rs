//! Daily reminder scheduling.
//!
//! The journal only owns `ReminderSettings`; delivering the reminder is the
//! scheduler's job. The terminal scheduler surfaces it in the status bar.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{ReminderSettings, TimeOfDay};

#[derive(Debug, Error)]
pub enum ReminderError {
    #[allow(dead_code)] // Used in tests
    #[error("permission to show reminders was denied")]
    PermissionDenied,
}

/// Something that can fire a reminder once a day at a local time
pub trait ReminderScheduler {
    fn schedule_daily(&mut self, time: TimeOfDay) -> Result<(), ReminderError>;
    fn cancel_all(&mut self);
}

/// Re-arm the scheduler from settings.
///
/// Returns the settings actually in effect: a denied permission turns the
/// reminder off for this session without failing anything else.
pub fn apply_settings(
    settings: ReminderSettings,
    scheduler: &mut dyn ReminderScheduler,
) -> ReminderSettings {
    scheduler.cancel_all();
    if !settings.enabled {
        debug!("daily reminder disabled");
        return settings;
    }

    match scheduler.schedule_daily(settings.time) {
        Ok(()) => {
            debug!(time = %settings.time, "daily reminder scheduled");
            settings
        }
        Err(e) => {
            info!("daily reminder turned off: {e}");
            ReminderSettings {
                enabled: false,
                ..settings
            }
        }
    }
}

/// In-app reminder shown while the terminal UI is open
#[derive(Debug, Default)]
pub struct TerminalReminder {
    scheduled: Option<TimeOfDay>,
}

impl TerminalReminder {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Used in tests
    pub fn scheduled(&self) -> Option<TimeOfDay> {
        self.scheduled
    }

    /// True once the reminder time has passed today and nothing is logged yet
    pub fn is_due(&self, now: NaiveTime, logged_today: bool) -> bool {
        let Some(time) = self.scheduled else {
            return false;
        };
        let now_minutes = now.hour() * 60 + now.minute();
        !logged_today && now_minutes >= time.minutes() as u32
    }
}

impl ReminderScheduler for TerminalReminder {
    fn schedule_daily(&mut self, time: TimeOfDay) -> Result<(), ReminderError> {
        self.scheduled = Some(time);
        Ok(())
    }

    fn cancel_all(&mut self) {
        self.scheduled = None;
    }
}
