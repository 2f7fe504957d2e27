//! Data layer: key-value storage, the mood journal, settings and view models.

mod error;
pub mod journal;
mod models;
pub mod settings;
mod storage;
pub mod view;

pub use journal::{has_entry_for_date, MoodStore};
pub use models::{Metric, MetricValues, MoodRecord, ReminderSettings, TimeOfDay, DATE_FORMAT};
pub use storage::Storage;
