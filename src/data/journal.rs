//! The mood entry store.
//!
//! The whole history lives as one JSON array under the `moodData` key. Every
//! write is a read-modify-write of the full sequence; reads fail soft so a
//! missing or corrupt blob looks exactly like an empty journal.

use std::cell::Cell;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::error::{ImportError, Result, StoreError};
use super::models::{Metric, MoodRecord, DATE_FORMAT};
use super::storage::Storage;

/// Storage key holding the JSON array of records
pub const MOOD_DATA_KEY: &str = "moodData";

/// Durable list of daily mood records
pub struct MoodStore {
    storage: Storage,
    in_flight: Cell<bool>,
}

/// Held for the duration of one persistence operation
struct InFlight<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl MoodStore {
    pub fn new(storage: Storage) -> Self {
        MoodStore {
            storage,
            in_flight: Cell::new(false),
        }
    }

    /// Underlying key-value storage (shared with settings)
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        if self.in_flight.replace(true) {
            return Err(StoreError::Busy);
        }
        Ok(InFlight {
            flag: &self.in_flight,
        })
    }

    /// Read every stored record in write order.
    ///
    /// Never fails: unreadable, malformed and absent data all yield an empty list.
    pub fn load_all(&self) -> Vec<MoodRecord> {
        let _guard = match self.begin() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("skipping load: {e}");
                return Vec::new();
            }
        };
        self.read_records()
    }

    fn read_records(&self) -> Vec<MoodRecord> {
        let raw = match self.storage.get(MOOD_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("treating unreadable mood data as empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<MoodRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("treating malformed mood data as empty: {e}");
                Vec::new()
            }
        }
    }

    fn write_records(&self, records: &[MoodRecord]) -> Result<()> {
        let raw = serde_json::to_string(records).map_err(StoreError::Encode)?;
        self.storage.set(MOOD_DATA_KEY, &raw)
    }

    /// Append a record to the end of the history, keeping every existing row
    pub fn append_record(&self, record: MoodRecord) -> Result<()> {
        let _guard = self.begin()?;
        let mut records = self.read_records();
        debug!(date = %record.date, count = records.len(), "appending mood record");
        records.push(record);
        self.write_records(&records)?;
        info!(count = records.len(), "mood data saved");
        Ok(())
    }

    /// Store `record` as the single entry for its date, replacing earlier rows for that day
    pub fn upsert_record(&self, record: MoodRecord) -> Result<()> {
        let _guard = self.begin()?;
        let mut records = self.read_records();
        let before = records.len();
        records.retain(|r| r.date != record.date);
        debug!(
            date = %record.date,
            replaced = before - records.len(),
            "recording entry for day"
        );
        records.push(record);
        self.write_records(&records)?;
        info!(count = records.len(), "mood data saved");
        Ok(())
    }

    /// Delete the whole history
    pub fn reset_all(&self) -> Result<()> {
        let _guard = self.begin()?;
        self.storage.remove(MOOD_DATA_KEY)?;
        info!("mood data reset");
        Ok(())
    }

    /// Replace the whole history with imported JSON.
    ///
    /// The content is validated before anything is written; on failure the
    /// stored blob is untouched.
    pub fn replace_all(&self, raw_json: &str) -> Result<()> {
        let _guard = self.begin()?;
        let records = validate_import(raw_json)?;
        self.storage.set(MOOD_DATA_KEY, raw_json)?;
        info!(count = records.len(), "mood data imported");
        Ok(())
    }

    /// The persisted blob exactly as stored, for export
    pub fn export_raw(&self) -> Result<Option<String>> {
        let _guard = self.begin()?;
        self.storage.get(MOOD_DATA_KEY)
    }
}

/// True if any record is dated exactly `date`
pub fn has_entry_for_date(records: &[MoodRecord], date: &str) -> bool {
    records.iter().any(|r| r.date == date)
}

/// The last record written for `date`
pub fn entry_for_date<'a>(records: &'a [MoodRecord], date: &str) -> Option<&'a MoodRecord> {
    records.iter().rev().find(|r| r.date == date)
}

/// Check that `raw` is a JSON array of well-formed records
pub fn validate_import(raw: &str) -> std::result::Result<Vec<MoodRecord>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ImportError::Malformed)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record: MoodRecord = serde_json::from_value(item)
                .map_err(|source| ImportError::InvalidRecord { index, source })?;

            // Dates are matched as strings, so only the zero-padded form is accepted
            let canonical = NaiveDate::parse_from_str(&record.date, DATE_FORMAT)
                .map(|d| d.format(DATE_FORMAT).to_string());
            if canonical.as_deref() != Ok(record.date.as_str()) {
                return Err(ImportError::InvalidDate {
                    index,
                    date: record.date,
                });
            }
            for metric in Metric::ALL {
                let value = record.value(metric);
                if !(0.0..=1.0).contains(&value) {
                    return Err(ImportError::OutOfRange {
                        index,
                        metric: metric.key(),
                        value,
                    });
                }
            }
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetricValues;

    fn store() -> MoodStore {
        MoodStore::new(Storage::open_in_memory().unwrap())
    }

    fn record(date: &str, v: f64) -> MoodRecord {
        MoodRecord {
            date: date.to_string(),
            mood: v,
            energy: v,
            anxiety: v,
            focus: v,
        }
    }

    #[test]
    fn test_append_to_empty_store() {
        let store = store();
        let input = MoodRecord::new("2024-01-01", MetricValues::default());
        store.append_record(input.clone()).unwrap();

        let all = store.load_all();
        assert_eq!(all, vec![input]);
    }

    #[test]
    fn test_append_is_monotonic_and_preserves_order() {
        let store = store();
        store.append_record(record("2024-01-03", 0.1)).unwrap();
        store.append_record(record("2024-01-01", 0.2)).unwrap();
        let before = store.load_all();

        store.append_record(record("2024-01-01", 0.9)).unwrap();
        let after = store.load_all();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().unwrap().mood, 0.9);
    }

    #[test]
    fn test_has_entry_for_date() {
        let store = store();
        assert!(!has_entry_for_date(&store.load_all(), "2024-01-01"));

        store.append_record(record("2024-01-01", 0.5)).unwrap();
        let all = store.load_all();
        assert!(has_entry_for_date(&all, "2024-01-01"));
        assert!(!has_entry_for_date(&all, "2024-01-02"));
        assert!(!has_entry_for_date(&all, "2024-1-1"));
    }

    #[test]
    fn test_entry_for_date_picks_last_write() {
        let records = vec![
            record("2024-01-01", 0.1),
            record("2024-01-02", 0.4),
            record("2024-01-01", 0.7),
        ];
        assert_eq!(entry_for_date(&records, "2024-01-01").unwrap().mood, 0.7);
        assert!(entry_for_date(&records, "2024-01-05").is_none());
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let store = store();
        store.append_record(record("2024-01-01", 0.1)).unwrap();
        store.append_record(record("2024-01-01", 0.2)).unwrap();
        store.append_record(record("2024-01-02", 0.3)).unwrap();

        store.upsert_record(record("2024-01-01", 0.8)).unwrap();
        let all = store.load_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].date, "2024-01-02");
        assert_eq!(all[1], record("2024-01-01", 0.8));
    }

    #[test]
    fn test_reset_all_clears_everything() {
        let store = store();
        store.append_record(record("2024-01-01", 0.5)).unwrap();
        store.reset_all().unwrap();
        assert!(store.load_all().is_empty());
        assert_eq!(store.export_raw().unwrap(), None);

        // Resetting an empty store is fine too
        store.reset_all().unwrap();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_corrupt_or_foreign_blob_loads_empty() {
        let store = store();
        store.storage().set(MOOD_DATA_KEY, "{not json").unwrap();
        assert!(store.load_all().is_empty());

        store.storage().set(MOOD_DATA_KEY, r#"{"date":"2024-01-01"}"#).unwrap();
        assert!(store.load_all().is_empty());

        // Writing over corrupt data starts from empty
        store.append_record(record("2024-01-01", 0.5)).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_replace_all_rejects_malformed_without_mutation() {
        let store = store();
        store.append_record(record("2024-01-01", 0.5)).unwrap();
        let before = store.export_raw().unwrap();

        let err = store.replace_all("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Import(ImportError::Malformed(_))));
        assert_eq!(store.export_raw().unwrap(), before);
    }

    #[test]
    fn test_replace_all_rejects_wrong_shapes() {
        let store = store();
        assert!(matches!(
            store.replace_all(r#"{"date":"2024-01-01"}"#),
            Err(StoreError::Import(ImportError::NotAnArray))
        ));
        assert!(matches!(
            store.replace_all(r#"[{"date":"2024-01-01","mood":0.5}]"#),
            Err(StoreError::Import(ImportError::InvalidRecord { index: 0, .. }))
        ));
        assert!(matches!(
            store.replace_all(
                r#"[{"date":"01/02/2024","mood":0.5,"energy":0.5,"anxiety":0.5,"focus":0.5}]"#
            ),
            Err(StoreError::Import(ImportError::InvalidDate { index: 0, .. }))
        ));
        for date in ["2024-3-4", " 2024-03-04", "2024-03-04 "] {
            let raw = format!(
                r#"[{{"date":"{date}","mood":0.5,"energy":0.5,"anxiety":0.5,"focus":0.5}}]"#
            );
            assert!(
                matches!(
                    store.replace_all(&raw),
                    Err(StoreError::Import(ImportError::InvalidDate { index: 0, .. }))
                ),
                "{date:?} should be rejected"
            );
        }
        assert!(matches!(
            store.replace_all(
                r#"[{"date":"2024-01-01","mood":0.5,"energy":1.5,"anxiety":0.5,"focus":0.5}]"#
            ),
            Err(StoreError::Import(ImportError::OutOfRange { metric: "energy", .. }))
        ));
        assert_eq!(store.export_raw().unwrap(), None);
    }

    #[test]
    fn test_encode_failure_surfaces_as_store_error() {
        let source = serde_json::from_str::<Vec<MoodRecord>>("[").unwrap_err();
        let err = StoreError::Encode(source);
        assert!(err.to_string().starts_with("failed to encode mood data"));
    }

    #[test]
    fn test_replace_all_stores_content_verbatim() {
        let store = store();
        let raw = r#"[ {"date":"2024-02-01","mood":1,"energy":0,"anxiety":0.25,"focus":0.75,"extra":true} ]"#;
        store.replace_all(raw).unwrap();

        assert_eq!(store.export_raw().unwrap().as_deref(), Some(raw));
        let all = store.load_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].focus, 0.75);
    }

    #[test]
    fn test_second_operation_while_in_flight_is_busy() {
        let store = store();
        let guard = store.begin().unwrap();
        assert!(matches!(
            store.append_record(record("2024-01-01", 0.5)),
            Err(StoreError::Busy)
        ));
        assert!(store.load_all().is_empty());
        drop(guard);

        store.append_record(record("2024-01-01", 0.5)).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }
}
