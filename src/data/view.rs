//! Derived view models computed from the record history.
//!
//! Pure functions over `&[MoodRecord]`; the stats screen and the `stats`
//! command both render from these.

use super::models::{Metric, MoodRecord};

/// Number of days shown by default in charts
pub const DEFAULT_CHART_DAYS: usize = 7;

/// Records ordered by date; rows sharing a date keep their write order
pub fn sorted_by_date(records: &[MoodRecord]) -> Vec<MoodRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.day().cmp(&b.day()).then_with(|| a.date.cmp(&b.date)));
    sorted
}

/// One record per date (the last one written), ordered by date
pub fn latest_per_day(records: &[MoodRecord]) -> Vec<MoodRecord> {
    let mut latest: Vec<MoodRecord> = Vec::with_capacity(records.len());
    for record in records.iter().rev() {
        if !latest.iter().any(|r| r.date == record.date) {
            latest.push(record.clone());
        }
    }
    sorted_by_date(&latest)
}

/// The most recent `n` logged days
pub fn last_days(records: &[MoodRecord], n: usize) -> Vec<MoodRecord> {
    let days = latest_per_day(records);
    let skip = days.len().saturating_sub(n);
    days.into_iter().skip(skip).collect()
}

/// Today's entry only (zero or one record)
pub fn today_only(records: &[MoodRecord], today: &str) -> Vec<MoodRecord> {
    super::journal::entry_for_date(records, today)
        .cloned()
        .into_iter()
        .collect()
}

/// A metric ready for charting: points scaled to percent plus x-axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<String>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the series for `metric` from already selected records (in display order)
pub fn chart_series(records: &[MoodRecord], metric: Metric) -> ChartSeries {
    let points = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.value(metric) * 100.0))
        .collect();
    let labels = records
        .iter()
        .map(|r| {
            r.day()
                .map(|d| d.format("%a").to_string())
                .unwrap_or_else(|| r.date.clone())
        })
        .collect();
    ChartSeries {
        metric,
        points,
        labels,
    }
}

/// Aggregate numbers for a metric over a set of records, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

pub fn summary(records: &[MoodRecord], metric: Metric) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }
    let values = records.iter().map(|r| r.value(metric) * 100.0);
    let (sum, min, max) = values.fold((0.0, f64::MAX, f64::MIN), |(s, lo, hi), v| {
        (s + v, lo.min(v), hi.max(v))
    });
    Some(Summary {
        average: sum / records.len() as f64,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, mood: f64) -> MoodRecord {
        MoodRecord {
            date: date.to_string(),
            mood,
            energy: 0.5,
            anxiety: 0.5,
            focus: 0.5,
        }
    }

    #[test]
    fn test_sorted_by_date_is_stable() {
        let records = vec![
            record("2024-01-03", 0.1),
            record("2024-01-01", 0.2),
            record("2024-01-03", 0.3),
        ];
        let sorted = sorted_by_date(&records);
        let moods: Vec<f64> = sorted.iter().map(|r| r.mood).collect();
        assert_eq!(moods, vec![0.2, 0.1, 0.3]);
    }

    #[test]
    fn test_latest_per_day_keeps_last_write() {
        let records = vec![
            record("2024-01-02", 0.1),
            record("2024-01-01", 0.2),
            record("2024-01-02", 0.9),
        ];
        let latest = latest_per_day(&records);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].date, "2024-01-01");
        assert_eq!(latest[1].mood, 0.9);
    }

    #[test]
    fn test_last_days_takes_most_recent() {
        let records: Vec<MoodRecord> = (1..=10)
            .map(|d| record(&format!("2024-01-{d:02}"), d as f64 / 10.0))
            .collect();
        let last = last_days(&records, DEFAULT_CHART_DAYS);
        assert_eq!(last.len(), 7);
        assert_eq!(last[0].date, "2024-01-04");
        assert_eq!(last[6].date, "2024-01-10");

        assert_eq!(last_days(&records[..2], 7).len(), 2);
    }

    #[test]
    fn test_today_only() {
        let records = vec![record("2024-01-01", 0.2), record("2024-01-02", 0.4)];
        assert_eq!(today_only(&records, "2024-01-02"), vec![records[1].clone()]);
        assert!(today_only(&records, "2024-01-03").is_empty());
    }

    #[test]
    fn test_chart_series_scales_to_percent_with_weekday_labels() {
        // 2024-01-01 was a Monday
        let records = vec![record("2024-01-01", 0.25), record("2024-01-02", 1.0)];
        let series = chart_series(&records, Metric::Mood);
        assert_eq!(series.points, vec![(0.0, 25.0), (1.0, 100.0)]);
        assert_eq!(series.labels, vec!["Mon", "Tue"]);
        assert!(chart_series(&[], Metric::Focus).is_empty());
    }

    #[test]
    fn test_summary() {
        let records = vec![record("2024-01-01", 0.2), record("2024-01-02", 0.6)];
        let s = summary(&records, Metric::Mood).unwrap();
        assert!((s.average - 40.0).abs() < 1e-9);
        assert!((s.min - 20.0).abs() < 1e-9);
        assert!((s.max - 60.0).abs() < 1e-9);
        assert!(summary(&[], Metric::Mood).is_none());
    }
}
