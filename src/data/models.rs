//! Data models for the mood journal.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used as the per-day key (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the four tracked daily dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Mood,
    Energy,
    Anxiety,
    Focus,
}

impl Metric {
    /// Entry order: mood, energy, anxiety, focus
    pub const ALL: [Metric; 4] = [Metric::Mood, Metric::Energy, Metric::Anxiety, Metric::Focus];

    /// Key used in the persisted JSON records
    pub fn key(self) -> &'static str {
        match self {
            Metric::Mood => "mood",
            Metric::Energy => "energy",
            Metric::Anxiety => "anxiety",
            Metric::Focus => "focus",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Mood => "My mood",
            Metric::Energy => "My energy",
            Metric::Anxiety => "My anxiety",
            Metric::Focus => "My focus",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Metric::Mood => "How do you feel?",
            Metric::Energy => "Your energy level?",
            Metric::Anxiety => "Your stress level?",
            Metric::Focus => "Your concentration?",
        }
    }

    /// Emoji for each of the five dial steps, low to high
    pub fn emojis(self) -> [&'static str; 5] {
        match self {
            Metric::Mood => ["😔", "😕", "😐", "😊", "😄"],
            Metric::Energy => ["😴", "😪", "😐", "⚡", "💪"],
            Metric::Anxiety => ["😰", "😥", "😌", "😊", "🧘"],
            Metric::Focus => ["🌫️", "😵", "😐", "🎯", "🧠"],
        }
    }

    /// Position in the entry sequence
    pub fn index(self) -> usize {
        match self {
            Metric::Mood => 0,
            Metric::Energy => 1,
            Metric::Anxiety => 2,
            Metric::Focus => 3,
        }
    }

    pub fn next(self) -> Option<Metric> {
        Metric::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Metric> {
        self.index().checked_sub(1).map(|i| Metric::ALL[i])
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric '{s}' (expected mood, energy, anxiety or focus)"))
    }
}

/// One day's journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub date: String,
    pub mood: f64,
    pub energy: f64,
    pub anxiety: f64,
    pub focus: f64,
}

impl MoodRecord {
    pub fn new(date: impl Into<String>, values: MetricValues) -> Self {
        MoodRecord {
            date: date.into(),
            mood: values.mood,
            energy: values.energy,
            anxiety: values.anxiety,
            focus: values.focus,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Mood => self.mood,
            Metric::Energy => self.energy,
            Metric::Anxiety => self.anxiety,
            Metric::Focus => self.focus,
        }
    }

    /// Parsed calendar date, if `date` is well formed
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// The four metric values held while an entry is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValues {
    pub mood: f64,
    pub energy: f64,
    pub anxiety: f64,
    pub focus: f64,
}

impl Default for MetricValues {
    /// Every metric starts at the midpoint
    fn default() -> Self {
        MetricValues {
            mood: 0.5,
            energy: 0.5,
            anxiety: 0.5,
            focus: 0.5,
        }
    }
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Mood => self.mood,
            Metric::Energy => self.energy,
            Metric::Anxiety => self.anxiety,
            Metric::Focus => self.focus,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Mood => &mut self.mood,
            Metric::Energy => &mut self.energy,
            Metric::Anxiety => &mut self.anxiety,
            Metric::Focus => &mut self.focus,
        };
        *slot = value;
    }
}

/// Local wall-clock time for the daily reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(TimeOfDay { hour, minute })
    }

    pub fn minutes(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Shift by a number of minutes, wrapping around midnight
    pub fn shifted(self, delta_minutes: i32) -> Self {
        let total = (self.minutes() as i32 + delta_minutes).rem_euclid(24 * 60);
        TimeOfDay {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        TimeOfDay { hour: 22, minute: 0 }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("invalid time '{s}' (expected HH:MM)"))?;
        let hour: u8 = h.parse().map_err(|_| format!("invalid hour in '{s}'"))?;
        let minute: u8 = m.parse().map_err(|_| format!("invalid minute in '{s}'"))?;
        TimeOfDay::new(hour, minute).ok_or_else(|| format!("time out of range: '{s}'"))
    }
}

/// Daily reminder preferences handed to the reminder scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub time: TimeOfDay,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        ReminderSettings {
            enabled: true,
            time: TimeOfDay::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_order_and_navigation() {
        assert_eq!(Metric::Mood.next(), Some(Metric::Energy));
        assert_eq!(Metric::Focus.next(), None);
        assert_eq!(Metric::Mood.prev(), None);
        assert_eq!(Metric::Anxiety.prev(), Some(Metric::Energy));
        assert_eq!("Focus".parse::<Metric>().unwrap(), Metric::Focus);
        assert!("sleep".parse::<Metric>().is_err());
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let json = r#"{"date":"2024-01-01","mood":0.5,"energy":0.25,"anxiety":1,"focus":0,"note":"x"}"#;
        let record: MoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.value(Metric::Energy), 0.25);
        assert_eq!(record.value(Metric::Anxiety), 1.0);
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_time_of_day_parse_and_shift() {
        let t: TimeOfDay = "07:05".parse().unwrap();
        assert_eq!(t, TimeOfDay { hour: 7, minute: 5 });
        assert_eq!(t.to_string(), "07:05");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::default().shifted(150).to_string(), "00:30");
        assert_eq!(TimeOfDay::new(0, 10).unwrap().shifted(-15).to_string(), "23:55");
    }
}
