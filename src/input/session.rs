//! Transient input state for one day's entry.
//!
//! `SliderSession` tracks a single metric's dial; `EntrySession` walks the
//! four metrics in order and yields the finished record.

use tracing::debug;

use crate::data::{Metric, MetricValues, MoodRecord};

use super::angular::{angle_from_value, value_from_angle, value_from_step, STEP_COUNT};

/// Where a single metric's dial is in its interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderPhase {
    Idle,
    /// A drag is active; `start_value` is restored if it gets cancelled
    Dragging { start_value: f64 },
    Committed,
}

/// Emitted whenever the dial value changes, for either input modality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChange {
    pub value: f64,
    /// Drag samples ask for a short feedback pulse; step taps do not
    pub pulse: bool,
}

#[derive(Debug, Clone)]
pub struct SliderSession {
    value: f64,
    phase: SliderPhase,
}

impl SliderSession {
    pub fn new(initial: f64) -> Self {
        SliderSession {
            value: initial.clamp(0.0, 1.0),
            phase: SliderPhase::Idle,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn angle(&self) -> f64 {
        angle_from_value(self.value)
    }

    pub fn phase(&self) -> SliderPhase {
        self.phase
    }

    pub fn is_committed(&self) -> bool {
        self.phase == SliderPhase::Committed
    }

    pub fn begin_drag(&mut self) {
        if self.phase == SliderPhase::Idle {
            self.phase = SliderPhase::Dragging {
                start_value: self.value,
            };
        }
    }

    /// Feed one pointer sample, already converted to a dial angle
    pub fn drag_to(&mut self, angle_degrees: f64) -> Option<ValueChange> {
        if !matches!(self.phase, SliderPhase::Dragging { .. }) {
            return None;
        }
        let value = value_from_angle(angle_degrees);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(ValueChange { value, pulse: true })
    }

    /// Release the pointer. Inside the dial this commits; outside it discards the gesture.
    pub fn end_drag(&mut self, inside: bool) -> Option<f64> {
        let SliderPhase::Dragging { start_value } = self.phase else {
            return None;
        };
        if inside {
            self.phase = SliderPhase::Committed;
            Some(self.value)
        } else {
            self.value = start_value;
            self.phase = SliderPhase::Idle;
            None
        }
    }

    /// Abandon an active drag, restoring the value it started from
    pub fn cancel(&mut self) {
        if let SliderPhase::Dragging { start_value } = self.phase {
            self.value = start_value;
            self.phase = SliderPhase::Idle;
        }
    }

    /// Jump straight to a discrete step and commit it
    pub fn tap_step(&mut self, index: usize) -> Option<ValueChange> {
        if self.is_committed() {
            return None;
        }
        self.value = value_from_step(index, STEP_COUNT);
        self.phase = SliderPhase::Committed;
        Some(ValueChange {
            value: self.value,
            pulse: false,
        })
    }

    /// Keyboard adjustment while idle; moves the value without committing
    pub fn nudge(&mut self, delta: f64) -> Option<ValueChange> {
        if self.phase != SliderPhase::Idle {
            return None;
        }
        let value = (self.value + delta).clamp(0.0, 1.0);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(ValueChange { value, pulse: true })
    }

    /// Commit whatever value is showing (keyboard confirm)
    pub fn commit(&mut self) -> Option<f64> {
        match self.phase {
            SliderPhase::Committed => None,
            _ => {
                self.phase = SliderPhase::Committed;
                Some(self.value)
            }
        }
    }
}

/// Outcome of advancing an entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStep {
    /// Moved on to this metric
    Next(Metric),
    /// All metrics done; this record should be persisted
    Finished(MoodRecord),
}

/// The sequence of four metric dials that makes up one day's entry
#[derive(Debug, Clone)]
pub struct EntrySession {
    date: String,
    values: MetricValues,
    current: Metric,
    slider: SliderSession,
    finished: bool,
}

impl EntrySession {
    pub fn new(date: impl Into<String>) -> Self {
        Self::with_values(date, MetricValues::default())
    }

    /// Start from existing values, e.g. when re-editing an already logged day
    pub fn with_values(date: impl Into<String>, values: MetricValues) -> Self {
        let current = Metric::Mood;
        EntrySession {
            date: date.into(),
            values,
            current,
            slider: SliderSession::new(values.get(current)),
            finished: false,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn current(&self) -> Metric {
        self.current
    }

    pub fn values(&self) -> MetricValues {
        self.values
    }

    pub fn slider(&self) -> &SliderSession {
        &self.slider
    }

    pub fn slider_mut(&mut self) -> &mut SliderSession {
        &mut self.slider
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Capture the slider's committed value for the current metric and advance
    pub fn commit(&mut self) -> Option<EntryStep> {
        if self.finished {
            return None;
        }
        if !self.slider.is_committed() {
            self.slider.commit();
        }
        self.values.set(self.current, self.slider.value());
        debug!(metric = %self.current, value = self.slider.value(), "metric committed");
        Some(self.advance())
    }

    /// Advance without capturing; the metric keeps its prior value
    pub fn skip(&mut self) -> Option<EntryStep> {
        if self.finished {
            return None;
        }
        debug!(metric = %self.current, "metric skipped");
        Some(self.advance())
    }

    /// Return to the previous metric, if any
    pub fn back(&mut self) -> Option<Metric> {
        if self.finished {
            return None;
        }
        let prev = self.current.prev()?;
        self.enter(prev);
        Some(prev)
    }

    fn advance(&mut self) -> EntryStep {
        match self.current.next() {
            Some(next) => {
                self.enter(next);
                EntryStep::Next(next)
            }
            None => {
                self.finished = true;
                EntryStep::Finished(MoodRecord::new(self.date.clone(), self.values))
            }
        }
    }

    fn enter(&mut self, metric: Metric) {
        self.current = metric;
        self.slider = SliderSession::new(self.values.get(metric));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taps_produce_even_steps() {
        let values: Vec<f64> = (0..STEP_COUNT)
            .map(|i| {
                let mut slider = SliderSession::new(0.5);
                slider.tap_step(i).unwrap().value
            })
            .collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_tap_commits_without_pulse() {
        let mut slider = SliderSession::new(0.5);
        let change = slider.tap_step(4).unwrap();
        assert_eq!(change, ValueChange { value: 1.0, pulse: false });
        assert!(slider.is_committed());
        assert!(slider.tap_step(0).is_none());
    }

    #[test]
    fn test_drag_updates_and_commits_inside() {
        let mut slider = SliderSession::new(0.5);
        assert!(slider.drag_to(45.0).is_none(), "samples before drag start are ignored");

        slider.begin_drag();
        assert_eq!(slider.phase(), SliderPhase::Dragging { start_value: 0.5 });
        let change = slider.drag_to(45.0).unwrap();
        assert_eq!(change, ValueChange { value: 0.25, pulse: true });
        assert!(slider.drag_to(45.0).is_none(), "unchanged samples emit nothing");
        slider.drag_to(400.0);
        assert_eq!(slider.value(), 1.0);

        assert_eq!(slider.end_drag(true), Some(1.0));
        assert!(slider.is_committed());
    }

    #[test]
    fn test_release_outside_discards_gesture() {
        let mut slider = SliderSession::new(0.75);
        slider.begin_drag();
        slider.drag_to(0.0);
        assert_eq!(slider.value(), 0.0);

        assert_eq!(slider.end_drag(false), None);
        assert_eq!(slider.value(), 0.75);
        assert_eq!(slider.phase(), SliderPhase::Idle);

        slider.begin_drag();
        slider.drag_to(90.0);
        slider.cancel();
        assert_eq!(slider.value(), 0.75);
    }

    #[test]
    fn test_nudge_only_while_idle() {
        let mut slider = SliderSession::new(0.95);
        assert_eq!(slider.nudge(0.1).unwrap().value, 1.0);
        assert!(slider.nudge(0.1).is_none());
        slider.begin_drag();
        assert!(slider.nudge(-0.5).is_none());
    }

    #[test]
    fn test_entry_walks_all_metrics_and_finishes() {
        let mut entry = EntrySession::new("2024-01-01");
        let mut steps = Vec::new();
        for i in [4, 3, 1, 0] {
            entry.slider_mut().tap_step(i);
            steps.push(entry.commit().unwrap());
        }

        assert_eq!(steps[0], EntryStep::Next(Metric::Energy));
        assert_eq!(steps[1], EntryStep::Next(Metric::Anxiety));
        assert_eq!(steps[2], EntryStep::Next(Metric::Focus));
        assert_eq!(
            steps[3],
            EntryStep::Finished(MoodRecord {
                date: "2024-01-01".to_string(),
                mood: 1.0,
                energy: 0.75,
                anxiety: 0.25,
                focus: 0.0,
            })
        );
        assert!(entry.is_finished());
        assert!(entry.commit().is_none());
    }

    #[test]
    fn test_skip_keeps_default_and_ignores_uncommitted_changes() {
        let mut entry = EntrySession::new("2024-01-01");
        entry.slider_mut().nudge(0.3);
        assert_eq!(entry.skip(), Some(EntryStep::Next(Metric::Energy)));
        assert_eq!(entry.values().mood, 0.5);
        assert_eq!(entry.slider().value(), 0.5);
    }

    #[test]
    fn test_back_restores_captured_value() {
        let mut entry = EntrySession::new("2024-01-01");
        entry.slider_mut().tap_step(1);
        entry.commit();
        assert_eq!(entry.current(), Metric::Energy);

        assert_eq!(entry.back(), Some(Metric::Mood));
        assert_eq!(entry.slider().value(), 0.25);
        assert_eq!(entry.slider().phase(), SliderPhase::Idle);
        assert_eq!(entry.back(), None);
    }
}
