//! Half-turn dial widget and its pointer geometry.
//!
//! The dial is drawn on a canvas in "dial units": the origin sits at the
//! bottom center and the arc has radius 1. The same mapping converts mouse
//! cells back to units, so hit-testing always matches what was drawn.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders,
    },
    Frame,
};

use crate::data::Metric;
use crate::input::angular::{
    angle_from_pointer, angle_from_value, emoji_index_from_value, value_from_step, STEP_COUNT,
};

use super::theme::Theme;

const X_BOUNDS: [f64; 2] = [-1.3, 1.3];
const Y_BOUNDS: [f64; 2] = [-0.2, 1.25];
const ARC_RADIUS: f64 = 0.85;
const NEEDLE_RADIUS: f64 = 0.75;
const EMOJI_RADIUS: f64 = 1.08;
/// How close (in dial units) a click must land to an emoji to count as a tap
const TAP_RADIUS: f64 = 0.22;

/// Point on the dial at `angle_degrees` and `radius`, y pointing up
fn polar(angle_degrees: f64, radius: f64) -> (f64, f64) {
    let theta = angle_degrees.to_radians();
    (-theta.cos() * radius, theta.sin() * radius)
}

/// Screen geometry of a rendered dial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    /// Whole widget, including its border
    pub outer: Rect,
    /// Canvas drawing area
    pub inner: Rect,
}

impl DialLayout {
    pub fn new(outer: Rect) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(outer);
        DialLayout { outer, inner }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let r = self.outer;
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    }

    /// Convert a terminal cell to dial units (y up, origin at the dial center)
    pub fn to_units(&self, column: u16, row: u16) -> (f64, f64) {
        let width = self.inner.width.max(1) as f64;
        let height = self.inner.height.max(1) as f64;
        let fx = (column as f64 - self.inner.x as f64 + 0.5) / width;
        let fy = (row as f64 - self.inner.y as f64 + 0.5) / height;
        let x = X_BOUNDS[0] + fx * (X_BOUNDS[1] - X_BOUNDS[0]);
        let y = Y_BOUNDS[1] - fy * (Y_BOUNDS[1] - Y_BOUNDS[0]);
        (x, y)
    }

    /// Dial angle under the pointer
    pub fn angle_at(&self, column: u16, row: u16) -> f64 {
        let (x, y) = self.to_units(column, row);
        // angle_from_pointer works in screen coordinates, where y grows downward
        angle_from_pointer(x, -y, 0.0, 0.0)
    }

    /// Which emoji step (if any) a click lands on
    pub fn step_at(&self, column: u16, row: u16) -> Option<usize> {
        let (x, y) = self.to_units(column, row);
        (0..STEP_COUNT).find(|&i| {
            let (sx, sy) = polar(angle_from_value(value_from_step(i, STEP_COUNT)), EMOJI_RADIUS);
            (x - sx).hypot(y - sy) <= TAP_RADIUS
        })
    }
}

/// Eases the drawn needle toward its target angle, one tick at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleAnimation {
    current: f64,
    target: f64,
}

impl NeedleAnimation {
    const STIFFNESS: f64 = 0.35;
    const REST_THRESHOLD: f64 = 0.5;

    pub fn new(angle: f64) -> Self {
        NeedleAnimation {
            current: angle,
            target: angle,
        }
    }

    pub fn angle(&self) -> f64 {
        self.current
    }

    /// Animate toward a new angle (used for step taps)
    pub fn settle_to(&mut self, angle: f64) {
        self.target = angle;
    }

    /// Follow the pointer directly (used while dragging)
    pub fn jump_to(&mut self, angle: f64) {
        self.current = angle;
        self.target = angle;
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one frame
    pub fn tick(&mut self) {
        let delta = self.target - self.current;
        if delta.abs() <= Self::REST_THRESHOLD {
            self.current = self.target;
        } else {
            self.current += delta * Self::STIFFNESS;
        }
    }
}

/// The dial for one metric
pub struct Dial<'a> {
    metric: Metric,
    value: f64,
    needle_angle: f64,
    pulse: bool,
    theme: &'a Theme,
}

impl<'a> Dial<'a> {
    pub fn new(metric: Metric, value: f64, needle_angle: f64, theme: &'a Theme) -> Self {
        Dial {
            metric,
            value,
            needle_angle,
            pulse: false,
            theme,
        }
    }

    /// Flash the border for a feedback pulse
    pub fn pulse(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let emojis = self.metric.emojis();
        let selected = emoji_index_from_value(self.value, STEP_COUNT);
        let value_color = self.theme.value_color(self.metric, self.value);
        let (low, _) = self.theme.metric_gradient(self.metric);
        let arc_color = self.theme.metric_color(self.metric);
        let needle = polar(self.needle_angle, NEEDLE_RADIUS);
        let percent = format!("{:.0}%", self.value * 100.0);

        let arc: Vec<(f64, f64)> = (0..=90).map(|i| polar(i as f64 * 2.0, ARC_RADIUS)).collect();
        let targets: Vec<(f64, f64)> = (0..STEP_COUNT)
            .map(|i| polar(angle_from_value(value_from_step(i, STEP_COUNT)), EMOJI_RADIUS))
            .collect();

        let border_style = if self.pulse {
            Style::default().fg(value_color)
        } else {
            self.theme.border_style()
        };

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .title(format!(" {} ", self.metric.title()))
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title_style(self.theme.title_style()),
            )
            .marker(Marker::Braille)
            .x_bounds(X_BOUNDS)
            .y_bounds(Y_BOUNDS)
            .paint(move |ctx| {
                ctx.draw(&Points {
                    coords: &arc,
                    color: arc_color,
                });
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: needle.0,
                    y2: needle.1,
                    color: value_color,
                });
                ctx.layer();
                for (i, (x, y)) in targets.iter().enumerate() {
                    let style = if i == selected {
                        Style::default().fg(value_color)
                    } else {
                        Style::default().fg(low)
                    };
                    ctx.print(*x - 0.06, *y, Span::styled(emojis[i], style));
                }
                ctx.print(-0.08, 0.2, Span::styled(emojis[selected], Style::default()));
                ctx.print(-0.08, -0.1, Span::styled(percent.clone(), Style::default().fg(value_color)));
            });

        frame.render_widget(canvas, area);
    }
}
