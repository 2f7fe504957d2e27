//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::data::Metric;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub error: Color,
    pub reminder: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            error: Color::Red,
            reminder: Color::Yellow,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.dimmed_title_style())
        }
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed_title_style(&self) -> Style {
        Style::default()
            .fg(self.border)
            .add_modifier(Modifier::DIM)
    }

    /// Line color for a metric's chart
    pub fn metric_color(&self, metric: Metric) -> Color {
        match metric {
            Metric::Mood => Color::Rgb(0x47, 0x75, 0xEA),
            Metric::Energy => Color::Rgb(0xFF, 0x6B, 0x6B),
            Metric::Anxiety => Color::Rgb(0x20, 0xC9, 0x97),
            Metric::Focus => Color::Rgb(0x84, 0x5E, 0xF7),
        }
    }

    /// Gradient endpoints (low, high) for a metric's dial
    pub fn metric_gradient(&self, metric: Metric) -> (Color, Color) {
        match metric {
            Metric::Mood => (Color::Rgb(0xFF, 0xE3, 0xE3), Color::Rgb(0xFF, 0xB1, 0xB1)),
            Metric::Energy => (Color::Rgb(0xE3, 0xF2, 0xFF), Color::Rgb(0x96, 0xBA, 0xFF)),
            Metric::Anxiety => (Color::Rgb(0xF0, 0xEF, 0xFF), Color::Rgb(0xB4, 0xB0, 0xFF)),
            Metric::Focus => (Color::Rgb(0xFF, 0xE8, 0xE0), Color::Rgb(0xFF, 0xB9, 0x92)),
        }
    }

    /// Dial color for `value`, interpolated across the metric's gradient
    pub fn value_color(&self, metric: Metric, value: f64) -> Color {
        let (low, high) = self.metric_gradient(metric);
        lerp_color(low, high, value)
    }
}

/// Linear blend between two RGB colors; non-RGB colors snap to the nearer end
pub fn lerp_color(from: Color, to: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_colors_are_distinct() {
        let theme = Theme::default();
        for (i, a) in Metric::ALL.iter().enumerate() {
            for b in &Metric::ALL[i + 1..] {
                assert_ne!(theme.metric_color(*a), theme.metric_color(*b));
            }
        }
    }

    #[test]
    fn test_value_color_hits_gradient_ends() {
        let theme = Theme::default();
        let (low, high) = theme.metric_gradient(Metric::Energy);
        assert_eq!(theme.value_color(Metric::Energy, 0.0), low);
        assert_eq!(theme.value_color(Metric::Energy, 1.0), high);
        assert_eq!(theme.value_color(Metric::Energy, 3.0), high);
    }

    #[test]
    fn test_lerp_color_midpoint() {
        let mid = lerp_color(Color::Rgb(0, 100, 200), Color::Rgb(100, 200, 0), 0.5);
        assert_eq!(mid, Color::Rgb(50, 150, 100));
        assert_eq!(lerp_color(Color::Red, Color::Blue, 0.2), Color::Red);
        assert_eq!(lerp_color(Color::Red, Color::Blue, 0.8), Color::Blue);
    }
}
