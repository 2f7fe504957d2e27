//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::data::Metric;

use super::theme::Theme;

const POPUP_MAX_WIDTH: u16 = 72;
const KEY_COLUMN: usize = 14;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: &[Section] = &[
    (
        "Entry",
        &[
            ("1-5", "Pick an emoji step"),
            ("← / →", "Nudge the dial"),
            ("Enter", "Confirm and go to the next metric"),
            ("s", "Skip this metric"),
            ("Backspace", "Previous metric"),
            ("Esc", "Cancel the current drag"),
            ("Mouse", "Click an emoji, or drag the dial and release inside it"),
        ],
    ),
    (
        "Stats",
        &[
            ("1-4 / Tab", "Focus a metric chart"),
            ("d", "Toggle last 7 days / today"),
            ("r", "Reload data"),
        ],
    ),
    (
        "Settings",
        &[
            ("j / k", "Move between rows"),
            ("Enter / Space", "Toggle or run the selected row"),
            ("+ / -", "Shift reminder time by 15 minutes"),
        ],
    ),
    (
        "General",
        &[
            ("e / t / o", "Entry / Stats / Settings"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    fn section_lines(&self, (title, items): &Section) -> Vec<Line<'static>> {
        let heading = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED);
        let key_style = Style::default().fg(self.theme.title);

        let mut lines = vec![Line::from(Span::styled(format!("  {title} "), heading))];
        lines.extend(items.iter().map(|(key, desc)| {
            Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("{key:<KEY_COLUMN$}"), key_style),
                Span::raw(*desc),
            ])
        }));
        lines.push(Line::from(""));
        lines
    }

    /// One row per metric: its emoji scale, low to high, in the metric's color
    fn legend_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            "  Scales ",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for metric in Metric::ALL {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    format!("{:<KEY_COLUMN$}", metric.title()),
                    Style::default().fg(self.theme.metric_color(metric)),
                ),
                Span::raw(metric.emojis().join(" ")),
            ]));
        }
        lines
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from("")];
        for section in SECTIONS {
            lines.extend(self.section_lines(section));
        }
        lines.extend(self.legend_lines());
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let popup_area = popup_rect(area, lines.len() as u16 + 2);

        // Clear whatever screen is underneath
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" moodline Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}

/// Centered popup no wider than `POPUP_MAX_WIDTH` and no taller than the content needs
fn popup_rect(area: Rect, content_height: u16) -> Rect {
    let width = area.width.min(POPUP_MAX_WIDTH);
    let height = area.height.min(content_height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_popup_rect_fits_content_and_area() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(popup_rect(area, 30), Rect::new(24, 5, 72, 30));

        let small = Rect::new(2, 1, 40, 10);
        assert_eq!(popup_rect(small, 30), Rect::new(2, 1, 40, 10));
    }

    #[test]
    fn test_overlay_lists_shortcuts_and_scales() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal
            .draw(|f| HelpOverlay::new(&theme).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Skip this metric"));
        assert!(text.contains("My anxiety"));
    }
}
