//! Smaller widgets: entry header, progress dots, settings panel, status bar.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::data::{Metric, ReminderSettings};
use super::theme::Theme;

/// Date, metric title and question above the dial
pub struct EntryHeader<'a> {
    date_label: &'a str,
    metric: Metric,
    theme: &'a Theme,
}

impl<'a> EntryHeader<'a> {
    pub fn new(date_label: &'a str, metric: Metric, theme: &'a Theme) -> Self {
        EntryHeader {
            date_label,
            metric,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(self.date_label, self.theme.title_style())),
            Line::from(""),
            Line::from(Span::styled(
                self.metric.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::raw(self.metric.question())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

/// One dot per metric: filled for done, bold for current
pub struct ProgressDots<'a> {
    current: Metric,
    theme: &'a Theme,
}

impl<'a> ProgressDots<'a> {
    pub fn new(current: Metric, theme: &'a Theme) -> Self {
        ProgressDots { current, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spans: Vec<Span> = Metric::ALL
            .iter()
            .map(|m| {
                if *m == self.current {
                    Span::styled("● ", self.theme.focused_border_style())
                } else if m.index() < self.current.index() {
                    Span::styled("● ", self.theme.normal_style())
                } else {
                    Span::styled("○ ", self.theme.dimmed_title_style())
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }
}

/// Rows of the settings screen, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Reminder,
    ReminderTime,
    Export,
    Import,
    Reset,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 5] = [
        SettingsItem::Reminder,
        SettingsItem::ReminderTime,
        SettingsItem::Export,
        SettingsItem::Import,
        SettingsItem::Reset,
    ];
}

/// Settings list panel widget
pub struct SettingsPanel<'a> {
    reminder: ReminderSettings,
    selected: usize,
    confirm_reset: bool,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(
        reminder: ReminderSettings,
        selected: usize,
        confirm_reset: bool,
        theme: &'a Theme,
    ) -> Self {
        SettingsPanel {
            reminder,
            selected,
            confirm_reset,
            theme,
        }
    }

    fn item_text(&self, item: SettingsItem) -> String {
        match item {
            SettingsItem::Reminder => format!(
                "Daily reminder        [{}]",
                if self.reminder.enabled { "on" } else { "off" }
            ),
            SettingsItem::ReminderTime => format!("Reminder time          {}", self.reminder.time),
            SettingsItem::Export => "Export data".to_string(),
            SettingsItem::Import => "Import data".to_string(),
            SettingsItem::Reset if self.confirm_reset => {
                "Reset all data? press y to confirm, n to cancel".to_string()
            }
            SettingsItem::Reset => "Reset all data".to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = SettingsItem::ALL
            .iter()
            .map(|item| {
                let text = self.item_text(*item);
                let style = match item {
                    SettingsItem::ReminderTime if !self.reminder.enabled => {
                        self.theme.dimmed_title_style()
                    }
                    SettingsItem::Reset => Style::default().fg(self.theme.error),
                    _ => self.theme.normal_style(),
                };
                ListItem::new(Span::styled(text, style))
            })
            .collect();

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(border_style)
            .title_style(title_style);

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    screen: &'a str,
    notice: Option<&'a str>,
    error: Option<&'a str>,
    reminder_due: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        screen: &'a str,
        notice: Option<&'a str>,
        error: Option<&'a str>,
        reminder_due: bool,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            screen,
            notice,
            error,
            reminder_due,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(e) = self.error {
            Line::from(Span::styled(format!("Error: {e}"), Style::default().fg(self.theme.error)))
        } else if let Some(n) = self.notice {
            Line::from(Span::raw(n.to_string()))
        } else if self.reminder_due {
            Line::from(Span::styled(
                "How was your day? Don't forget to log your mood!",
                Style::default().fg(self.theme.reminder),
            ))
        } else {
            Line::from(Span::raw(format!(
                "moodline: {} | [e] Entry [t] Stats [o] Settings [?] Help [q] Quit",
                self.screen
            )))
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
