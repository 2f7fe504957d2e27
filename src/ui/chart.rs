//! Per-metric line charts for the stats screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::data::view::{ChartSeries, Summary};
use crate::data::Metric;
use super::theme::Theme;

/// Which slice of history the charts show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    LastDays(usize),
    Today,
}

impl ChartRange {
    pub fn label(self) -> String {
        match self {
            ChartRange::LastDays(n) => format!("last {n} days"),
            ChartRange::Today => "today".to_string(),
        }
    }
}

/// Line chart for one metric
pub struct MoodChart<'a> {
    series: &'a ChartSeries,
    summary: Option<Summary>,
    theme: &'a Theme,
}

impl<'a> MoodChart<'a> {
    pub fn new(series: &'a ChartSeries, summary: Option<Summary>, theme: &'a Theme) -> Self {
        MoodChart {
            series,
            summary,
            theme,
        }
    }

    fn title(&self) -> String {
        let metric = self.series.metric;
        match self.summary {
            Some(s) => format!(
                " {} {}  avg {:.0}%  min {:.0}%  max {:.0}% ",
                metric.emojis()[4],
                metric.title(),
                s.average,
                s.min,
                s.max
            ),
            None => format!(" {} {} ", metric.emojis()[4], metric.title()),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (border_style, _) = self.theme.panel_styles(focused);
        let color = self.theme.metric_color(self.series.metric);
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        if self.series.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = Paragraph::new("No data available")
                .style(Style::default().add_modifier(Modifier::DIM))
                .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let points = &self.series.points;
        let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

        let datasets = vec![
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(points),
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .data(points),
        ];

        let mut x_labels: Vec<Span> = self
            .series
            .labels
            .iter()
            .map(|l| Span::raw(l.clone()))
            .collect();
        if x_labels.len() < 2 {
            x_labels.push(Span::raw(""));
        }

        let y_labels = vec![Span::raw("0%"), Span::raw("50%"), Span::raw("100%")];

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([0.0, 100.0])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }
}

/// Metric tab bar with the current range
pub struct MetricTabs<'a> {
    selected: Metric,
    range: ChartRange,
    theme: &'a Theme,
}

impl<'a> MetricTabs<'a> {
    pub fn new(selected: Metric, range: ChartRange, theme: &'a Theme) -> Self {
        MetricTabs {
            selected,
            range,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Metric::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, metric)| {
                let style = if *metric == self.selected {
                    self.theme.highlight_style()
                } else {
                    self.theme.normal_style()
                };
                vec![
                    Span::styled(format!("[{}] ", i + 1), Style::default().add_modifier(Modifier::DIM)),
                    Span::styled(format!("{}  ", metric.key()), style),
                ]
            })
            .collect();
        spans.push(Span::styled(
            format!("({})", self.range.label()),
            Style::default().add_modifier(Modifier::DIM),
        ));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(self.theme.normal_style()),
            area,
        );
    }
}
