//! Main application logic and TUI event loop.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::cli::AppConfig;
use crate::data::{
    has_entry_for_date, journal, settings, view, Metric, MetricValues, MoodRecord, MoodStore,
    ReminderSettings, DATE_FORMAT,
};
use crate::input::{EntrySession, EntryStep, SliderPhase, ValueChange};
use crate::reminder::{apply_settings, TerminalReminder};
use crate::ui::{
    chart::{ChartRange, MetricTabs, MoodChart},
    slider::{Dial, DialLayout, NeedleAnimation},
    widgets::{EntryHeader, ProgressDots, SettingsItem, SettingsPanel, StatusBar},
    HelpOverlay, Theme,
};

/// Ticks to wait after a commit so the needle can settle before the next metric
const ADVANCE_DELAY_TICKS: u8 = 3;
/// Ticks the dial border stays lit after a drag sample
const PULSE_TICKS: u8 = 2;
/// Keyboard nudge step for the dial
const NUDGE_STEP: f64 = 0.05;
/// Reminder time adjustment step in minutes
const TIME_STEP_MINUTES: i32 = 15;
const DIAL_MAX_WIDTH: u16 = 64;

/// Frame clock for the main loop: ticks on elapsed time, however many events arrive
#[derive(Debug, Clone, Copy)]
struct TickClock {
    tick_rate: Duration,
    last_tick: Instant,
}

impl TickClock {
    fn new(tick_rate: Duration, now: Instant) -> Self {
        TickClock {
            tick_rate,
            last_tick: now,
        }
    }

    /// How long to wait for input before the next frame is due
    fn timeout(&self, now: Instant) -> Duration {
        self.tick_rate
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// True (and restarts the period) once a full tick has elapsed
    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.tick_rate {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Entry,
    Stats,
    Settings,
}

impl Screen {
    fn label(self) -> &'static str {
        match self {
            Screen::Entry => "entry",
            Screen::Stats => "stats",
            Screen::Settings => "settings",
        }
    }
}

/// Screen areas for the entry screen, shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy)]
struct EntryLayout {
    header: Rect,
    dial: DialLayout,
    progress: Rect,
}

/// Split the terminal into body and status bar
fn main_chunks(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Body
            Constraint::Length(2), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1])
}

fn entry_layout(body: Rect) -> EntryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Date, title, question
            Constraint::Min(8),    // Dial
            Constraint::Length(1), // Progress dots
        ])
        .split(body);

    let dial_area = chunks[1];
    let width = dial_area.width.min(DIAL_MAX_WIDTH);
    let dial = Rect::new(
        dial_area.x + (dial_area.width - width) / 2,
        dial_area.y,
        width,
        dial_area.height,
    );

    EntryLayout {
        header: chunks[0],
        dial: DialLayout::new(dial),
        progress: chunks[2],
    }
}

/// Application state
pub struct App {
    config: AppConfig,
    theme: Theme,

    // Data
    store: MoodStore,
    records: Vec<MoodRecord>,
    today: String,

    // Entry state
    entry: EntrySession,
    needle: NeedleAnimation,
    pulse_ticks: u8,
    advance_in: Option<u8>,

    // Stats state
    stats_metric: Metric,
    chart_range: ChartRange,

    // Settings state
    settings_selected: usize,
    confirm_reset: bool,
    reminder_settings: ReminderSettings,
    reminder: TerminalReminder,
    reminder_due: bool,

    // UI State
    screen: Screen,
    show_help: bool,
    viewport: Rect,

    should_quit: bool,

    notice: Option<String>,
    error_message: Option<String>,
}

impl App {
    /// Create the app over an opened store, for the given local date
    pub fn new(config: AppConfig, store: MoodStore, today: String) -> Self {
        let records = store.load_all();
        let mut reminder = TerminalReminder::new();
        let reminder_settings =
            apply_settings(settings::load_reminder(store.storage()), &mut reminder);

        let entry = Self::entry_for(&records, &today);
        let needle = NeedleAnimation::new(entry.slider().angle());
        let screen = if has_entry_for_date(&records, &today) {
            Screen::Stats
        } else {
            Screen::Entry
        };
        info!(records = records.len(), screen = screen.label(), "journal opened");

        App {
            config,
            theme: Theme::default(),
            store,
            records,
            today,
            entry,
            needle,
            pulse_ticks: 0,
            advance_in: None,
            stats_metric: Metric::Mood,
            chart_range: ChartRange::LastDays(view::DEFAULT_CHART_DAYS),
            settings_selected: 0,
            confirm_reset: false,
            reminder_settings,
            reminder,
            reminder_due: false,
            screen,
            show_help: false,
            viewport: Rect::default(),
            should_quit: false,
            notice: None,
            error_message: None,
        }
    }

    /// A fresh entry for `today`, prefilled if the day was already logged
    fn entry_for(records: &[MoodRecord], today: &str) -> EntrySession {
        match journal::entry_for_date(records, today) {
            Some(existing) => EntrySession::with_values(
                today,
                MetricValues {
                    mood: existing.mood,
                    energy: existing.energy,
                    anxiety: existing.anxiety,
                    focus: existing.focus,
                },
            ),
            None => EntrySession::new(today),
        }
    }

    fn logged_today(&self) -> bool {
        has_entry_for_date(&self.records, &self.today)
    }

    /// Open entry if today is not logged yet, otherwise stats
    fn route_home(&mut self) {
        self.reset_entry();
        self.screen = if self.logged_today() {
            Screen::Stats
        } else {
            Screen::Entry
        };
    }

    fn reset_entry(&mut self) {
        self.entry = Self::entry_for(&self.records, &self.today);
        self.needle = NeedleAnimation::new(self.entry.slider().angle());
        self.advance_in = None;
        self.pulse_ticks = 0;
    }

    fn reload(&mut self) {
        self.records = self.store.load_all();
    }

    pub fn set_error(&mut self, message: String) {
        self.notice = None;
        self.error_message = Some(message);
    }

    fn set_notice(&mut self, message: String) {
        self.error_message = None;
        self.notice = Some(message);
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Update the wall clock: day rollover and reminder state
    pub fn refresh_clock(&mut self, now: NaiveDateTime) {
        let today = now.date().format(DATE_FORMAT).to_string();
        if today != self.today {
            debug!(from = %self.today, to = %today, "day changed");
            self.today = today;
            let untouched = self.entry.current() == Metric::Mood
                && self.entry.slider().phase() == SliderPhase::Idle;
            if untouched && self.advance_in.is_none() {
                self.reset_entry();
            }
        }
        self.reminder_due = self.reminder.is_due(now.time(), self.logged_today());
    }

    /// Advance animations by one frame
    pub fn tick(&mut self) {
        self.needle.tick();
        self.pulse_ticks = self.pulse_ticks.saturating_sub(1);

        if let Some(remaining) = self.advance_in {
            if remaining <= 1 {
                self.advance_in = None;
                if let Some(step) = self.entry.commit() {
                    self.on_entry_step(step);
                }
            } else {
                self.advance_in = Some(remaining - 1);
            }
        }
    }

    fn on_value_change(&mut self, change: ValueChange) {
        if change.pulse {
            self.needle.jump_to(self.entry.slider().angle());
            self.pulse_ticks = PULSE_TICKS;
        } else {
            self.needle.settle_to(self.entry.slider().angle());
        }
    }

    /// The slider has a committed value; advance once the needle has had time to settle
    fn schedule_advance(&mut self) {
        self.advance_in = Some(ADVANCE_DELAY_TICKS);
    }

    fn on_entry_step(&mut self, step: EntryStep) {
        match step {
            EntryStep::Next(metric) => {
                debug!(%metric, "next metric");
                self.needle = NeedleAnimation::new(self.entry.slider().angle());
            }
            EntryStep::Finished(record) => self.save_entry(record),
        }
    }

    fn save_entry(&mut self, record: MoodRecord) {
        let date = record.date.clone();
        let values = self.entry.values();
        match self.store.upsert_record(record) {
            Ok(()) => {
                self.reload();
                self.reset_entry();
                self.screen = Screen::Stats;
                self.set_notice(format!("Saved entry for {date}"));
            }
            Err(e) => {
                // Keep the values so the user can confirm through again
                self.entry = EntrySession::with_values(date, values);
                self.needle = NeedleAnimation::new(self.entry.slider().angle());
                self.set_error(format!("Could not save entry: {e}"));
            }
        }
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> Result<()> {
        // Any key clears the previous message
        self.notice = None;
        self.error_message = None;

        if self.confirm_reset {
            return self.handle_reset_confirmation(key);
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return Ok(());
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help {
            return Ok(());
        }

        match key {
            KeyCode::Char('e') => {
                if self.screen != Screen::Entry {
                    self.reset_entry();
                    self.screen = Screen::Entry;
                }
                return Ok(());
            }
            KeyCode::Char('t') => {
                self.screen = Screen::Stats;
                return Ok(());
            }
            KeyCode::Char('o') => {
                self.screen = Screen::Settings;
                return Ok(());
            }
            _ => {}
        }

        match self.screen {
            Screen::Entry => self.handle_entry_keys(key),
            Screen::Stats => self.handle_stats_keys(key),
            Screen::Settings => self.handle_settings_keys(key)?,
        }
        Ok(())
    }

    fn handle_entry_keys(&mut self, key: KeyCode) {
        if self.advance_in.is_some() {
            return;
        }

        match key {
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.tap_step(index);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(change) = self.entry.slider_mut().nudge(-NUDGE_STEP) {
                    self.on_value_change(change);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(change) = self.entry.slider_mut().nudge(NUDGE_STEP) {
                    self.on_value_change(change);
                }
            }
            KeyCode::Enter => {
                self.entry.slider_mut().cancel();
                self.entry.slider_mut().commit();
                self.needle.settle_to(self.entry.slider().angle());
                self.schedule_advance();
            }
            KeyCode::Char('s') => {
                if let Some(step) = self.entry.skip() {
                    self.on_entry_step(step);
                }
            }
            KeyCode::Backspace => {
                if self.entry.back().is_some() {
                    self.needle = NeedleAnimation::new(self.entry.slider().angle());
                }
            }
            KeyCode::Esc => {
                self.entry.slider_mut().cancel();
                self.needle.settle_to(self.entry.slider().angle());
            }
            _ => {}
        }
    }

    fn tap_step(&mut self, index: usize) {
        if let Some(change) = self.entry.slider_mut().tap_step(index) {
            debug!(index, value = change.value, "step tapped");
            self.on_value_change(change);
            self.schedule_advance();
        }
    }

    /// Handle mouse input (entry screen dial only)
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Entry || self.show_help || self.advance_in.is_some() {
            return;
        }

        let (body, _) = main_chunks(self.viewport);
        let dial = entry_layout(body).dial;
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = dial.step_at(column, row) {
                    self.tap_step(index);
                } else if dial.contains(column, row) {
                    self.entry.slider_mut().begin_drag();
                    self.drag_sample(dial.angle_at(column, row));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag_sample(dial.angle_at(column, row));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let inside = dial.contains(column, row);
                match self.entry.slider_mut().end_drag(inside) {
                    Some(value) => {
                        debug!(value, "drag committed");
                        self.schedule_advance();
                    }
                    None => self.needle.settle_to(self.entry.slider().angle()),
                }
            }
            _ => {}
        }
    }

    fn drag_sample(&mut self, angle: f64) {
        if let Some(change) = self.entry.slider_mut().drag_to(angle) {
            self.on_value_change(change);
        }
    }

    fn handle_stats_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                self.stats_metric = Metric::ALL[c as usize - '1' as usize];
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                self.stats_metric = self.stats_metric.next().unwrap_or(Metric::Mood);
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.stats_metric = self.stats_metric.prev().unwrap_or(Metric::Focus);
            }
            KeyCode::Char('d') => {
                self.chart_range = match self.chart_range {
                    ChartRange::LastDays(_) => ChartRange::Today,
                    ChartRange::Today => ChartRange::LastDays(view::DEFAULT_CHART_DAYS),
                };
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn handle_settings_keys(&mut self, key: KeyCode) -> Result<()> {
        let count = SettingsItem::ALL.len();
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings_selected = (self.settings_selected + 1) % count;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_selected = self
                    .settings_selected
                    .checked_sub(1)
                    .unwrap_or(count - 1);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.shift_reminder_time(TIME_STEP_MINUTES),
            KeyCode::Char('-') => self.shift_reminder_time(-TIME_STEP_MINUTES),
            KeyCode::Enter | KeyCode::Char(' ') => {
                match SettingsItem::ALL[self.settings_selected] {
                    SettingsItem::Reminder => {
                        let enabled = !self.reminder_settings.enabled;
                        self.update_reminder(ReminderSettings {
                            enabled,
                            ..self.reminder_settings
                        });
                    }
                    SettingsItem::ReminderTime => {}
                    SettingsItem::Export => self.export()?,
                    SettingsItem::Import => self.import()?,
                    SettingsItem::Reset => self.confirm_reset = true,
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_reset_confirmation(&mut self, key: KeyCode) -> Result<()> {
        self.confirm_reset = false;
        if key != KeyCode::Char('y') {
            return Ok(());
        }
        self.store.reset_all().context("Could not reset data")?;
        self.reload();
        self.route_home();
        self.set_notice("All data has been deleted".to_string());
        Ok(())
    }

    fn shift_reminder_time(&mut self, minutes: i32) {
        if self.screen != Screen::Settings || !self.reminder_settings.enabled {
            return;
        }
        let time = self.reminder_settings.time.shifted(minutes);
        self.update_reminder(ReminderSettings {
            time,
            ..self.reminder_settings
        });
    }

    fn update_reminder(&mut self, requested: ReminderSettings) {
        if let Err(e) = settings::save_reminder(self.store.storage(), requested) {
            self.set_error(format!("Could not save settings: {e}"));
            return;
        }
        self.reminder_settings = apply_settings(requested, &mut self.reminder);
    }

    fn export(&mut self) -> Result<()> {
        let Some(raw) = self.store.export_raw()? else {
            self.set_error("No data to export".to_string());
            return Ok(());
        };
        let path = &self.config.export_path;
        std::fs::write(path, raw).with_context(|| format!("Failed to write {path:?}"))?;
        info!(path = %path.display(), "journal exported");
        self.set_notice(format!("Exported to {}", path.display()));
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        let path = self.config.import_path.clone();
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Place a file at {path:?} to import it"))?;
        self.store.replace_all(&raw)?;
        self.reload();
        self.route_home();
        self.set_notice(format!("Imported {} entries", self.records.len()));
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let size = frame.area();
        let (body, status) = main_chunks(size);

        match self.screen {
            Screen::Entry => self.render_entry(frame, body),
            Screen::Stats => self.render_stats(frame, body),
            Screen::Settings => self.render_settings(frame, body),
        }

        let status_bar = StatusBar::new(
            self.screen.label(),
            self.notice.as_deref(),
            self.error_message.as_deref(),
            self.reminder_due,
            &self.theme,
        );
        status_bar.render(frame, status);

        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    fn render_entry(&self, frame: &mut Frame, body: Rect) {
        let layout = entry_layout(body);
        let metric = self.entry.current();

        let date_label = NaiveDate::parse_from_str(self.entry.date(), DATE_FORMAT)
            .map(|d| d.format("%A %-d %B").to_string())
            .unwrap_or_else(|_| self.entry.date().to_string());
        EntryHeader::new(&date_label, metric, &self.theme).render(frame, layout.header);

        Dial::new(metric, self.entry.slider().value(), self.needle.angle(), &self.theme)
            .pulse(self.pulse_ticks > 0)
            .render(frame, layout.dial.outer);

        ProgressDots::new(metric, &self.theme).render(frame, layout.progress);
    }

    fn chart_records(&self) -> Vec<MoodRecord> {
        match self.chart_range {
            ChartRange::LastDays(n) => view::last_days(&self.records, n),
            ChartRange::Today => view::today_only(&self.records, &self.today),
        }
    }

    fn render_stats(&self, frame: &mut Frame, body: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(4)])
            .split(body);

        MetricTabs::new(self.stats_metric, self.chart_range, &self.theme).render(frame, chunks[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        let cells: Vec<Rect> = rows
            .iter()
            .flat_map(|row| {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(*row)
                    .to_vec()
            })
            .collect();

        let records = self.chart_records();
        for (metric, area) in Metric::ALL.iter().zip(cells) {
            let series = view::chart_series(&records, *metric);
            let summary = view::summary(&records, *metric);
            MoodChart::new(&series, summary, &self.theme).render(
                frame,
                area,
                *metric == self.stats_metric,
            );
        }
    }

    fn render_settings(&self, frame: &mut Frame, body: Rect) {
        let width = body.width.min(72);
        let area = Rect::new(
            body.x + (body.width - width) / 2,
            body.y,
            width,
            body.height.min(SettingsItem::ALL.len() as u16 + 2),
        );
        SettingsPanel::new(
            self.reminder_settings,
            self.settings_selected,
            self.confirm_reset,
            &self.theme,
        )
        .render(frame, area, true);

        let info_area = Rect::new(
            area.x,
            area.y + area.height,
            area.width,
            body.height.saturating_sub(area.height),
        );
        let info = format!(
            "Export writes {}\nImport reads {}",
            self.config.export_path.display(),
            self.config.import_path.display()
        );
        frame.render_widget(
            Paragraph::new(info).style(self.theme.dimmed_title_style()),
            info_area,
        );
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application
pub fn run(config: AppConfig, store: MoodStore) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, store, today);

    let result = run_main_loop(&mut terminal, &mut app, tick_rate);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut clock = TickClock::new(tick_rate, Instant::now());
    loop {
        let size = terminal.size()?;
        app.set_viewport(Rect::new(0, 0, size.width, size.height));
        app.refresh_clock(Local::now().naive_local());

        terminal.draw(|f| app.render(f))?;

        if event::poll(clock.timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Err(e) = app.handle_input(key.code, key.modifiers) {
                        // Log error but don't crash
                        tracing::warn!("input error: {e:#}");
                        app.set_error(format!("{e:#}"));
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Mouse motion and key repeat can keep poll busy; animations still advance
        if clock.due(Instant::now()) {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
