//! Command-line interface argument parsing for moodline.
//!
//! - `moodline` or `moodline journal` opens the terminal journal
//! - `moodline export --output backup.json`
//! - `moodline import backup.json`
//! - `moodline reminder --enable --at 21:30`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::{Metric, TimeOfDay};

/// A terminal mood journal: log four metrics a day on a dial and review them as charts.
#[derive(Parser, Debug)]
#[command(name = "moodline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the journal database and log file.
    /// Defaults to $MOODLINE_DIR, then the platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the terminal journal (default)
    Journal,

    /// Record an entry without opening the journal (values from 0 to 1)
    Log {
        #[arg(long, default_value = "0.5", value_parser = parse_unit)]
        mood: f64,

        #[arg(long, default_value = "0.5", value_parser = parse_unit)]
        energy: f64,

        #[arg(long, default_value = "0.5", value_parser = parse_unit)]
        anxiety: f64,

        #[arg(long, default_value = "0.5", value_parser = parse_unit)]
        focus: f64,

        /// Day to record (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Keep earlier entries for the same day instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Print the stored journal verbatim, or write it to a file
    Export {
        /// File to write instead of printing to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the whole journal with the contents of a JSON file
    Import {
        /// JSON array of entries, as produced by `export`
        path: PathBuf,
    },

    /// Delete every journal entry
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show or change the daily reminder
    Reminder(ReminderArgs),

    /// Print recent entries as text
    Stats {
        /// Only show this metric (mood, energy, anxiety, focus)
        #[arg(short, long)]
        metric: Option<Metric>,

        /// Number of most recent days to show
        #[arg(short, long, default_value = "7")]
        days: usize,
    },
}

#[derive(Args, Debug)]
pub struct ReminderArgs {
    /// Turn the daily reminder on
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Turn the daily reminder off
    #[arg(long)]
    pub disable: bool,

    /// Reminder time as HH:MM (local time)
    #[arg(long)]
    pub at: Option<TimeOfDay>,
}

fn parse_unit(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside 0..1"))
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    /// File the settings screen exports to
    pub export_path: PathBuf,
    /// File the settings screen imports from
    pub import_path: PathBuf,
    pub tick_rate_ms: u64,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir(std::env::var("MOODLINE_DIR").ok()));

        AppConfig {
            db_path: data_dir.join("moodline.db"),
            log_path: data_dir.join("moodline.log"),
            export_path: data_dir.join("moodline-export.json"),
            import_path: data_dir.join("moodline-import.json"),
            data_dir,
            tick_rate_ms: 100,
            verbose: cli.verbose,
        }
    }
}

fn default_data_dir(env_dir: Option<String>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("moodline"))
        .unwrap_or_else(|| PathBuf::from(".moodline"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_journal() {
        let cli = Cli::try_parse_from(["moodline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_explicit_data_dir() {
        let cli = Cli::try_parse_from(["moodline", "--data-dir", "/tmp/mood", "stats"]).unwrap();
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.db_path, PathBuf::from("/tmp/mood/moodline.db"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/mood/moodline.log"));
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_env_dir_wins_over_platform_default() {
        assert_eq!(
            default_data_dir(Some("/srv/moods".to_string())),
            PathBuf::from("/srv/moods")
        );
        assert!(default_data_dir(Some(String::new()))
            .to_string_lossy()
            .ends_with("moodline"));
    }

    #[test]
    fn test_reminder_args() {
        let cli = Cli::try_parse_from(["moodline", "reminder", "--enable", "--at", "07:30"]).unwrap();
        match cli.command {
            Some(Commands::Reminder(args)) => {
                assert!(args.enable);
                assert_eq!(args.at, TimeOfDay::new(7, 30));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["moodline", "reminder", "--enable", "--disable"]).is_err());
        assert!(Cli::try_parse_from(["moodline", "reminder", "--at", "25:00"]).is_err());
    }

    #[test]
    fn test_log_values_are_range_checked() {
        let cli = Cli::try_parse_from([
            "moodline", "log", "--mood", "0.75", "--date", "2024-01-02", "--append",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Log { mood, energy, date, append, .. }) => {
                assert_eq!(mood, 0.75);
                assert_eq!(energy, 0.5);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2));
                assert!(append);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["moodline", "log", "--focus", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["moodline", "log", "--date", "02/01/2024"]).is_err());
    }

    #[test]
    fn test_stats_metric_parses() {
        let cli = Cli::try_parse_from(["moodline", "stats", "-m", "anxiety", "-d", "3"]).unwrap();
        match cli.command {
            Some(Commands::Stats { metric, days }) => {
                assert_eq!(metric, Some(Metric::Anxiety));
                assert_eq!(days, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
