//! moodline: a terminal mood journal.
//!
//! Log mood, energy, anxiety and focus once a day on a half-turn dial, then
//! review them as per-metric charts. Everything stays in a local database.

mod app;
mod cli;
mod data;
mod input;
mod logging;
mod reminder;
mod ui;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use cli::{AppConfig, Cli, Commands, ReminderArgs};
use data::{
    settings, view, Metric, MetricValues, MoodRecord, MoodStore, ReminderSettings, Storage,
    DATE_FORMAT,
};

fn open_store(config: &AppConfig) -> Result<MoodStore> {
    let storage = Storage::open(&config.db_path)
        .with_context(|| format!("Failed to open journal in {:?}", config.data_dir))?;
    Ok(MoodStore::new(storage))
}

/// Store for the one-shot commands, which log to stderr
fn command_store(config: &AppConfig) -> Result<MoodStore> {
    logging::init_stderr(config.verbose);
    open_store(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Journal) {
        Commands::Journal => {
            logging::init_file(&config.log_path, config.verbose)?;
            let store = open_store(&config)?;
            app::run(config, store)
        }
        Commands::Log {
            mood,
            energy,
            anxiety,
            focus,
            date,
            append,
        } => {
            let values = MetricValues {
                mood,
                energy,
                anxiety,
                focus,
            };
            cmd_log(&command_store(&config)?, values, date, append)
        }
        Commands::Export { output } => cmd_export(&command_store(&config)?, output.as_deref()),
        Commands::Import { path } => cmd_import(&command_store(&config)?, &path),
        Commands::Reset { yes } => cmd_reset(&command_store(&config)?, yes),
        Commands::Reminder(args) => cmd_reminder(&command_store(&config)?, &args),
        Commands::Stats { metric, days } => cmd_stats(&command_store(&config)?, metric, days),
    }
}

fn cmd_log(
    store: &MoodStore,
    values: MetricValues,
    date: Option<NaiveDate>,
    append: bool,
) -> Result<()> {
    let date = date
        .unwrap_or_else(|| Local::now().date_naive())
        .format(DATE_FORMAT)
        .to_string();
    let record = MoodRecord::new(date.clone(), values);
    if append {
        store.append_record(record)?;
    } else {
        store.upsert_record(record)?;
    }
    eprintln!("Logged entry for {date}");
    Ok(())
}

fn cmd_export(store: &MoodStore, output: Option<&Path>) -> Result<()> {
    let Some(raw) = store.export_raw()? else {
        bail!("No data to export");
    };
    match output {
        Some(path) => {
            std::fs::write(path, raw).with_context(|| format!("Failed to write {path:?}"))?;
            eprintln!("Exported journal to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(raw.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_import(store: &MoodStore, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
    store
        .replace_all(&raw)
        .with_context(|| format!("The file {path:?} is not a valid journal"))?;
    eprintln!("Imported {} entries", store.load_all().len());
    Ok(())
}

fn cmd_reset(store: &MoodStore, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes every entry and cannot be undone; re-run with --yes to confirm");
    }
    store.reset_all()?;
    eprintln!("All data has been deleted");
    Ok(())
}

fn cmd_reminder(store: &MoodStore, args: &ReminderArgs) -> Result<()> {
    let current = settings::load_reminder(store.storage());
    let enabled = if args.enable {
        true
    } else if args.disable {
        false
    } else {
        current.enabled
    };
    let updated = ReminderSettings {
        enabled,
        time: args.at.unwrap_or(current.time),
    };

    if updated != current {
        settings::save_reminder(store.storage(), updated)?;
    }
    println!(
        "Daily reminder: {} at {}",
        if updated.enabled { "on" } else { "off" },
        updated.time
    );
    Ok(())
}

fn cmd_stats(store: &MoodStore, metric: Option<Metric>, days: usize) -> Result<()> {
    let records = view::last_days(&store.load_all(), days);
    if records.is_empty() {
        println!("No entries yet");
        return Ok(());
    }

    let metrics: Vec<Metric> = match metric {
        Some(m) => vec![m],
        None => Metric::ALL.to_vec(),
    };

    let header: Vec<String> = metrics.iter().map(|m| format!("{:>8}", m.key())).collect();
    println!("{:<12}{}", "date", header.join(""));
    for record in &records {
        let cells: Vec<String> = metrics
            .iter()
            .map(|m| format!("{:>7.0}%", record.value(*m) * 100.0))
            .collect();
        println!("{:<12}{}", record.date, cells.join(""));
    }

    let averages: Vec<String> = metrics
        .iter()
        .map(|m| match view::summary(&records, *m) {
            Some(s) => format!("{:>7.0}%", s.average),
            None => format!("{:>8}", "-"),
        })
        .collect();
    println!("{:<12}{}", "average", averages.join(""));
    Ok(())
}
