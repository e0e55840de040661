use std::path::PathBuf;

use clap::Subcommand;
use routine_clock_core::{Bucket, Config, Mode, ScheduleStore};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Print the active schedule
    List {
        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
    },
    /// Validate a schedule file and store it
    Set {
        /// Path to a schedule JSON file
        file: PathBuf,
    },
    /// Remove the stored schedule and go back to the built-in one
    Reset,
    /// Print where the schedule is stored
    Path,
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        ScheduleAction::List { json } => {
            let loaded = super::load_schedule(None, &config);
            super::report_source(&loaded.source);
            if json {
                println!("{}", serde_json::to_string_pretty(&loaded.schedule)?);
                return Ok(());
            }
            for bucket in [Bucket::MonFri, Bucket::Weekend] {
                for mode in [Mode::Day, Mode::Night] {
                    println!("{bucket} / {mode}");
                    for interval in loaded.schedule.segment(bucket, mode) {
                        println!(
                            "  {}-{}  {:<4} {}",
                            interval.start,
                            interval.end,
                            interval.icon.as_deref().unwrap_or(""),
                            interval.label
                        );
                    }
                }
            }
        }
        ScheduleAction::Set { file } => {
            let content = std::fs::read_to_string(&file)?;
            let schedule = ScheduleStore::parse(&content)?;
            let store = super::schedule_store(None, &config)?;
            store.save(&schedule)?;
            println!("schedule saved ({} intervals)", schedule.interval_count());
        }
        ScheduleAction::Reset => {
            let store = super::schedule_store(None, &config)?;
            if store.reset()? {
                println!("schedule reset to built-in default");
            } else {
                println!("no stored schedule");
            }
        }
        ScheduleAction::Path => {
            let store = super::schedule_store(None, &config)?;
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
