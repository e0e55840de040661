use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use routine_clock_core::{ClockEngine, Config};

#[derive(Args)]
pub struct StatusArgs {
    /// Resolve at this local time instead of now
    #[arg(long, value_parser = super::parse_at)]
    at: Option<NaiveDateTime>,
    /// Schedule file to use instead of the stored one
    #[arg(long)]
    schedule: Option<PathBuf>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let loaded = super::load_schedule(args.schedule, &config);
    super::report_source(&loaded.source);
    let engine = ClockEngine::with_settings(loaded.schedule, config.engine_settings());

    let snapshot = engine.snapshot(super::now_or(args.at));
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
