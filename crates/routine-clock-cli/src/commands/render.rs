use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use routine_clock_core::dial::svg;
use routine_clock_core::{ClockEngine, Config};

#[derive(Args)]
pub struct RenderArgs {
    /// Render at this local time instead of now
    #[arg(long, value_parser = super::parse_at)]
    at: Option<NaiveDateTime>,
    /// Schedule file to use instead of the stored one
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Write the SVG here instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,
    /// Print the primitives as JSON instead of SVG
    #[arg(long)]
    json: bool,
}

pub fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let loaded = super::load_schedule(args.schedule, &config);
    super::report_source(&loaded.source);
    let mut engine = ClockEngine::with_settings(loaded.schedule, config.engine_settings());

    // A fresh engine always rebuilds the dial on its first tick.
    let outcome = engine.tick(super::now_or(args.at));
    let frame = outcome.frame.as_ref().ok_or("engine produced no frame")?;

    let rendered = if args.json {
        serde_json::to_string_pretty(frame)?
    } else {
        svg::document(frame, &outcome.hands, &outcome.summary, outcome.pulse_active)
    };

    match args.out {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            println!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
