use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "routine-clock", version, about = "Routine Clock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the clock, ticking once a second
    Run(commands::run::RunArgs),
    /// Print the resolved clock state as JSON
    Status(commands::status::StatusArgs),
    /// Render the dial to SVG
    Render(commands::render::RenderArgs),
    /// Schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    // Logs go to stderr so JSON and SVG on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("routine_clock_core=info,routine_clock=info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
