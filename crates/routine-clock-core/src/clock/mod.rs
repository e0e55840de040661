mod engine;
mod runner;

pub use engine::{ClockEngine, EngineSettings, RenderState, Snapshot, TickOutcome};
pub use runner::{FixedClock, LocalClock, Presenter, Runner, RunnerOptions, TimeSource};
