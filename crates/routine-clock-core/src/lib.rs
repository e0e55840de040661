//! # Routine Clock Core Library
//!
//! This library provides the core logic for a 24-hour routine clock: a dial
//! that highlights the scheduled activity and announces transitions. The CLI
//! binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Schedule**: Two buckets (weekdays, weekend) of day and night interval
//!   lists, with a built-in default routine
//! - **Resolver**: Maps wall-clock time onto mode, bucket and active interval
//! - **Dial**: Pure geometry producing sectors, icons, hands and SVG
//! - **Clock Engine**: A caller-driven state machine; the caller invokes
//!   `tick()` once a second and receives events plus an optional new frame
//! - **Effects**: Tone, speech and pulse sinks driven by engine events
//! - **Storage**: TOML configuration and JSON schedule persistence
//!
//! ## Key Components
//!
//! - [`ClockEngine`]: Core update-loop state machine
//! - [`Runner`]: One-second cadence wiring the engine to sinks
//! - [`Schedule`]: The routine being displayed
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod dial;
pub mod effects;
pub mod error;
pub mod events;
pub mod resolver;
pub mod schedule;
pub mod storage;

pub use clock::{ClockEngine, EngineSettings, RenderState, Runner, RunnerOptions, Snapshot, TickOutcome};
pub use dial::{DialFrame, Hands, Primitive};
pub use effects::{Effects, SpeechSink, Tone, ToneSink, PulseSink};
pub use error::{ConfigError, CoreError, EffectError, ScheduleError};
pub use events::{Event, RedrawReason};
pub use resolver::{ClockReading, DayWindow, Summary};
pub use schedule::{Bucket, Interval, Mode, Schedule, TimeOfDay};
pub use storage::{Config, LoadedSchedule, ScheduleSource, ScheduleStore};
