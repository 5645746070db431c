//! # focusloop Core Library
//!
//! Session state machine and time accounting for a focus/break countdown
//! timer. The CLI binary is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Session Clock**: second-granularity countdown driven by a cancellable
//!   repeating tick source; the caller delivers ticks
//! - **Session Scheduler**: focus → short break → focus …, with a long break
//!   after every fourth focus session
//! - **Task Log**: completed focus sessions for the current local day
//! - **Persistence Reconciler**: resumes, refreshes or discards the stored
//!   snapshot depending on how long the app was closed
//! - **Storage**: SQLite key-value records and TOML configuration
//!
//! ## Key Components
//!
//! - [`Controller`]: single owner of all state; every operation goes through it
//! - [`TimerState`]: the plain-data state the clock and scheduler mutate
//! - [`Settings`]: clamped user durations
//! - [`Storage`]: key-value persistence trait

pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod notify;
pub mod persistence;
pub mod settings;
pub mod storage;
pub mod task;
pub mod time;
pub mod timer;

pub use controller::{Collaborators, Controller, ControllerOptions};
pub use display::{format_clock, DisplayState};
pub use error::{ConfigError, CoreError, NotifyError, PersistenceError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, RecordingNotifier, SilentNotifier};
pub use persistence::{reconcile, PersistedSnapshot, Reconciliation};
pub use settings::Settings;
pub use storage::{Config, MemoryStore, SqliteStore, Storage};
pub use task::{CompletedTask, TaskLog};
pub use time::{is_same_local_day, ManualClock, SystemClock, WallClock};
pub use timer::{
    IntervalTicker, ManualTicker, SessionClock, SessionType, Tick, TickSource, TimerState,
};
