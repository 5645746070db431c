use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::CompletedTask;
use crate::timer::SessionType;

/// Every state change in the controller produces an Event.
/// The CLI prints them; a GUI would re-render on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_type: SessionType,
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    TaskLogged {
        task: CompletedTask,
        today_total_seconds: u64,
    },
    SessionAdvanced {
        session_type: SessionType,
        cycle_count: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        sound_enabled: bool,
        /// Whether the paused countdown was refilled with the new duration.
        countdown_resized: bool,
        at: DateTime<Utc>,
    },
    TaskLabelChanged {
        label: String,
        at: DateTime<Utc>,
    },
    /// Produced once at startup with the outcome of reconciliation.
    StateRestored {
        outcome: String,
        session_type: SessionType,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// Explicit user reset of every counter.
    CountersReset {
        at: DateTime<Utc>,
    },
}
