use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::timer::{SessionType, TimerState};

pub const TIMER_STATE_KEY: &str = "timerState";

/// The stored `timerState` record.
///
/// Carries every [`TimerState`] field except `is_running`, plus the save time.
/// `today_total_seconds` is informational for other readers; the controller
/// always recomputes it from the task log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub remaining_seconds: u32,
    pub cycle_count: u32,
    pub session_type: SessionType,
    pub completed_focus_count: u32,
    pub total_focus_minutes: u32,
    #[serde(default)]
    pub today_total_seconds: u64,
    #[serde(default)]
    pub current_task_label: String,
    /// Save time in epoch milliseconds.
    pub timestamp: i64,
}

impl PersistedSnapshot {
    pub fn capture(state: &TimerState, today_total_seconds: u64, now: DateTime<Utc>) -> Self {
        Self {
            remaining_seconds: state.remaining_seconds,
            cycle_count: state.cycle_count,
            session_type: state.session_type,
            completed_focus_count: state.completed_focus_count,
            total_focus_minutes: state.total_focus_minutes,
            today_total_seconds,
            current_task_label: state.current_task_label.clone(),
            timestamp: now.timestamp_millis(),
        }
    }

    /// Decode and validate a stored record.
    ///
    /// # Errors
    /// [`PersistenceError::Corrupt`] if the bytes do not parse,
    /// [`PersistenceError::Invalid`] if a field breaks a timer invariant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let snapshot: PersistedSnapshot =
            serde_json::from_slice(bytes).map_err(|source| PersistenceError::Corrupt {
                key: TIMER_STATE_KEY.to_string(),
                source,
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn validate(&self) -> Result<(), PersistenceError> {
        if self.cycle_count == 0 {
            return Err(PersistenceError::Invalid {
                key: TIMER_STATE_KEY.to_string(),
                message: "cycleCount must be at least 1".into(),
            });
        }
        Ok(())
    }
}
