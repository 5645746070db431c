//! Startup reconciliation of a persisted snapshot against wall-clock time.
//!
//! ```text
//! no record / bad record / age >= 1h  -> Stale
//! saved - age > 0                     -> Resumable
//! saved - age == 0                    -> Fresh (session refilled, not advanced)
//! ```
//!
//! The restored state is always paused. A session that ran out while the app
//! was closed is presented as ready again rather than completed: completion
//! side effects such as logging a task cannot be replayed without the context
//! they happened in.

use chrono::{DateTime, Utc};

use super::snapshot::PersistedSnapshot;
use crate::error::PersistenceError;
use crate::settings::Settings;
use crate::timer::TimerState;

/// Snapshots this old or older are discarded.
pub const STALE_AFTER_SECS: i64 = 3600;

#[derive(Debug)]
pub enum StaleReason {
    Missing,
    Expired { age_secs: i64 },
    Invalid(PersistenceError),
}

#[derive(Debug)]
pub enum Reconciliation {
    /// Countdown resumes where it left off, minus the time away.
    Resumable(TimerState),
    /// Countdown ran out while away; the same session is ready again.
    Fresh(TimerState),
    /// Nothing trustworthy was stored; the caller resets to defaults.
    Stale(StaleReason),
}

impl Reconciliation {
    pub fn label(&self) -> &'static str {
        match self {
            Reconciliation::Resumable(_) => "resumable",
            Reconciliation::Fresh(_) => "fresh",
            Reconciliation::Stale(_) => "stale",
        }
    }
}

/// Whole seconds elapsed since `snapshot` was written.
///
/// Timestamps from the future count as zero elapsed time.
pub fn snapshot_age_secs(snapshot: &PersistedSnapshot, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = now.timestamp_millis().saturating_sub(snapshot.timestamp);
    elapsed_ms.max(0).div_euclid(1000)
}

/// Decide what to do with the stored `timerState` record.
pub fn reconcile(raw: Option<&[u8]>, now: DateTime<Utc>, settings: &Settings) -> Reconciliation {
    let Some(bytes) = raw else {
        return Reconciliation::Stale(StaleReason::Missing);
    };
    let snapshot = match PersistedSnapshot::from_bytes(bytes) {
        Ok(snapshot) => snapshot,
        Err(err) => return Reconciliation::Stale(StaleReason::Invalid(err)),
    };

    let age_secs = snapshot_age_secs(&snapshot, now);
    if age_secs >= STALE_AFTER_SECS {
        return Reconciliation::Stale(StaleReason::Expired { age_secs });
    }

    let age = u32::try_from(age_secs).unwrap_or(u32::MAX);
    let remaining = snapshot.remaining_seconds.saturating_sub(age);
    let mut state = TimerState {
        remaining_seconds: remaining,
        is_running: false,
        session_type: snapshot.session_type,
        cycle_count: snapshot.cycle_count,
        completed_focus_count: snapshot.completed_focus_count,
        total_focus_minutes: snapshot.total_focus_minutes,
        current_task_label: snapshot.current_task_label,
    };

    if remaining == 0 {
        state.remaining_seconds = state.session_type.duration_secs(settings);
        Reconciliation::Fresh(state)
    } else {
        Reconciliation::Resumable(state)
    }
}
