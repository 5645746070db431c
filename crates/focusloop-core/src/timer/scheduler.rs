//! Session scheduler.
//!
//! Decides what follows a completed session. Every fourth focus session is
//! followed by a long break; `cycle_count` is the index of the focus session
//! and advances when a break ends.

use super::session::SessionType;
use super::state::TimerState;
use crate::settings::Settings;

/// Number of focus sessions per long-break cycle.
pub const SESSIONS_PER_CYCLE: u32 = 4;

/// Title logged for a focus session that had no task label.
pub const DEFAULT_TASK_TITLE: &str = "Focus session";

/// Work credited by a completed focus session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCompletion {
    pub title: String,
    pub duration_min: u32,
}

/// Result of handing a completed session to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub completed: SessionType,
    pub next: SessionType,
    pub cycle_count: u32,
    /// Present only when a focus session ended.
    pub focus: Option<FocusCompletion>,
}

/// Which session follows `completed` at the given cycle index.
pub fn next_session(completed: SessionType, cycle_count: u32) -> SessionType {
    match completed {
        SessionType::Focus if cycle_count % SESSIONS_PER_CYCLE == 0 => SessionType::LongBreak,
        SessionType::Focus => SessionType::ShortBreak,
        SessionType::ShortBreak | SessionType::LongBreak => SessionType::Focus,
    }
}

/// Apply the completion of `state.session_type` and arm the next session.
///
/// The next session is left paused; whether it starts on its own is the
/// caller's decision.
pub fn on_session_complete(state: &mut TimerState, settings: &Settings) -> Transition {
    let completed = state.session_type;
    let focus = match completed {
        SessionType::Focus => {
            state.completed_focus_count = state.completed_focus_count.saturating_add(1);
            state.total_focus_minutes =
                state.total_focus_minutes.saturating_add(settings.focus_minutes);
            let label = state.current_task_label.trim();
            Some(FocusCompletion {
                title: if label.is_empty() {
                    DEFAULT_TASK_TITLE.to_string()
                } else {
                    label.to_string()
                },
                duration_min: settings.focus_minutes,
            })
        }
        SessionType::ShortBreak | SessionType::LongBreak => {
            state.cycle_count = state.cycle_count.saturating_add(1);
            None
        }
    };

    let next = next_session(completed, state.cycle_count);
    state.arm(next, settings);
    tracing::debug!(?completed, ?next, cycle = state.cycle_count, "session transition");

    Transition {
        completed,
        next,
        cycle_count: state.cycle_count,
        focus,
    }
}
