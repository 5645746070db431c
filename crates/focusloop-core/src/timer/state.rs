use serde::{Deserialize, Serialize};

use super::session::SessionType;
use crate::settings::Settings;

/// Everything the clock and scheduler mutate.
///
/// Plain data: the transition functions in [`super::clock`] and
/// [`super::scheduler`] take it by `&mut`, and the controller is its only
/// owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub session_type: SessionType,
    /// Index of the current focus session, starting at 1.
    pub cycle_count: u32,
    pub completed_focus_count: u32,
    pub total_focus_minutes: u32,
    pub current_task_label: String,
}

impl TimerState {
    /// A ready focus session with all counters cleared.
    pub fn initial(settings: &Settings) -> Self {
        Self {
            remaining_seconds: SessionType::Focus.duration_secs(settings),
            is_running: false,
            session_type: SessionType::Focus,
            cycle_count: 1,
            completed_focus_count: 0,
            total_focus_minutes: 0,
            current_task_label: String::new(),
        }
    }

    /// Full length of the current session in seconds.
    pub fn total_seconds(&self, settings: &Settings) -> u32 {
        self.session_type.duration_secs(settings)
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self, settings: &Settings) -> f64 {
        let total = self.total_seconds(settings);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_seconds);
        (f64::from(elapsed) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Re-arm the countdown for `session_type` in the paused state.
    pub(crate) fn arm(&mut self, session_type: SessionType, settings: &Settings) {
        self.session_type = session_type;
        self.remaining_seconds = session_type.duration_secs(settings);
        self.is_running = false;
    }
}
