//! Display-ready values for the presentation layer.
//!
//! Everything here is derived; nothing in this module mutates timer state.

use serde::Serialize;

use crate::settings::Settings;
use crate::task::{CompletedTask, TaskLog};
use crate::timer::{SessionType, TimerState};

pub const READY_TEXT: &str = "Ready?";
pub const RUNNING_TEXT: &str = "Running...";

/// Format seconds as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub project: String,
    pub tags: Vec<String>,
    pub duration: String,
}

impl From<&CompletedTask> for TaskRow {
    fn from(task: &CompletedTask) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            project: task.project.clone(),
            tags: task.tags.iter().cloned().collect(),
            duration: format_clock(task.duration_secs()),
        }
    }
}

/// Snapshot of everything a view needs, recomputed after each state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub remaining: String,
    pub remaining_seconds: u32,
    pub session_type: SessionType,
    pub session_label: &'static str,
    /// 0.0 .. 1.0 elapsed fraction of the current session.
    pub progress: f64,
    pub status: &'static str,
    pub is_running: bool,
    pub cycle_count: u32,
    pub completed_focus_count: u32,
    pub total_focus_minutes: u32,
    pub current_task_label: String,
    pub today_total: String,
    pub today_total_seconds: u64,
    pub tasks: Vec<TaskRow>,
}

impl DisplayState {
    pub fn build(state: &TimerState, settings: &Settings, log: &TaskLog) -> Self {
        let today_total_seconds = log.today_total_seconds();
        Self {
            remaining: format_clock(u64::from(state.remaining_seconds)),
            remaining_seconds: state.remaining_seconds,
            session_type: state.session_type,
            session_label: state.session_type.label(),
            progress: state.progress(settings),
            status: if state.is_running { RUNNING_TEXT } else { READY_TEXT },
            is_running: state.is_running,
            cycle_count: state.cycle_count,
            completed_focus_count: state.completed_focus_count,
            total_focus_minutes: state.total_focus_minutes,
            current_task_label: state.current_task_label.clone(),
            today_total: format_clock(today_total_seconds),
            today_total_seconds,
            tasks: log.tasks().iter().map(TaskRow::from).collect(),
        }
    }

    /// One-line status for terminals, e.g. `Focus 24:59 [#1] Write report`.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{} {} [#{}] {}",
            self.session_label, self.remaining, self.cycle_count, self.status
        );
        if !self.current_task_label.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.current_task_label);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn clock_format_switches_to_hours() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3 * 3600 + 5 * 60 + 7), "3:05:07");
    }

    #[test]
    fn display_reflects_state() {
        let settings = Settings::default();
        let mut state = TimerState::initial(&settings);
        state.remaining_seconds = 1200;
        state.current_task_label = "Write".into();
        let mut log = TaskLog::new();
        log.record_completion("Earlier", 25, Utc::now()).unwrap();

        let view = DisplayState::build(&state, &settings, &log);
        assert_eq!(view.remaining, "20:00");
        assert_eq!(view.session_label, "Focus");
        assert_eq!(view.status, READY_TEXT);
        assert!((view.progress - 0.2).abs() < 1e-9);
        assert_eq!(view.today_total, "25:00");
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].tags, vec!["focus".to_string()]);
        assert_eq!(view.status_line(), "Focus 20:00 [#1] Ready? - Write");
    }
}
