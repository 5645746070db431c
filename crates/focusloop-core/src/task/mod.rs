//! Same-day log of completed focus sessions.
//!
//! The log is ordered most-recent-first and only ever holds entries from the
//! current local calendar day: it is re-filtered on every load and after every
//! insertion. Today's total is derived from the entries each time it is asked
//! for, never kept as a separate counter.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, ValidationError};
use crate::time::is_same_local_day;

pub const TASKS_KEY: &str = "tasks";
pub const DEFAULT_PROJECT: &str = "Personal";
pub const DEFAULT_TAG: &str = "focus";

/// One completed focus session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    /// Creation time in epoch milliseconds, bumped when needed to stay unique.
    pub id: i64,
    pub title: String,
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_tags")]
    pub tags: BTreeSet<String>,
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_tags() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_TAG.to_string()])
}

impl CompletedTask {
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskLog {
    tasks: Vec<CompletedTask>,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, most recent first.
    pub fn tasks(&self) -> &[CompletedTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Log a completed focus session.
    ///
    /// # Errors
    /// Rejects a blank title or a zero duration; the log is left unchanged.
    pub fn record_completion(
        &mut self,
        title: &str,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<&CompletedTask, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration_minutes".into(),
                message: "must be greater than zero".into(),
            });
        }

        let mut id = now.timestamp_millis();
        if let Some(max) = self.tasks.iter().map(|t| t.id).max() {
            if id <= max {
                id = max + 1;
            }
        }

        self.tasks.insert(
            0,
            CompletedTask {
                id,
                title: title.to_string(),
                duration_minutes,
                completed_at: now,
                project: default_project(),
                tags: default_tags(),
            },
        );
        self.prune_to_day(now);
        tracing::info!(id, title, duration_minutes, "task logged");
        Ok(&self.tasks[0])
    }

    /// Drop every entry that is not on the same local day as `now`.
    pub fn prune_to_day(&mut self, now: DateTime<Utc>) {
        let before = self.tasks.len();
        self.tasks.retain(|t| is_same_local_day(&t.completed_at, &now));
        let dropped = before - self.tasks.len();
        if dropped > 0 {
            tracing::debug!(dropped, "pruned tasks from other days");
        }
    }

    /// Time spent today, summed from the entries.
    pub fn today_total_seconds(&self) -> u64 {
        self.tasks.iter().map(CompletedTask::duration_secs).sum()
    }

    /// Decode the stored `tasks` record and keep only today's entries.
    ///
    /// Entries that violate the log's invariants (blank title, zero duration)
    /// are skipped.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Corrupt`] if the record is not a task array.
    pub fn from_bytes(bytes: &[u8], now: DateTime<Utc>) -> Result<Self, PersistenceError> {
        let tasks: Vec<CompletedTask> =
            serde_json::from_slice(bytes).map_err(|source| PersistenceError::Corrupt {
                key: TASKS_KEY.to_string(),
                source,
            })?;
        let before = tasks.len();
        let mut tasks: Vec<CompletedTask> = tasks
            .into_iter()
            .filter(|t| !t.title.trim().is_empty() && t.duration_minutes > 0)
            .collect();
        if tasks.len() != before {
            tracing::warn!(skipped = before - tasks.len(), "skipped invalid task entries");
        }
        tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        let mut log = Self { tasks };
        log.prune_to_day(now);
        Ok(log)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(&self.tasks)?)
    }
}
