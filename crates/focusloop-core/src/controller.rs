//! The single owner of all timer state.
//!
//! `Controller` holds the settings, the timer state, the task log and the
//! session clock, together with the external collaborators (storage, wall
//! clock, tick source, notifier). Every operation is synchronous and returns
//! the events it produced; persistence writes are fire-and-forget.
//!
//! ## Usage
//!
//! ```ignore
//! let (mut ctl, restored) = Controller::load(collaborators, options);
//! ctl.start();
//! // For every tick delivered by the tick source:
//! let events = ctl.handle_tick(tick);
//! // On shutdown:
//! ctl.teardown();
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::display::DisplayState;
use crate::error::{PersistenceError, ValidationError};
use crate::events::Event;
use crate::notify::Notifier;
use crate::persistence::{
    reconcile, PersistedSnapshot, Reconciliation, StaleReason, TIMER_STATE_KEY,
};
use crate::settings::{Settings, SETTINGS_KEY};
use crate::storage::{Config, Storage};
use crate::task::{TaskLog, TASKS_KEY};
use crate::time::WallClock;
use crate::timer::{
    on_session_complete, SessionClock, SessionType, Tick, TickOutcome, TickSource, TimerState,
};

/// External collaborators the controller drives.
pub struct Collaborators {
    pub storage: Box<dyn Storage>,
    pub wall_clock: Box<dyn WallClock>,
    pub tick_source: Box<dyn TickSource>,
    pub notifier: Box<dyn Notifier>,
}

/// Ambient knobs, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Settings used when no valid `settings` record is stored.
    pub defaults: Settings,
    pub tick_interval: Duration,
    /// Start the next session as soon as one completes.
    pub auto_start: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            defaults: Settings::default(),
            tick_interval: Duration::from_secs(1),
            auto_start: false,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            defaults: config.default_settings(),
            tick_interval: config.tick_interval(),
            auto_start: config.clock.auto_start,
        }
    }
}

pub struct Controller {
    settings: Settings,
    defaults: Settings,
    state: TimerState,
    log: TaskLog,
    clock: SessionClock,
    auto_start: bool,
    storage: Box<dyn Storage>,
    wall_clock: Box<dyn WallClock>,
    tick_source: Box<dyn TickSource>,
    notifier: Box<dyn Notifier>,
}

impl Controller {
    /// Restore settings, the task log and the timer state from storage.
    ///
    /// Never fails: unreadable records fall back to defaults, an empty log,
    /// or a fresh focus session. The returned event describes which path
    /// was taken.
    pub fn load(collaborators: Collaborators, options: ControllerOptions) -> (Self, Event) {
        let Collaborators {
            storage,
            wall_clock,
            tick_source,
            notifier,
        } = collaborators;
        let now = wall_clock.now();

        let settings = match read(storage.as_ref(), SETTINGS_KEY) {
            Some(bytes) => Settings::from_bytes(&bytes, &options.defaults).unwrap_or_else(|err| {
                tracing::warn!(%err, "discarding stored settings");
                options.defaults.clone()
            }),
            None => options.defaults.clone(),
        };

        let log = match read(storage.as_ref(), TASKS_KEY) {
            Some(bytes) => TaskLog::from_bytes(&bytes, now).unwrap_or_else(|err| {
                tracing::warn!(%err, "discarding stored task log");
                TaskLog::new()
            }),
            None => TaskLog::new(),
        };

        let raw_state = read(storage.as_ref(), TIMER_STATE_KEY);
        let outcome = reconcile(raw_state.as_deref(), now, &settings);
        let label = outcome.label();
        let state = match outcome {
            Reconciliation::Resumable(state) | Reconciliation::Fresh(state) => state,
            Reconciliation::Stale(reason) => {
                match &reason {
                    StaleReason::Invalid(err) => {
                        tracing::warn!(%err, "discarding stored timer state")
                    }
                    StaleReason::Expired { age_secs } => {
                        tracing::info!(age_secs, "stored timer state is stale")
                    }
                    StaleReason::Missing => {}
                }
                TimerState::initial(&settings)
            }
        };
        tracing::info!(
            outcome = label,
            session = ?state.session_type,
            remaining = state.remaining_seconds,
            cycle = state.cycle_count,
            "timer state restored"
        );

        let event = Event::StateRestored {
            outcome: label.to_string(),
            session_type: state.session_type,
            remaining_seconds: state.remaining_seconds,
            at: now,
        };
        let controller = Self {
            settings,
            defaults: options.defaults,
            state,
            log,
            clock: SessionClock::new(options.tick_interval),
            auto_start: options.auto_start,
            storage,
            wall_clock,
            tick_source,
            notifier,
        };
        (controller, event)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn log(&self) -> &TaskLog {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn today_total_seconds(&self) -> u64 {
        self.log.today_total_seconds()
    }

    pub fn display(&self) -> DisplayState {
        DisplayState::build(&self.state, &self.settings, &self.log)
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::capture(&self.state, self.log.today_total_seconds(), self.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or restart) the countdown of the current session.
    pub fn start(&mut self) -> Event {
        self.clock.start(&mut self.state, self.tick_source.as_mut());
        self.persist_state();
        Event::TimerStarted {
            session_type: self.state.session_type,
            remaining_seconds: self.state.remaining_seconds,
            at: self.now(),
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.clock.pause(&mut self.state);
        self.persist_state();
        Some(Event::TimerPaused {
            remaining_seconds: self.state.remaining_seconds,
            at: self.now(),
        })
    }

    pub fn toggle(&mut self) -> Event {
        match self.pause() {
            Some(event) => event,
            None => self.start(),
        }
    }

    /// Refill the current session and pause.
    pub fn reset(&mut self) -> Event {
        self.clock.reset(&mut self.state, &self.settings);
        self.persist_state();
        Event::TimerReset {
            session_type: self.state.session_type,
            remaining_seconds: self.state.remaining_seconds,
            at: self.now(),
        }
    }

    /// Set the label credited when the current focus session completes.
    pub fn set_task_label(&mut self, label: &str) -> Event {
        self.state.current_task_label = label.trim().to_string();
        self.persist_state();
        Event::TaskLabelChanged {
            label: self.state.current_task_label.clone(),
            at: self.now(),
        }
    }

    /// Label the session with `label` and start it.
    ///
    /// # Errors
    /// Rejects a blank label without touching the timer.
    pub fn start_task(&mut self, label: &str) -> Result<Vec<Event>, ValidationError> {
        if label.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(vec![self.set_task_label(label), self.start()])
    }

    /// Clear every counter and return to a ready first focus session.
    ///
    /// The only way the lifetime counters are ever reset. Today's task log
    /// is left alone.
    pub fn reset_counters(&mut self) -> Event {
        self.clock.pause(&mut self.state);
        self.state = TimerState::initial(&self.settings);
        self.persist_state();
        tracing::info!("counters reset");
        Event::CountersReset { at: self.now() }
    }

    /// Apply new durations, clamped into range.
    ///
    /// A paused focus or short-break countdown is refilled with the new
    /// duration; a running countdown, or a long break, keeps its time.
    pub fn update_settings(
        &mut self,
        focus_minutes: i64,
        break_minutes: i64,
        sound_enabled: bool,
    ) -> Event {
        let changed = self.settings.update(focus_minutes, break_minutes, sound_enabled);
        if changed {
            self.persist_settings();
        }
        let resized = self.resize_paused(&[SessionType::Focus, SessionType::ShortBreak]);
        tracing::info!(
            focus = self.settings.focus_minutes,
            short_break = self.settings.short_break_minutes,
            sound = self.settings.sound_enabled,
            changed,
            resized,
            "settings updated"
        );
        self.settings_event(resized)
    }

    /// Set the long-break length. Zero falls back to the configured default,
    /// anything else is clamped to 1..=60. A paused long break is refilled.
    pub fn set_long_break_minutes(&mut self, minutes: u32) -> Event {
        self.settings.long_break_minutes = Settings {
            long_break_minutes: minutes,
            ..self.settings.clone()
        }
        .sanitized(&self.defaults)
        .long_break_minutes;
        self.persist_settings();
        let resized = self.resize_paused(&[SessionType::LongBreak]);
        tracing::info!(
            long_break = self.settings.long_break_minutes,
            resized,
            "long break updated"
        );
        self.settings_event(resized)
    }

    /// Advance the running countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let outcome = self.clock.tick(&mut self.state);
        self.after_tick(outcome)
    }

    /// Advance on a tick delivered by the tick source. Ticks from a source
    /// that has since been cancelled are ignored.
    pub fn handle_tick(&mut self, tick: Tick) -> Vec<Event> {
        let outcome = self.clock.on_tick(&mut self.state, tick);
        self.after_tick(outcome)
    }

    /// Pause and write everything out. Call before the process exits.
    pub fn teardown(&mut self) {
        self.clock.pause(&mut self.state);
        self.persist();
    }

    /// Write settings, timer state and task log.
    pub fn persist(&self) {
        self.persist_settings();
        self.persist_state();
        self.persist_tasks();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after_tick(&mut self, outcome: TickOutcome) -> Vec<Event> {
        match outcome {
            TickOutcome::Ignored => Vec::new(),
            TickOutcome::Advanced { remaining_seconds } => {
                tracing::debug!(remaining_seconds, "tick");
                Vec::new()
            }
            TickOutcome::Completed => self.complete_session(),
        }
    }

    fn complete_session(&mut self) -> Vec<Event> {
        let now = self.now();
        let completed = self.state.session_type;
        let mut events = vec![Event::SessionCompleted {
            session_type: completed,
            cycle_count: self.state.cycle_count,
            at: now,
        }];

        if self.settings.sound_enabled {
            if let Err(err) = self.notifier.notify(completed) {
                tracing::warn!(%err, "notification failed");
            }
        }

        let transition = on_session_complete(&mut self.state, &self.settings);
        tracing::info!(
            completed = ?transition.completed,
            next = ?transition.next,
            cycle = transition.cycle_count,
            "session completed"
        );

        if let Some(focus) = transition.focus {
            match self.log.record_completion(&focus.title, focus.duration_min, now) {
                Ok(task) => {
                    let task = task.clone();
                    events.push(Event::TaskLogged {
                        task,
                        today_total_seconds: self.log.today_total_seconds(),
                    });
                }
                Err(err) => tracing::warn!(%err, "completed focus session not logged"),
            }
            self.persist_tasks();
        }

        events.push(Event::SessionAdvanced {
            session_type: transition.next,
            cycle_count: transition.cycle_count,
            duration_secs: self.state.remaining_seconds,
            at: now,
        });

        if self.auto_start {
            events.push(self.start());
        } else {
            self.persist_state();
        }
        events
    }

    /// Refill a paused countdown whose session type is in `types`.
    fn resize_paused(&mut self, types: &[SessionType]) -> bool {
        if self.state.is_running || !types.contains(&self.state.session_type) {
            return false;
        }
        self.clock.reset(&mut self.state, &self.settings);
        self.persist_state();
        true
    }

    fn settings_event(&self, countdown_resized: bool) -> Event {
        Event::SettingsUpdated {
            focus_minutes: self.settings.focus_minutes,
            short_break_minutes: self.settings.short_break_minutes,
            long_break_minutes: self.settings.long_break_minutes,
            sound_enabled: self.settings.sound_enabled,
            countdown_resized,
            at: self.now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.wall_clock.now()
    }

    fn persist_settings(&self) {
        self.write(SETTINGS_KEY, self.settings.to_bytes());
    }

    fn persist_state(&self) {
        self.write(TIMER_STATE_KEY, self.snapshot().to_bytes());
    }

    fn persist_tasks(&self) {
        self.write(TASKS_KEY, self.log.to_bytes());
    }

    fn write(&self, key: &str, bytes: Result<Vec<u8>, PersistenceError>) {
        let result = bytes.and_then(|bytes| self.storage.set(key, &bytes));
        if let Err(err) = result {
            tracing::warn!(key, %err, "failed to persist record");
        }
    }
}

/// Read a record, treating storage failures as absence.
fn read(storage: &dyn Storage, key: &str) -> Option<Vec<u8>> {
    storage.get(key).unwrap_or_else(|err| {
        tracing::warn!(key, %err, "failed to read record");
        None
    })
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("tasks", &self.log.len())
            .field("clock", &self.clock)
            .finish()
    }
}
