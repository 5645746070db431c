//! Session clock.
//!
//! A second-granularity countdown over [`TimerState`]. The clock owns the
//! tick source handle; the state itself stays plain data owned by the
//! controller.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running -> (Ready | Completed -> Ready)
//! ```
//!
//! Completion pauses the clock before returning, so it is reported exactly
//! once and no further tick can decrement past zero.

use std::time::Duration;

use super::state::TimerState;
use super::ticker::{Tick, TickHandle, TickSource};
use crate::settings::Settings;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock was not running, or the tick came from a cancelled source.
    Ignored,
    Advanced { remaining_seconds: u32 },
    Completed,
}

pub struct SessionClock {
    interval: Duration,
    handle: Option<Box<dyn TickHandle>>,
}

impl SessionClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
        }
    }

    /// Id of the armed tick source, if any.
    pub fn armed_source(&self) -> Option<u64> {
        self.handle.as_ref().map(|h| h.id())
    }

    /// Mark the state running and arm a fresh tick source.
    ///
    /// Any source that is still armed is cancelled first, so at most one
    /// source ever drives the countdown.
    pub fn start(&mut self, state: &mut TimerState, source: &mut dyn TickSource) {
        self.disarm();
        state.is_running = true;
        self.handle = Some(source.schedule_repeating(self.interval));
    }

    /// Stop ticking. Safe to call when already paused.
    pub fn pause(&mut self, state: &mut TimerState) {
        self.disarm();
        state.is_running = false;
    }

    /// Refill the countdown for the current session type and pause.
    pub fn reset(&mut self, state: &mut TimerState, settings: &Settings) {
        self.pause(state);
        state.remaining_seconds = state.session_type.duration_secs(settings);
    }

    /// Advance by exactly one second.
    pub fn tick(&mut self, state: &mut TimerState) -> TickOutcome {
        if !state.is_running {
            return TickOutcome::Ignored;
        }
        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if state.remaining_seconds == 0 {
            self.pause(state);
            return TickOutcome::Completed;
        }
        TickOutcome::Advanced {
            remaining_seconds: state.remaining_seconds,
        }
    }

    /// Advance on a tick delivered by a tick source.
    ///
    /// Ticks stamped with any id other than the armed source are dropped.
    pub fn on_tick(&mut self, state: &mut TimerState, tick: Tick) -> TickOutcome {
        if self.armed_source() != Some(tick.source_id) {
            tracing::debug!(source_id = tick.source_id, "dropping tick from stale source");
            return TickOutcome::Ignored;
        }
        self.tick(state)
    }

    fn disarm(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClock")
            .field("interval", &self.interval)
            .field("armed_source", &self.armed_source())
            .finish()
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::session::SessionType;
    use crate::timer::ticker::ManualTicker;
    use proptest::prelude::*;

    fn setup() -> (SessionClock, TimerState, ManualTicker, Settings) {
        let settings = Settings::default();
        (
            SessionClock::new(Duration::from_secs(1)),
            TimerState::initial(&settings),
            ManualTicker::new(),
            settings,
        )
    }

    #[test]
    fn tick_is_a_no_op_while_paused() {
        let (mut clock, mut state, _ticker, _settings) = setup();
        assert_eq!(clock.tick(&mut state), TickOutcome::Ignored);
        assert_eq!(state.remaining_seconds, 1500);
    }

    #[test]
    fn start_pause_toggles_running_and_source() {
        let (mut clock, mut state, mut ticker, _settings) = setup();
        clock.start(&mut state, &mut ticker);
        assert!(state.is_running);
        assert_eq!(ticker.live_handles(), 1);

        clock.pause(&mut state);
        assert!(!state.is_running);
        assert_eq!(ticker.live_handles(), 0);

        clock.pause(&mut state);
        assert_eq!(ticker.live_handles(), 0);
    }

    #[test]
    fn restarting_replaces_the_tick_source() {
        let (mut clock, mut state, mut ticker, _settings) = setup();
        clock.start(&mut state, &mut ticker);
        clock.start(&mut state, &mut ticker);
        assert_eq!(ticker.live_handles(), 1);
        assert_eq!(ticker.armed_total(), 2);

        let ticks = ticker.fire();
        assert_eq!(ticks.len(), 1);
        for tick in ticks {
            clock.on_tick(&mut state, tick);
        }
        assert_eq!(state.remaining_seconds, 1499);
    }

    #[test]
    fn ticks_from_a_cancelled_source_are_dropped() {
        let (mut clock, mut state, mut ticker, _settings) = setup();
        clock.start(&mut state, &mut ticker);
        let stale = ticker.fire()[0];
        clock.pause(&mut state);
        clock.start(&mut state, &mut ticker);

        assert_eq!(clock.on_tick(&mut state, stale), TickOutcome::Ignored);
        assert_eq!(state.remaining_seconds, 1500);
    }

    #[test]
    fn completion_fires_once_and_pauses() {
        let (mut clock, mut state, mut ticker, _settings) = setup();
        state.remaining_seconds = 2;
        clock.start(&mut state, &mut ticker);

        assert_eq!(
            clock.tick(&mut state),
            TickOutcome::Advanced { remaining_seconds: 1 }
        );
        assert_eq!(clock.tick(&mut state), TickOutcome::Completed);
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
        assert_eq!(ticker.live_handles(), 0);

        assert_eq!(clock.tick(&mut state), TickOutcome::Ignored);
        assert_eq!(state.remaining_seconds, 0);
    }

    #[test]
    fn reset_refills_current_session_and_pauses() {
        let (mut clock, mut state, mut ticker, settings) = setup();
        state.session_type = SessionType::ShortBreak;
        state.remaining_seconds = 10;
        clock.start(&mut state, &mut ticker);

        clock.reset(&mut state, &settings);
        assert_eq!(state.remaining_seconds, 300);
        assert!(!state.is_running);
        assert_eq!(ticker.live_handles(), 0);
    }

    proptest! {
        #[test]
        fn n_ticks_below_remaining_subtract_exactly_n(n in 0u32..1500) {
            let (mut clock, mut state, mut ticker, _settings) = setup();
            clock.start(&mut state, &mut ticker);
            for _ in 0..n {
                clock.tick(&mut state);
            }
            prop_assert_eq!(state.remaining_seconds, 1500 - n);
            prop_assert_eq!(state.session_type, SessionType::Focus);
            prop_assert!(state.is_running);
        }
    }
}
