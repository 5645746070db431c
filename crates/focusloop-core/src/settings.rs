//! User-configurable session durations.
//!
//! Durations are clamped at the point of update, so every `Settings` value that
//! the rest of the core sees already satisfies the bounds below. The stored
//! `settings` record uses camelCase keys.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::PersistenceError;

pub const FOCUS_RANGE: RangeInclusive<u32> = 1..=60;
pub const SHORT_BREAK_RANGE: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_RANGE: RangeInclusive<u32> = 1..=60;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sound_enabled: true,
        }
    }
}

/// Clamp a raw minute value into `range`.
pub fn clamp_minutes(value: i64, range: &RangeInclusive<u32>) -> u32 {
    let lo = i64::from(*range.start());
    let hi = i64::from(*range.end());
    // Bounded by `range`, so the cast cannot truncate.
    value.clamp(lo, hi) as u32
}

impl Settings {
    /// Apply a user update, clamping focus to [1,60] and break to [1,30].
    ///
    /// Returns `true` when anything actually changed.
    pub fn update(&mut self, focus_minutes: i64, break_minutes: i64, sound_enabled: bool) -> bool {
        let next = Settings {
            focus_minutes: clamp_minutes(focus_minutes, &FOCUS_RANGE),
            short_break_minutes: clamp_minutes(break_minutes, &SHORT_BREAK_RANGE),
            long_break_minutes: self.long_break_minutes,
            sound_enabled,
        };
        let changed = next != *self;
        *self = next;
        changed
    }

    /// Bring values loaded from outside the core back into range.
    ///
    /// A zero duration falls back to the matching value in `defaults`; any
    /// other out-of-range value is clamped.
    pub fn sanitized(&self, defaults: &Settings) -> Settings {
        let pick = |value: u32, fallback: u32, range: &RangeInclusive<u32>| {
            if value == 0 {
                clamp_minutes(i64::from(fallback), range)
            } else {
                clamp_minutes(i64::from(value), range)
            }
        };
        Settings {
            focus_minutes: pick(self.focus_minutes, defaults.focus_minutes, &FOCUS_RANGE),
            short_break_minutes: pick(
                self.short_break_minutes,
                defaults.short_break_minutes,
                &SHORT_BREAK_RANGE,
            ),
            long_break_minutes: pick(
                self.long_break_minutes,
                defaults.long_break_minutes,
                &LONG_BREAK_RANGE,
            ),
            sound_enabled: self.sound_enabled,
        }
    }

    /// Decode the stored `settings` record.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Corrupt`] when the bytes are not a valid
    /// settings object. Callers fall back to defaults.
    pub fn from_bytes(bytes: &[u8], defaults: &Settings) -> Result<Settings, PersistenceError> {
        let raw: Settings =
            serde_json::from_slice(bytes).map_err(|source| PersistenceError::Corrupt {
                key: SETTINGS_KEY.to_string(),
                source,
            })?;
        Ok(raw.sanitized(defaults))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn update_clamps_out_of_range_values() {
        let mut settings = Settings::default();
        settings.update(0, 45, false);
        assert_eq!(settings.focus_minutes, 1);
        assert_eq!(settings.short_break_minutes, 30);
        assert!(!settings.sound_enabled);

        settings.update(90, -3, true);
        assert_eq!(settings.focus_minutes, 60);
        assert_eq!(settings.short_break_minutes, 1);
    }

    #[test]
    fn update_leaves_long_break_alone() {
        let mut settings = Settings {
            long_break_minutes: 20,
            ..Settings::default()
        };
        settings.update(30, 10, true);
        assert_eq!(settings.long_break_minutes, 20);
    }

    #[test]
    fn update_reports_whether_anything_changed() {
        let mut settings = Settings::default();
        assert!(!settings.update(25, 5, true));
        assert!(settings.update(26, 5, true));
    }

    #[test]
    fn stored_record_uses_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["focusMinutes"], 25);
        assert_eq!(json["shortBreakMinutes"], 5);
        assert_eq!(json["longBreakMinutes"], 15);
        assert_eq!(json["soundEnabled"], true);
    }

    #[test]
    fn zero_values_fall_back_to_defaults() {
        let defaults = Settings::default();
        let loaded = Settings::from_bytes(
            br#"{"focusMinutes":0,"shortBreakMinutes":7,"longBreakMinutes":0,"soundEnabled":false}"#,
            &defaults,
        )
        .unwrap();
        assert_eq!(loaded.focus_minutes, 25);
        assert_eq!(loaded.short_break_minutes, 7);
        assert_eq!(loaded.long_break_minutes, 15);
        assert!(!loaded.sound_enabled);
    }

    #[test]
    fn loaded_values_are_clamped() {
        let loaded = Settings::from_bytes(
            br#"{"focusMinutes":500,"shortBreakMinutes":99}"#,
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(loaded.focus_minutes, 60);
        assert_eq!(loaded.short_break_minutes, 30);
        assert!(loaded.sound_enabled);
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let err = Settings::from_bytes(b"{not json", &Settings::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }

    proptest! {
        #[test]
        fn update_always_lands_in_range(
            focus in any::<i64>(),
            brk in any::<i64>(),
            sound in any::<bool>(),
        ) {
            let mut settings = Settings::default();
            settings.update(focus, brk, sound);
            prop_assert!(FOCUS_RANGE.contains(&settings.focus_minutes));
            prop_assert!(SHORT_BREAK_RANGE.contains(&settings.short_break_minutes));
        }
    }
}
