use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Kind of session the clock is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    /// Human-readable label shown by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Focus => "Focus",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }

    /// Configured length of this session in minutes.
    pub fn duration_min(&self, settings: &Settings) -> u32 {
        match self {
            SessionType::Focus => settings.focus_minutes,
            SessionType::ShortBreak => settings.short_break_minutes,
            SessionType::LongBreak => settings.long_break_minutes,
        }
    }

    /// Configured length of this session in seconds.
    ///
    /// Uses saturating arithmetic so a hand-edited duration cannot overflow.
    pub fn duration_secs(&self, settings: &Settings) -> u32 {
        self.duration_min(settings).saturating_mul(60)
    }
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::Focus
    }
}
