use clap::Subcommand;
use focusloop_core::Config;

use crate::common::{open_idle_controller, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current durations and sound preference
    Show,
    /// Update durations (clamped into range) and sound
    Set {
        /// Focus minutes (1-60)
        #[arg(long)]
        focus: Option<i64>,
        /// Short break minutes (1-30)
        #[arg(long = "break")]
        short_break: Option<i64>,
        /// Long break minutes (1-60)
        #[arg(long)]
        long_break: Option<u32>,
        /// Play the completion bell
        #[arg(long)]
        sound: Option<bool>,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctl = open_idle_controller(config)?;
    match action {
        SettingsAction::Show => print_json(ctl.settings())?,
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            sound,
        } => {
            let current = ctl.settings().clone();
            let mut event = None;
            if focus.is_some() || short_break.is_some() || sound.is_some() {
                event = Some(ctl.update_settings(
                    focus.unwrap_or_else(|| i64::from(current.focus_minutes)),
                    short_break.unwrap_or_else(|| i64::from(current.short_break_minutes)),
                    sound.unwrap_or(current.sound_enabled),
                ));
            }
            if let Some(minutes) = long_break {
                event = Some(ctl.set_long_break_minutes(minutes));
            }
            match event {
                Some(event) => print_json(&event)?,
                None => return Err("nothing to set (see `focusloop settings set --help`)".into()),
            }
        }
    }
    Ok(())
}
