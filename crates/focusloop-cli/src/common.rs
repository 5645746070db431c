//! Shared setup for CLI commands.

use focusloop_core::{
    Collaborators, Config, Controller, ControllerOptions, CoreError, Event, ManualTicker,
    Notifier, SilentNotifier, SqliteStore, SystemClock, TickSource,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins over the configured `log.filter`.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Load the controller from the default store.
pub fn open_controller(
    config: &Config,
    tick_source: Box<dyn TickSource>,
    notifier: Box<dyn Notifier>,
) -> Result<(Controller, Event), CoreError> {
    let storage = SqliteStore::open_default()?;
    Ok(Controller::load(
        Collaborators {
            storage: Box::new(storage),
            wall_clock: Box::new(SystemClock),
            tick_source,
            notifier,
        },
        ControllerOptions::from_config(config),
    ))
}

/// Load the controller for a command that never starts the clock.
pub fn open_idle_controller(config: &Config) -> Result<Controller, CoreError> {
    let (ctl, _) = open_controller(
        config,
        Box::new(ManualTicker::new()),
        Box::new(SilentNotifier),
    )?;
    Ok(ctl)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
