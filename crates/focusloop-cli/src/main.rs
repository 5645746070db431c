use clap::{Parser, Subcommand};
use focusloop_core::Config;

mod bell;
mod commands;
mod common;

#[derive(Parser)]
#[command(name = "focusloop", version, about = "Focus/break session timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Today's completed tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Session durations and sound
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    common::init_logging(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Task { action } => commands::task::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
