use clap::Subcommand;
use focusloop_core::display::TaskRow;
use focusloop_core::{format_clock, Config};

use crate::common::{open_idle_controller, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List today's completed focus sessions, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's total focus time
    Today,
}

pub fn run(action: TaskAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let ctl = open_idle_controller(config)?;
    match action {
        TaskAction::List { json } => {
            if json {
                print_json(&ctl.log().tasks())?;
                return Ok(());
            }
            if ctl.log().is_empty() {
                println!("No tasks completed today.");
                return Ok(());
            }
            for task in ctl.log().tasks() {
                let row = TaskRow::from(task);
                println!(
                    "{}  {}  [{}] {}",
                    row.duration,
                    row.title,
                    row.project,
                    row.tags.join(",")
                );
            }
        }
        TaskAction::Today => {
            let total = ctl.today_total_seconds();
            println!(
                "Today: {} across {} session(s)",
                format_clock(total),
                ctl.log().len()
            );
        }
    }
    Ok(())
}
