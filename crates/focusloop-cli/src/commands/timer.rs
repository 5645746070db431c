use clap::Subcommand;
use focusloop_core::{Config, Controller, Event, IntervalTicker, Tick};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::bell::TerminalBell;
use crate::common::{open_controller, open_idle_controller, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground (p = pause/resume, r = reset, q = quit)
    Run {
        /// Label credited when the focus session completes
        #[arg(long)]
        task: Option<String>,
        /// Exit after the first completed session
        #[arg(long)]
        once: bool,
        /// Print events as JSON lines instead of a status line
        #[arg(long)]
        json: bool,
    },
    /// Show current timer status
    Status,
    /// Refill the current session and pause
    Reset {
        /// Also clear cycle and focus counters
        #[arg(long)]
        all: bool,
    },
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { task, once, json } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(run_foreground(config, task, once, json));
            // A pending stdin read must not hold up exit.
            runtime.shutdown_background();
            result?;
        }
        TimerAction::Status => {
            let ctl = open_idle_controller(config)?;
            print_json(&ctl.display())?;
        }
        TimerAction::Reset { all } => {
            let mut ctl = open_idle_controller(config)?;
            let event = if all { ctl.reset_counters() } else { ctl.reset() };
            print_json(&event)?;
        }
    }
    Ok(())
}

async fn run_foreground(
    config: &Config,
    task: Option<String>,
    once: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ticker, ticks) = IntervalTicker::channel();
    let (mut ctl, restored) = open_controller(config, Box::new(ticker), Box::new(TerminalBell))?;

    let started = match task {
        Some(label) => ctl.start_task(&label)?,
        None => vec![ctl.start()],
    };
    let out = Output { json };
    out.events(std::iter::once(&restored).chain(&started))?;
    out.status(&ctl);

    let result = drive(&mut ctl, ticks, once, &out).await;
    ctl.teardown();
    out.finish();
    result
}

async fn drive(
    ctl: &mut Controller,
    mut ticks: UnboundedReceiver<Tick>,
    once: bool,
    out: &Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = Vec::new();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                let events = ctl.handle_tick(tick);
                let completed = events
                    .iter()
                    .any(|e| matches!(e, Event::SessionCompleted { .. }));
                out.events(&events)?;
                out.status(ctl);
                if once && completed {
                    return Ok(());
                }
            }
            read = stdin.read_until(b'\n', &mut line), if stdin_open => {
                let command = match read {
                    Ok(0) => {
                        stdin_open = false;
                        continue;
                    }
                    Ok(_) => String::from_utf8_lossy(&line).trim().to_string(),
                    Err(err) => {
                        tracing::warn!(%err, "ignoring keyboard input");
                        stdin_open = false;
                        continue;
                    }
                };
                line.clear();
                match command.as_str() {
                    "p" => out.events([&ctl.toggle()])?,
                    "r" => out.events([&ctl.reset()])?,
                    "q" => return Ok(()),
                    "" => continue,
                    other => {
                        tracing::warn!(
                            command = other,
                            "unknown command (p = pause/resume, r = reset, q = quit)"
                        );
                        continue;
                    }
                }
                out.status(ctl);
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                return Ok(());
            }
        }
    }
}

/// Foreground output: a rewritten status line, or JSON lines.
struct Output {
    json: bool,
}

impl Output {
    fn events<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for event in events {
            if self.json {
                println!("{}", serde_json::to_string(event)?);
            } else if let Some(text) = describe(event) {
                println!("\r{text}\x1b[K");
            }
        }
        Ok(())
    }

    fn status(&self, ctl: &Controller) {
        if self.json {
            return;
        }
        use std::io::Write;
        print!("\r{}\x1b[K", ctl.display().status_line());
        let _ = std::io::stdout().flush();
    }

    fn finish(&self) {
        if !self.json {
            println!();
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::SessionCompleted { session_type, .. } => {
            Some(format!("{} complete", session_type.label()))
        }
        Event::TaskLogged {
            task,
            today_total_seconds,
        } => Some(format!(
            "logged \"{}\" ({} min), today {}",
            task.title,
            task.duration_minutes,
            focusloop_core::format_clock(*today_total_seconds)
        )),
        Event::StateRestored { outcome, .. } if outcome != "resumable" => {
            Some(format!("starting over ({outcome} state)"))
        }
        _ => None,
    }
}
