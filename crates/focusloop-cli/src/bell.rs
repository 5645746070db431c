use std::io::Write;

use focusloop_core::{Notifier, NotifyError, SessionType};

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn notify(&self, completed: SessionType) -> Result<(), NotifyError> {
        let mut err = std::io::stderr().lock();
        write!(err, "\x07")
            .and_then(|_| err.flush())
            .map_err(|e| NotifyError(format!("bell for {}: {e}", completed.label())))
    }
}
