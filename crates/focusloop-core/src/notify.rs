//! Session-completion notifications.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::NotifyError;
use crate::timer::SessionType;

/// Audio/visual cue fired when a session completes.
///
/// Failures are logged by the controller and otherwise ignored.
pub trait Notifier {
    fn notify(&self, completed: SessionType) -> Result<(), NotifyError>;
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _completed: SessionType) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Records every notification; clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Rc<RefCell<Vec<SessionType>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records the call and then reports failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SessionType> {
        self.calls.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, completed: SessionType) -> Result<(), NotifyError> {
        self.calls.borrow_mut().push(completed);
        if self.fail {
            return Err(NotifyError("audio device unavailable".into()));
        }
        Ok(())
    }
}
