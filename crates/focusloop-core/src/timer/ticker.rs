//! Cancellable repeating tick sources.
//!
//! The session clock arms exactly one tick source while it is running. Every
//! armed source gets a fresh id and stamps it on the [`Tick`]s it delivers, so
//! a tick that was already queued when its source was cancelled can be told
//! apart from a tick of the source armed after it.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// One beat of an armed tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub source_id: u64,
}

/// Handle to an armed tick source.
pub trait TickHandle {
    fn id(&self) -> u64;

    /// Stop delivering ticks. Calling this more than once is a no-op.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Something that can deliver ticks on a fixed cadence.
pub trait TickSource {
    fn schedule_repeating(&mut self, interval: Duration) -> Box<dyn TickHandle>;
}

// ── tokio interval ─────────────────────────────────────────────────

/// Tick source backed by a tokio interval task.
///
/// Ticks are pushed into an unbounded channel and consumed by a single event
/// loop. Must be used from inside a tokio runtime.
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<Tick>,
    next_id: u64,
}

impl IntervalTicker {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_id: 1 }, rx)
    }
}

impl TickSource for IntervalTicker {
    fn schedule_repeating(&mut self, interval: Duration) -> Box<dyn TickHandle> {
        let source_id = self.next_id;
        self.next_id += 1;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval resolves immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Tick { source_id }).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(source_id, ?interval, "tick source armed");
        Box::new(IntervalHandle {
            id: source_id,
            task: Some(task),
        })
    }
}

struct IntervalHandle {
    id: u64,
    task: Option<JoinHandle<()>>,
}

impl TickHandle for IntervalHandle {
    fn id(&self) -> u64 {
        self.id
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!(source_id = self.id, "tick source cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── manual ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualInner {
    next_id: u64,
    live: BTreeSet<u64>,
    armed_total: u64,
}

/// Tick source driven by hand, for tests and for callers that never run
/// the clock.
///
/// Clones share state, so a test can keep one clone to fire ticks while the
/// controller owns the other.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles that have not been cancelled.
    pub fn live_handles(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Number of times a source has been armed.
    pub fn armed_total(&self) -> u64 {
        self.inner.borrow().armed_total
    }

    /// One tick from every live source.
    pub fn fire(&self) -> Vec<Tick> {
        self.inner
            .borrow()
            .live
            .iter()
            .map(|&source_id| Tick { source_id })
            .collect()
    }
}

impl TickSource for ManualTicker {
    fn schedule_repeating(&mut self, _interval: Duration) -> Box<dyn TickHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.armed_total += 1;
        let id = inner.next_id;
        inner.live.insert(id);
        Box::new(ManualHandle {
            id,
            inner: Rc::clone(&self.inner),
        })
    }
}

struct ManualHandle {
    id: u64,
    inner: Rc<RefCell<ManualInner>>,
}

impl TickHandle for ManualHandle {
    fn id(&self) -> u64 {
        self.id
    }

    fn cancel(&mut self) {
        self.inner.borrow_mut().live.remove(&self.id);
    }

    fn is_active(&self) -> bool {
        self.inner.borrow().live.contains(&self.id)
    }
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
