//! Persisted timer snapshot and the startup reconciler.

mod reconciler;
mod snapshot;

pub use reconciler::{
    reconcile, snapshot_age_secs, Reconciliation, StaleReason, STALE_AFTER_SECS,
};
pub use snapshot::{PersistedSnapshot, TIMER_STATE_KEY};
