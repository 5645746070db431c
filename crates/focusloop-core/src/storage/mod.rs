//! Storage backends and on-disk locations.
//!
//! The core only needs a key-value store with get/set semantics. Reads that
//! fail are treated as absent by the controller, writes are fire-and-forget.

mod config;
pub mod kv;
pub mod memory;

pub use config::{ClockConfig, Config, DefaultsConfig, LogConfig};
pub use kv::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Key-value store holding the `settings`, `timerState` and `tasks` records.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSLOOP_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/focusloop/`, or `~/.config/focusloop-dev/` when
/// `FOCUSLOOP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let dir = match std::env::var_os("FOCUSLOOP_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSLOOP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusloop-dev")
            } else {
                base_dir.join("focusloop")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(PersistenceError::DataDir)?;
    Ok(dir)
}
