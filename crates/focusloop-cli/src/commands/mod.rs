pub mod config;
pub mod settings;
pub mod task;
pub mod timer;
