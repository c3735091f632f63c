pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod loader;
pub mod package;
pub mod pattern;
pub mod pipeline;
pub mod runtime;

pub use error::{Result, SyncError};
