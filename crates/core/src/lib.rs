//! Core utilities for the kick viewer.
//!
//! This crate provides foundational types and utilities used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Engine time tracking
//! - A single-threaded deferred task queue
//! - Configuration management

mod config;
mod error;
mod logging;
mod task_queue;
mod time;

pub use config::{Config, ResourceConfig, ViewerConfig};
pub use error::{Error, Result};
pub use logging::{DEFAULT_LOG_FILTER, init_logging};
pub use task_queue::TaskQueue;
pub use time::Time;
