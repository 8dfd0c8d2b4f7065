//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: Purges expired in-process cache entries and idle rate limiter state

mod cleanup;

pub use cleanup::spawn_cleanup_task;
