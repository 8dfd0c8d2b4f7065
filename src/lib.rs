//! BMI Service - A small HTTP service computing Body Mass Index
//!
//! Computes BMI from weight and height, caches results with a TTL and
//! rate-limits callers per IP.

pub mod api;
pub mod bmi;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
