//! Planner application: configuration, orchestration, and file emission.
//!
//! Thin plumbing around the computational crates: loads the JSON
//! configuration, runs footprint projections and timeline scans, and writes
//! the region-file and timeline-table artifacts.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod regions;
pub mod report;

pub use config::Config;
pub use error::{Error, Result};
