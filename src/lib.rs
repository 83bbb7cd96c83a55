//! Canned Cycle Expander
//!
//! Converts canned drilling cycles in a G-code program into the explicit
//! moves a simpler controller can run.
//!
//! This library provides:
//! - Cycle tag recognition and word extraction
//! - The line-oriented expansion state machine
//! - Program statistics
//! - Configuration management

pub mod cli;
pub mod config;
pub mod expander;
pub mod parser;
pub mod stats;

// Re-exports for clean public API
pub use config::{DwellUnit, ExpanderConfig};
pub use expander::{expand, CycleExpander};
pub use stats::ProgramStats;
