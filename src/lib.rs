//! Empty Sweeper - find and remove recursively empty directories
//!
//! This crate provides functionality for:
//! - Walking a tree children-first so emptiness cascades in one pass
//! - Excluding directories by name pattern or full path
//! - Permanent or trash deletion with dry-run and cancellation support

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod signals;

// Re-export commonly used types
pub use cleaner::{clean, CancellationToken, CleanOptions, CleanResult};
pub use config::Config;
pub use error::{Result, SweeperError};
