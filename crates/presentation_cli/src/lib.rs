//! Speaker for Seniors command-line front end
//!
//! Argument parsing and pipeline wiring live here so they can be tested
//! without spawning the binary.

pub mod app;
pub mod cli;

pub use app::{build_service, error_line, render_json, render_summary};
pub use cli::{Cli, log_filter_from_verbosity};
