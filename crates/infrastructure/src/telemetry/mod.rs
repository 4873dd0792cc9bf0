//! Logging setup

mod logging;

pub use logging::{DEFAULT_FILTER, TelemetryError, effective_filter, init_logging};
