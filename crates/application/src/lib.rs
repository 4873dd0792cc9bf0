//! Application layer - Use cases and orchestration
//!
//! Contains the event memory use cases, the intent result router, and the
//! assistant pipeline that ties speech, intent detection and storage together.
//! External systems are reached only through the traits in [`ports`].

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
