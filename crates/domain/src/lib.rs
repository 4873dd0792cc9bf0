//! Domain layer for Speaker for Seniors
//!
//! Contains the event-memory model: what the assistant heard (`QueryResult`),
//! what it remembers (`EventRecord`), and the small amount of arithmetic needed
//! to answer "when did I last...?" questions. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
