//! Speech provider implementations

pub mod google;
