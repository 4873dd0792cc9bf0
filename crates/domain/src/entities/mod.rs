//! Domain entities - Objects with identity and lifecycle

mod event_record;
mod intent;
mod query_result;

pub use event_record::{EventRecord, NewEvent};
pub use intent::Intent;
pub use query_result::{QueryResult, SlotValue, slots};
