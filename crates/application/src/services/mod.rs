//! Application services - Use case implementations

mod assistant_service;
mod event_memory;
mod intent_router;

#[cfg(test)]
pub(crate) mod test_support;

pub use assistant_service::{AssistantConfig, AssistantReply, AssistantRequest, AssistantService};
pub use event_memory::EventMemory;
pub use intent_router::{IntentRouter, RouteDecision, RouteOutcome, RouterConfig};
