//! Intent result router - Decides what to do with a detected intent
//!
//! Two intents are understood:
//! - `event.detect`: the user reports something happened; it is recorded.
//! - `event.question`: the user asks when something happened; the event
//!   memory is searched and the elapsed time is phrased into the answer.
//!
//! Every other intent gets the negative response.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{EventId, EventRecord, EventTimestamp, Intent, QueryResult, slots};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::QueryLogPort, services::EventMemory};

/// Router tuning
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// Reply when nothing matched or the intent is not handled
    pub negative_response: String,
    /// Below this confidence the router asks the user to rephrase
    ///
    /// `None` disables the check.
    pub min_confidence: Option<f32>,
    /// Reply used when confidence is too low
    pub rephrase_prompt: String,
    /// Reply to a recorded event when the agent sent no fulfillment text
    pub acknowledgement: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            negative_response: "no".to_string(),
            min_confidence: None,
            rephrase_prompt: "Sorry, could you say that again?".to_string(),
            acknowledgement: "Okay, I'll remember that".to_string(),
        }
    }
}

/// What the router did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// An `event.detect` utterance was stored
    Recorded {
        /// Identifier allocated by the store
        id: EventId,
    },
    /// An `event.question` found a matching event
    Answered {
        /// The matching event
        event: EventRecord,
        /// Whole minutes since the event
        minutes_ago: u64,
    },
    /// An `event.question` found nothing
    NotFound {
        /// Verb searched for
        verb: String,
        /// Object searched for
        object: String,
    },
    /// The intent has no handler
    Unhandled {
        /// The unhandled intent label
        label: String,
    },
    /// Confidence was below the configured threshold
    Rephrase {
        /// The reported confidence
        confidence: String,
    },
}

/// Response text plus the outcome that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    /// Text to speak back
    pub response: String,
    /// What happened
    pub outcome: RouteOutcome,
}

/// Routes query results to the event memory
pub struct IntentRouter {
    memory: EventMemory,
    query_log: Option<Arc<dyn QueryLogPort>>,
    config: RouterConfig,
}

impl fmt::Debug for IntentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRouter")
            .field("config", &self.config)
            .field("query_log", &self.query_log.is_some())
            .finish_non_exhaustive()
    }
}

impl IntentRouter {
    /// Create a router with default configuration and no query log
    pub fn new(memory: EventMemory) -> Self {
        Self {
            memory,
            query_log: None,
            config: RouterConfig::default(),
        }
    }

    /// Use custom configuration
    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Also append every reported event to a query log
    #[must_use]
    pub fn with_query_log(mut self, query_log: Arc<dyn QueryLogPort>) -> Self {
        self.query_log = Some(query_log);
        self
    }

    /// Route a query result, measuring time from now
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the event store fails.
    pub async fn route(&self, result: &QueryResult) -> Result<RouteDecision, ApplicationError> {
        self.route_at(result, Utc::now()).await
    }

    /// Route a query result as if the current time were `now`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the event store fails.
    #[instrument(skip(self, result), fields(intent = %result.intent, confidence = %result.confidence))]
    pub async fn route_at(
        &self,
        result: &QueryResult,
        now: DateTime<Utc>,
    ) -> Result<RouteDecision, ApplicationError> {
        if let Some(threshold) = self.config.min_confidence {
            if !result.confidence.is_at_least(threshold) {
                info!(threshold, "Confidence too low, asking to rephrase");
                return Ok(RouteDecision {
                    response: self.config.rephrase_prompt.clone(),
                    outcome: RouteOutcome::Rephrase {
                        confidence: result.confidence.to_string(),
                    },
                });
            }
        }

        match &result.intent {
            Intent::EventDetect => self.record_event(result, now).await,
            Intent::EventQuestion => self.answer_question(result, now).await,
            Intent::Other(label) => {
                debug!(label = %label, "No handler for intent");
                Ok(self.negative(RouteOutcome::Unhandled {
                    label: label.clone(),
                }))
            },
        }
    }

    async fn record_event(
        &self,
        result: &QueryResult,
        now: DateTime<Utc>,
    ) -> Result<RouteDecision, ApplicationError> {
        let verb = slot_or_empty(result, slots::VERB);
        let object = slot_or_empty(result, slots::OBJECT);
        debug!(verb = %verb, object = %object, "Recording event");

        let timestamp = EventTimestamp::from_datetime(now);
        let id = self.memory.record(&result.query_text, timestamp).await?;

        if let Some(log) = &self.query_log {
            if let Err(e) = log.append(&result.query_text, timestamp).await {
                warn!(error = %e, "Failed to append to query log");
            }
        }

        info!(%id, "Event remembered");
        let response = if result.fulfillment_text.trim().is_empty() {
            debug!("Agent sent no fulfillment text, using acknowledgement");
            self.config.acknowledgement.clone()
        } else {
            result.fulfillment_text.clone()
        };
        Ok(RouteDecision {
            response,
            outcome: RouteOutcome::Recorded { id },
        })
    }

    async fn answer_question(
        &self,
        result: &QueryResult,
        now: DateTime<Utc>,
    ) -> Result<RouteDecision, ApplicationError> {
        let verb = slot_or_empty(result, slots::VERB);
        let object = slot_or_empty(result, slots::OBJECT);

        match self.memory.find(&verb, &object).await? {
            Some(event) => {
                let minutes_ago = EventMemory::elapsed(event.timestamp, now).whole_minutes();
                info!(id = %event.id, minutes_ago, "Answered from event memory");
                Ok(RouteDecision {
                    response: format!(
                        "{}, you did it {minutes_ago} minutes ago",
                        result.fulfillment_text
                    ),
                    outcome: RouteOutcome::Answered { event, minutes_ago },
                })
            },
            None => {
                info!(verb = %verb, object = %object, "No matching event");
                Ok(self.negative(RouteOutcome::NotFound { verb, object }))
            },
        }
    }

    fn negative(&self, outcome: RouteOutcome) -> RouteDecision {
        RouteDecision {
            response: self.config.negative_response.clone(),
            outcome,
        }
    }
}

/// Missing slots degrade to the empty string
fn slot_or_empty(result: &QueryResult, name: &str) -> String {
    result.require_slot(name).unwrap_or_else(|e| {
        let condition = ApplicationError::from(e);
        debug!(%condition, "Treating missing parameter as empty");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use domain::Confidence;
    use serde_json::json;

    use super::*;
    use crate::ports::{MockEventStorePort, MockQueryLogPort};
    use crate::services::test_support::VecEventStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 3, 1, 10, 0, 0).unwrap()
    }

    fn router() -> IntentRouter {
        IntentRouter::new(EventMemory::new(Arc::new(VecEventStore::default())))
    }

    fn detect(text: &str, verb: &str, object: &str) -> QueryResult {
        QueryResult::new(
            text,
            Intent::EventDetect,
            Confidence::clamped(0.9),
            "Got it, I'll remember that",
        )
        .with_parameter("verb", json!([verb]))
        .with_parameter("object", json!([object]))
    }

    fn question(verb: &str, object: &str) -> QueryResult {
        QueryResult::new(
            format!("when did I {verb} the {object}"),
            Intent::EventQuestion,
            Confidence::clamped(0.8),
            "Yes",
        )
        .with_parameter("verb", json!([verb]))
        .with_parameter("object", json!([object]))
    }

    #[tokio::test]
    async fn detect_responds_with_fulfillment() {
        let decision = router()
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();

        assert_eq!(decision.response, "Got it, I'll remember that");
        assert!(matches!(decision.outcome, RouteOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn detect_without_fulfillment_acknowledges() {
        let mut store = MockEventStorePort::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Ok(EventId::FIRST));
        let router = IntentRouter::new(EventMemory::new(Arc::new(store)));

        let result = QueryResult::new(
            "I watered the plants",
            Intent::EventDetect,
            Confidence::clamped(0.9),
            "  ",
        );
        let decision = router.route_at(&result, t0()).await.unwrap();

        assert_eq!(decision.response, "Okay, I'll remember that");
        assert_eq!(decision.outcome, RouteOutcome::Recorded { id: EventId::FIRST });
    }

    #[tokio::test]
    async fn record_then_question_immediately() {
        let router = router();
        router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();

        let decision = router
            .route_at(&question("watered", "plants"), t0() + Duration::seconds(20))
            .await
            .unwrap();

        assert_eq!(decision.response, "Yes, you did it 0 minutes ago");
        match decision.outcome {
            RouteOutcome::Answered { minutes_ago, .. } => assert!(minutes_ago < 1),
            other => panic!("expected answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn question_before_record_is_no() {
        let decision = router()
            .route_at(&question("watered", "plants"), t0())
            .await
            .unwrap();

        assert_eq!(decision.response, "no");
        assert!(matches!(decision.outcome, RouteOutcome::NotFound { .. }));
    }

    #[tokio::test]
    async fn watered_plants_scenario() {
        let router = router();
        router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();

        let later = t0() + Duration::minutes(5);
        let answered = router
            .route_at(&question("watered", "plants"), later)
            .await
            .unwrap();
        assert_eq!(answered.response, "Yes, you did it 5 minutes ago");

        let missing = router
            .route_at(&question("fed", "plants"), later)
            .await
            .unwrap();
        assert_eq!(missing.response, "no");
    }

    #[tokio::test]
    async fn question_picks_second_record_by_verb() {
        let router = router();
        router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();
        router
            .route_at(
                &detect("I fed the plants", "fed", "plants"),
                t0() + Duration::minutes(10),
            )
            .await
            .unwrap();

        let decision = router
            .route_at(&question("fed", "plants"), t0() + Duration::minutes(12))
            .await
            .unwrap();

        match decision.outcome {
            RouteOutcome::Answered { event, minutes_ago } => {
                assert_eq!(event.entry_text, "I fed the plants");
                assert_eq!(minutes_ago, 2);
            },
            other => panic!("expected answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn object_without_verb_is_not_matched() {
        let router = router();
        router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();

        let decision = router
            .route_at(&question("repotted", "plants"), t0())
            .await
            .unwrap();
        assert_eq!(decision.response, "no");
    }

    #[tokio::test]
    async fn question_without_parameters_does_not_fail() {
        let router = router();
        let bare = QueryResult::new("when?", Intent::EventQuestion, Confidence::clamped(0.7), "Yes");

        let decision = router.route_at(&bare, t0()).await.unwrap();
        assert_eq!(decision.response, "no");
    }

    #[tokio::test]
    async fn detect_without_parameters_still_records() {
        let router = router();
        let bare = QueryResult::new(
            "I did the thing",
            Intent::EventDetect,
            Confidence::clamped(0.7),
            "Okay",
        );

        let decision = router.route_at(&bare, t0()).await.unwrap();
        assert!(matches!(decision.outcome, RouteOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn other_intent_is_no_and_does_not_touch_store() {
        let mut store = MockEventStorePort::new();
        store.expect_append().never();
        store.expect_find_first().never();
        store.expect_scan().never();

        let router = IntentRouter::new(EventMemory::new(Arc::new(store)));
        let greeting = QueryResult::new(
            "hello",
            Intent::from_label("Default Welcome Intent"),
            Confidence::clamped(1.0),
            "Hi!",
        );

        let decision = router.route_at(&greeting, t0()).await.unwrap();
        assert_eq!(decision.response, "no");
        assert_eq!(
            decision.outcome,
            RouteOutcome::Unhandled {
                label: "Default Welcome Intent".to_string()
            }
        );
    }

    #[tokio::test]
    async fn question_does_not_mutate_store() {
        let mut store = MockEventStorePort::new();
        store.expect_append().never();
        store.expect_find_first().times(1).returning(|_, _| Ok(None));

        let router = IntentRouter::new(EventMemory::new(Arc::new(store)));
        let decision = router
            .route_at(&question("watered", "plants"), t0())
            .await
            .unwrap();
        assert_eq!(decision.response, "no");
    }

    #[tokio::test]
    async fn storage_error_is_fatal() {
        let mut store = MockEventStorePort::new();
        store
            .expect_append()
            .returning(|_| Err(ApplicationError::Storage("read-only filesystem".to_string())));

        let router = IntentRouter::new(EventMemory::new(Arc::new(store)));
        let result = router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await;

        assert!(matches!(result, Err(ApplicationError::Storage(_))));
    }

    #[tokio::test]
    async fn detect_appends_to_query_log() {
        let mut log = MockQueryLogPort::new();
        log.expect_append()
            .withf(|text, _| text.contains("watered the plants"))
            .times(1)
            .returning(|_, _| Ok(()));

        let router = router().with_query_log(Arc::new(log));
        router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn query_log_failure_is_not_fatal() {
        let mut log = MockQueryLogPort::new();
        log.expect_append()
            .returning(|_, _| Err(ApplicationError::Storage("no space".to_string())));

        let router = router().with_query_log(Arc::new(log));
        let decision = router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();
        assert!(matches!(decision.outcome, RouteOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn low_confidence_asks_to_rephrase() {
        let mut store = MockEventStorePort::new();
        store.expect_append().never();

        let router = IntentRouter::new(EventMemory::new(Arc::new(store))).with_config(
            RouterConfig {
                min_confidence: Some(0.95),
                ..RouterConfig::default()
            },
        );

        let decision = router
            .route_at(&detect("I watered the plants", "watered", "plants"), t0())
            .await
            .unwrap();
        assert_eq!(decision.response, "Sorry, could you say that again?");
        assert!(matches!(decision.outcome, RouteOutcome::Rephrase { .. }));
    }

    #[tokio::test]
    async fn custom_negative_response() {
        let router = router().with_config(RouterConfig {
            negative_response: "I don't remember that".to_string(),
            ..RouterConfig::default()
        });

        let decision = router
            .route_at(&question("watered", "plants"), t0())
            .await
            .unwrap();
        assert_eq!(decision.response, "I don't remember that");
    }

    #[test]
    fn missing_slot_degrades_to_empty() {
        let result = detect("I watered the plants", "watered", "");
        assert_eq!(slot_or_empty(&result, slots::VERB), "watered");
        assert_eq!(slot_or_empty(&result, slots::OBJECT), "");
        assert_eq!(slot_or_empty(&result, "location"), "");
    }

    #[test]
    fn decision_serializes_with_kind_tag() {
        let decision = RouteDecision {
            response: "no".to_string(),
            outcome: RouteOutcome::Unhandled {
                label: "smalltalk".to_string(),
            },
        };
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["outcome"]["kind"], "unhandled");
        assert_eq!(value["outcome"]["label"], "smalltalk");
    }
}
