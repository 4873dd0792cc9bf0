//! End-to-end pipeline tests against mocked Google endpoints
//!
//! Wires the real adapters and the flat-file event store into the assistant
//! service; only the HTTP services are mocked.

use std::sync::Arc;

use ai_intent::IntentConfig;
use ai_speech::{AudioPlayer, SpeechConfig};
use application::{
    ApplicationError, AssistantRequest, AssistantService, EventMemory, IntentRouter, RouteOutcome,
};
use domain::{EventId, LanguageCode, SessionId};
use infrastructure::{
    FileEventStore, FileQueryLog, IntentAdapter, PlaybackAdapter, RetryConfig, SpeechAdapter,
};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

const SESSION: &str = "pipeline-session";

fn speech_config(base_url: &str) -> SpeechConfig {
    SpeechConfig {
        api_key: Some(SecretString::from("test-key")),
        stt_base_url: base_url.to_string(),
        tts_base_url: base_url.to_string(),
        timeout_ms: 5000,
        ..Default::default()
    }
}

fn intent_config(base_url: &str) -> IntentConfig {
    IntentConfig {
        project_id: "speaker-test".to_string(),
        api_key: Some(SecretString::from("test-key")),
        base_url: base_url.to_string(),
        timeout_ms: 5000,
        ..Default::default()
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_delay_ms: 1,
        max_delay_ms: 5,
        ..RetryConfig::default()
    }
    .without_jitter()
}

async fn mount_transcript(server: &MockServer, transcript: &str) {
    Mock::given(method("POST"))
        .and(path("/speech:recognize"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "alternatives": [{ "transcript": transcript, "confidence": 0.93 }] }]
        })))
        .mount(server)
        .await;
}

async fn mount_intent(
    server: &MockServer,
    query_text: &str,
    intent: &str,
    fulfillment: &str,
    parameters: serde_json::Value,
) {
    Mock::given(method("POST"))
        .and(path(format!(
            "/projects/speaker-test/agent/sessions/{SESSION}:detectIntent"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responseId": "resp-1",
            "queryResult": {
                "queryText": query_text,
                "parameters": parameters,
                "fulfillmentText": fulfillment,
                "intent": { "displayName": intent },
                "intentDetectionConfidence": 0.88
            }
        })))
        .mount(server)
        .await;
}

async fn mount_synthesis(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/text:synthesize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            // "//uQ" is the base64 form of an MP3 frame header
            "audioContent": "//uQAA=="
        })))
        .mount(server)
        .await;
}

struct Harness {
    service: AssistantService,
    data_dir: tempfile::TempDir,
    audio_path: String,
}

fn harness(server: &MockServer) -> Harness {
    let data_dir = tempfile::tempdir().unwrap();
    let audio_path = data_dir.path().join("speech.raw");
    std::fs::write(&audio_path, vec![0u8; 320]).unwrap();

    let speech = Arc::new(SpeechAdapter::new(speech_config(&server.uri()), fast_retry()).unwrap());
    let intent = Arc::new(IntentAdapter::new(intent_config(&server.uri()), fast_retry()).unwrap());
    let store = Arc::new(FileEventStore::open(data_dir.path()).unwrap());
    let router = IntentRouter::new(EventMemory::new(store))
        .with_query_log(Arc::new(FileQueryLog::in_dir(data_dir.path())));
    let playback = Arc::new(PlaybackAdapter::new(
        AudioPlayer::new(data_dir.path()).without_player(),
    ));

    let service = AssistantService::new(speech.clone(), intent, speech, router)
        .with_playback(playback);

    Harness {
        service,
        audio_path: audio_path.to_string_lossy().into_owned(),
        data_dir,
    }
}

fn request(audio_path: &str) -> AssistantRequest {
    AssistantRequest::new(
        SessionId::parse(SESSION).unwrap(),
        LanguageCode::default(),
        audio_path,
    )
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
async fn record_then_question_answers_with_elapsed_minutes() {
    let server = MockServer::start().await;
    let h = harness(&server);

    mount_transcript(&server, "I watered the plants").await;
    mount_intent(
        &server,
        "I watered the plants",
        "event.detect",
        "Okay, I'll remember that",
        serde_json::json!({ "verb": ["watered"], "object": ["plants"] }),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(reply.transcript, "I watered the plants");
    assert_eq!(reply.response(), "Okay, I'll remember that");
    assert_eq!(
        reply.decision.outcome,
        RouteOutcome::Recorded { id: EventId::FIRST }
    );
    assert!(h.data_dir.path().join("entry/0.txt").exists());
    assert!(h.data_dir.path().join("timestamp/0.txt").exists());

    let playback = reply.playback.unwrap();
    assert!(!playback.player_started);
    assert_eq!(playback.output_path, h.data_dir.path().join("output.mp3"));

    let log = std::fs::read_to_string(h.data_dir.path().join("queries.txt")).unwrap();
    assert!(log.starts_with("I watered the plants "));

    server.reset().await;
    mount_transcript(&server, "when did I water the plants").await;
    mount_intent(
        &server,
        "when did I water the plants",
        "event.question",
        "You watered the plants",
        serde_json::json!({ "verb": ["watered"], "object": ["plants"] }),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(
        reply.response(),
        "You watered the plants, you did it 0 minutes ago"
    );
    assert!(matches!(
        reply.decision.outcome,
        RouteOutcome::Answered { minutes_ago: 0, .. }
    ));
}

#[tokio::test]
async fn detect_without_fulfillment_still_records_and_answers() {
    let server = MockServer::start().await;
    let h = harness(&server);

    mount_transcript(&server, "I locked the door").await;
    mount_intent(
        &server,
        "I locked the door",
        "event.detect",
        "",
        serde_json::json!({ "verb": ["locked"], "object": ["door"] }),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(reply.response(), "Okay, I'll remember that");
    assert_eq!(
        std::fs::read_dir(h.data_dir.path().join("entry"))
            .unwrap()
            .count(),
        1
    );
    assert_eq!(
        std::fs::read_to_string(h.data_dir.path().join("entry/0.txt")).unwrap(),
        "I locked the door"
    );
}

#[tokio::test]
async fn question_without_match_answers_no() {
    let server = MockServer::start().await;
    let h = harness(&server);

    mount_transcript(&server, "when did I feed the cat").await;
    mount_intent(
        &server,
        "when did I feed the cat",
        "event.question",
        "You fed the cat",
        serde_json::json!({ "verb": ["fed"], "object": ["cat"] }),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(reply.response(), "no");
    assert!(!h.data_dir.path().join("queries.txt").exists());
}

#[tokio::test]
async fn question_with_missing_parameters_does_not_fail() {
    let server = MockServer::start().await;
    let h = harness(&server);

    mount_transcript(&server, "when did I do it").await;
    mount_intent(
        &server,
        "when did I do it",
        "event.question",
        "You did it",
        serde_json::json!({}),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(reply.response(), "no");
}

#[tokio::test]
async fn transient_transcription_failure_is_retried() {
    let server = MockServer::start().await;
    let h = harness(&server);

    Mock::given(method("POST"))
        .and(path("/speech:recognize"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_transcript(&server, "I took my pills").await;
    mount_intent(
        &server,
        "I took my pills",
        "event.detect",
        "Noted",
        serde_json::json!({ "verb": ["took"], "object": ["pills"] }),
    )
    .await;
    mount_synthesis(&server).await;

    let reply = h.service.handle(&request(&h.audio_path)).await.unwrap();

    assert_eq!(reply.response(), "Noted");
}

#[tokio::test]
async fn missing_audio_file_is_a_transcription_error() {
    let server = MockServer::start().await;
    let h = harness(&server);

    let err = h
        .service
        .handle(&request("/definitely/not/here.raw"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Transcription(_)));
}

#[tokio::test]
async fn rejected_credentials_surface_as_intent_error() {
    let server = MockServer::start().await;
    let h = harness(&server);

    mount_transcript(&server, "I locked the door").await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/projects/speaker-test/agent/sessions/{SESSION}:detectIntent"
        )))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = h.service.handle(&request(&h.audio_path)).await.unwrap_err();

    assert!(matches!(err, ApplicationError::IntentService(_)));
}
