//! Wiring and output rendering

use std::fmt::Write as _;
use std::sync::Arc;

use ai_speech::AudioPlayer;
use anyhow::Context;
use application::{
    ApplicationError, AssistantReply, AssistantService, EventMemory, IntentRouter,
};
use infrastructure::{
    AppConfig, IntentAdapter, PlaybackAdapter, SpeechAdapter, open_event_store, open_query_log,
};
use tracing::info;

/// Assemble the assistant pipeline from configuration
///
/// # Errors
///
/// Fails if the configuration is invalid or the event store cannot be opened.
pub fn build_service(config: &AppConfig) -> anyhow::Result<AssistantService> {
    config.validate().map_err(anyhow::Error::msg)?;

    std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
        format!(
            "cannot create data directory {}",
            config.storage.data_dir.display()
        )
    })?;

    let speech = Arc::new(SpeechAdapter::new(
        config.speech.clone(),
        config.retry.clone(),
    )?);
    let intent = Arc::new(IntentAdapter::new(
        config.intent.clone(),
        config.retry.clone(),
    )?);

    let store = open_event_store(&config.storage)?;
    let mut router =
        IntentRouter::new(EventMemory::new(store)).with_config(config.assistant.router_config());
    if let Some(query_log) = open_query_log(&config.storage) {
        router = router.with_query_log(query_log);
    }

    let player = AudioPlayer::new(config.output_dir());
    let player = if config.assistant.playback {
        player.with_command(
            config.assistant.player_command.clone(),
            config.assistant.player_args.clone(),
        )
    } else {
        player.without_player()
    };

    info!(
        backend = %config.storage.backend,
        playback = config.assistant.playback,
        "Assistant pipeline ready"
    );

    Ok(AssistantService::new(speech.clone(), intent, speech, router)
        .with_config(config.assistant_config())
        .with_playback(Arc::new(PlaybackAdapter::new(player))))
}

/// Human-readable summary of one request
#[must_use]
pub fn render_summary(reply: &AssistantReply) -> String {
    let query = &reply.query;
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(20));
    let _ = writeln!(out, "Query text: {}", query.query_text);
    let _ = writeln!(
        out,
        "Detected intent: {} (confidence: {})",
        query.intent, query.confidence
    );
    let _ = writeln!(out, "Verb: {}", query.verb().or_empty());
    let _ = writeln!(out, "Object: {}", query.object().or_empty());
    let _ = writeln!(out, "Fulfillment text: {}", query.fulfillment_text);
    let _ = writeln!(out, "Response: {}", reply.response());
    if let Some(playback) = &reply.playback {
        let _ = writeln!(out, "Audio: {}", playback.output_path.display());
    }
    out
}

/// Machine-readable form of one request
#[must_use]
pub fn render_json(reply: &AssistantReply) -> serde_json::Value {
    serde_json::json!({
        "transcript": reply.transcript,
        "query": reply.query,
        "response": reply.response(),
        "outcome": reply.decision.outcome,
        "audio_path": reply.playback.as_ref().map(|p| p.output_path.display().to_string()),
        "player_started": reply.playback.as_ref().is_some_and(|p| p.player_started),
        "processing_time_ms": reply.processing_time_ms,
    })
}

/// Single-line terminal message for a failed run
#[must_use]
pub fn error_line(err: &anyhow::Error) -> String {
    let temporary = err
        .downcast_ref::<ApplicationError>()
        .is_some_and(ApplicationError::is_retryable);
    if temporary {
        format!("error: {err:#} (temporary, try again later)")
    } else {
        format!("error: {err:#}")
    }
}
