//! Google Cloud speech provider
//!
//! Implements `SpeechToText` with the Speech-to-Text v1 `speech:recognize`
//! method and `TextToSpeech` with the Text-to-Speech v1 `text:synthesize`
//! method. Both are plain JSON over HTTPS; audio travels base64-encoded.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{SpeechConfig, SsmlGender};
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioEncoding, AudioSource, SynthesisInput, Transcription};

/// Google Cloud speech provider implementing both STT and TTS
#[derive(Debug, Clone)]
pub struct GoogleSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl GoogleSpeechProvider {
    /// Create a new Google speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn recognize_url(&self) -> String {
        format!("{}/speech:recognize", self.config.stt_base_url)
    }

    fn synthesize_url(&self) -> String {
        format!("{}/text:synthesize", self.config.tts_base_url)
    }

    /// Attach credentials; the API key wins when both are configured
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.config.api_key {
            request.query(&[("key", key.expose_secret())])
        } else if let Some(token) = &self.config.access_token {
            request.bearer_auth(token.expose_secret())
        } else {
            request
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> SpeechError {
        if err.is_timeout() {
            SpeechError::Timeout(self.config.timeout_ms)
        } else {
            SpeechError::from(err)
        }
    }

    async fn recognition_audio(source: &AudioSource) -> Result<RecognitionAudio, SpeechError> {
        match source {
            AudioSource::CloudStorage(uri) => Ok(RecognitionAudio {
                content: None,
                uri: Some(uri.clone()),
            }),
            AudioSource::LocalFile(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    SpeechError::InvalidAudio(format!("Cannot read {}: {e}", path.display()))
                })?;
                if data.is_empty() {
                    return Err(SpeechError::InvalidAudio(format!(
                        "Audio file {} is empty",
                        path.display()
                    )));
                }
                debug!(audio_size = data.len(), "Read local audio");
                Ok(RecognitionAudio {
                    content: Some(BASE64.encode(data)),
                    uri: None,
                })
            },
        }
    }
}

/// `speech:recognize` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: AudioEncoding,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
    #[serde(default)]
    language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: Option<f32>,
}

/// `text:synthesize` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: TtsInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: TtsAudioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum TtsInput<'a> {
    Text(&'a str),
    Ssml(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    ssml_gender: SsmlGender,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsAudioConfig {
    audio_encoding: AudioEncoding,
    speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Map a non-success response to an error
///
/// `fallback` builds the operation-specific variant for anything that is not
/// a rate limit, auth failure or outage.
async fn error_from_response(
    response: Response,
    fallback: fn(String) -> SpeechError,
) -> SpeechError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&body).ok().map(|e| e.error);
    let message = detail
        .as_ref()
        .map_or_else(|| format!("HTTP {status}: {body}"), |d| d.message.clone());

    match (status.as_u16(), detail.and_then(|d| d.status).as_deref()) {
        (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => SpeechError::RateLimited,
        (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
            SpeechError::Unauthorized(message)
        },
        (503, _) | (_, Some("UNAVAILABLE")) => SpeechError::ServiceUnavailable(message),
        _ => fallback(message),
    }
}

/// Join the top alternative of each result; results are consecutive parts of the audio
fn assemble_transcript(results: &[RecognitionResult]) -> Option<(String, Option<f32>)> {
    let best: Vec<&RecognitionAlternative> = results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .filter(|a| !a.transcript.trim().is_empty())
        .collect();

    if best.is_empty() {
        return None;
    }

    let text = best
        .iter()
        .map(|a| a.transcript.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let scores: Vec<f32> = best.iter().filter_map(|a| a.confidence).collect();
    #[allow(clippy::cast_precision_loss)]
    let confidence =
        (!scores.is_empty()).then(|| scores.iter().sum::<f32>() / scores.len() as f32);

    Some((text, confidence))
}

#[async_trait]
impl SpeechToText for GoogleSpeechProvider {
    #[instrument(skip(self), fields(source = %source, encoding = %source.encoding()))]
    async fn transcribe(
        &self,
        source: &AudioSource,
        language_code: &str,
    ) -> Result<Transcription, SpeechError> {
        debug!("Transcribing audio with Google Speech-to-Text");

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: source.encoding(),
                sample_rate_hertz: self.config.sample_rate_hertz,
                language_code,
            },
            audio: Self::recognition_audio(source).await?,
        };

        let response = self
            .authorize(self.client.post(self.recognize_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, SpeechError::TranscriptionFailed).await);
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let (text, confidence) =
            assemble_transcript(&body.results).ok_or(SpeechError::NoSpeechDetected)?;

        let language = body
            .results
            .iter()
            .find_map(|r| r.language_code.clone())
            .unwrap_or_else(|| language_code.to_string());

        debug!(
            text_len = text.len(),
            results = body.results.len(),
            confidence = ?confidence,
            "Transcription complete"
        );

        let mut transcription = Transcription::new(text).with_language(language);
        if let Some(confidence) = confidence {
            transcription = transcription.with_confidence(confidence);
        }
        Ok(transcription)
    }
}

#[async_trait]
impl TextToSpeech for GoogleSpeechProvider {
    #[instrument(skip(self, input), fields(text_len = input.content().len(), language = %language_code))]
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        language_code: &str,
    ) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech with Google Text-to-Speech");

        if input.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let request = SynthesizeRequest {
            input: match input {
                SynthesisInput::Text(text) => TtsInput::Text(text),
                SynthesisInput::Ssml(ssml) => TtsInput::Ssml(ssml),
            },
            voice: VoiceSelection {
                language_code,
                name: self.config.voice_name.as_deref(),
                ssml_gender: self.config.ssml_gender,
            },
            audio_config: TtsAudioConfig {
                audio_encoding: self.config.output_encoding,
                speaking_rate: self.config.speaking_rate,
            },
        };

        let response = self
            .authorize(self.client.post(self.synthesize_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, SpeechError::SynthesisFailed).await);
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let audio = BASE64
            .decode(body.audio_content.as_bytes())
            .map_err(|e| SpeechError::InvalidResponse(format!("Invalid audio content: {e}")))?;

        if audio.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Service returned no audio".to_string(),
            ));
        }

        debug!(audio_size = audio.len(), "Speech synthesis complete");
        Ok(AudioData::new(audio, self.config.output_encoding))
    }
}
