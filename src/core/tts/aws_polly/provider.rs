//! Amazon Polly synthesis client implementation.
//!
//! Implements the `SynthesisClient` trait on top of Amazon Polly's
//! SynthesizeSpeech operation via the AWS SDK for Rust. Every request
//! submits SSML text and asks for raw PCM output (16-bit signed
//! little-endian, mono) at one of the rates Polly supports for PCM.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_polly::Client as PollyClient;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, TextType, VoiceId};
use bytes::Bytes;
use tracing::{debug, error, info};

use super::config::{MAX_TOTAL_LENGTH, PollyEngine, PollySettings};
use crate::core::tts::base::{SynthesisClient, SynthesisError, SynthesisResult};

// =============================================================================
// SDK Type Mapping
// =============================================================================

/// Map our engine selection onto the SDK's generated enum
fn sdk_engine(engine: PollyEngine) -> Engine {
    match engine {
        PollyEngine::Standard => Engine::Standard,
        PollyEngine::Neural => Engine::Neural,
        PollyEngine::LongForm => Engine::LongForm,
        PollyEngine::Generative => Engine::Generative,
    }
}

// =============================================================================
// Amazon Polly Synthesis Client
// =============================================================================

/// Amazon Polly synthesis client using the AWS SDK.
///
/// Voice settings are fixed at construction; every `synthesize` call
/// sends one SynthesizeSpeech request and collects the streamed PCM
/// response into a single buffer. The SDK client is internally pooled
/// and cheap to share, so one instance serves the whole batch.
pub struct PollyTts {
    /// AWS Polly client
    client: PollyClient,
    /// Voice selection for every request
    settings: PollySettings,
    /// Monotonic id tagging each request's log lines
    request_counter: AtomicU64,
}

impl PollyTts {
    /// Connect using the default AWS credential and region chain.
    ///
    /// Credentials resolve from the environment, the shared credentials
    /// file, or an IAM role. `settings.region` overrides the chain's
    /// region when set.
    pub async fn connect(settings: PollySettings) -> Self {
        info!(
            voice = %settings.voice,
            engine = %settings.engine,
            language = %settings.language,
            "Building Amazon Polly client"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        Self::from_client(PollyClient::new(&shared_config), settings)
    }

    /// Wrap an already-built SDK client.
    ///
    /// Lets callers point the client at a custom endpoint or supply
    /// explicit credentials.
    pub fn from_client(client: PollyClient, settings: PollySettings) -> Self {
        Self {
            client,
            settings,
            request_counter: AtomicU64::new(0),
        }
    }

    /// Get the configured voice settings
    pub fn settings(&self) -> &PollySettings {
        &self.settings
    }
}

#[async_trait]
impl SynthesisClient for PollyTts {
    async fn synthesize(&self, text: &str) -> SynthesisResult<Bytes> {
        // Polly rejects oversized input; fail before the network call.
        if text.len() > MAX_TOTAL_LENGTH {
            return Err(SynthesisError::new(format!(
                "input length {} exceeds the {} character limit",
                text.len(),
                MAX_TOTAL_LENGTH
            )));
        }

        let seq = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;

        debug!(
            request = seq,
            text_len = text.len(),
            voice = %self.settings.voice,
            engine = %self.settings.engine,
            "Requesting speech synthesis"
        );

        let response = self
            .client
            .synthesize_speech()
            .text(text)
            .text_type(TextType::Ssml)
            .output_format(OutputFormat::Pcm)
            .sample_rate(self.settings.sample_rate.to_string())
            .engine(sdk_engine(self.settings.engine))
            .language_code(LanguageCode::from(self.settings.language.as_str()))
            .voice_id(VoiceId::from(self.settings.voice.as_str()))
            .send()
            .await
            .map_err(|e| {
                error!(request = seq, error = %e, "Polly request failed");
                SynthesisError::new(format!("Polly API error: {}", e))
            })?;

        let collected = response.audio_stream.collect().await.map_err(|e| {
            error!(request = seq, error = %e, "Audio stream read failed");
            SynthesisError::new(format!("audio stream read failed: {}", e))
        })?;

        let audio = collected.into_bytes();

        debug!(
            request = seq,
            audio_bytes = audio.len(),
            "Received synthesized audio"
        );

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_polly::config::{Builder as PollyConfigBuilder, Credentials};

    fn offline_client() -> PollyClient {
        // Static credentials and an unroutable endpoint; requests are
        // never sent in these tests.
        let config = PollyConfigBuilder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test-key", "test-secret", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .build();
        PollyClient::from_conf(config)
    }

    #[test]
    fn test_sdk_engine_mapping() {
        assert_eq!(sdk_engine(PollyEngine::Standard), Engine::Standard);
        assert_eq!(sdk_engine(PollyEngine::Neural), Engine::Neural);
        assert_eq!(sdk_engine(PollyEngine::LongForm), Engine::LongForm);
        assert_eq!(sdk_engine(PollyEngine::Generative), Engine::Generative);
    }

    #[test]
    fn test_from_client_keeps_settings() {
        let settings = PollySettings {
            voice: "Joanna".to_string(),
            ..Default::default()
        };
        let tts = PollyTts::from_client(offline_client(), settings);
        assert_eq!(tts.settings().voice, "Joanna");
    }

    #[tokio::test]
    async fn test_oversized_text_rejected_before_request() {
        let tts = PollyTts::from_client(offline_client(), PollySettings::default());

        let text = "x".repeat(MAX_TOTAL_LENGTH + 1);
        let err = tts.synthesize(&text).await.unwrap_err();
        assert!(err.message().contains("character limit"));
    }
}
