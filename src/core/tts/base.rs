//! Provider-agnostic synthesis interface.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Speech synthesis failure.
///
/// Provider adapters fold every failure mode (network, auth, rejected
/// SSML, unreadable response stream) into one kind with a descriptive
/// message. The batch layer treats all of them the same: the record
/// failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("synthesis failed: {message}")]
pub struct SynthesisError {
    message: String,
}

impl SynthesisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A client that turns a text payload into raw audio.
///
/// Voice selectors (engine, language, voice id) are fixed for the life
/// of the client; `synthesize` varies only in the text. The returned
/// bytes are raw signed 16-bit little-endian mono PCM at the client's
/// configured sample rate, with no container or header.
#[async_trait]
pub trait SynthesisClient: Send + Sync {
    async fn synthesize(&self, text: &str) -> SynthesisResult<Bytes>;
}
