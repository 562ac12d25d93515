pub mod aws_polly;
mod base;

pub use aws_polly::{PCM_SAMPLE_RATES, PollyEngine, PollySettings, PollyTts};
pub use base::{SynthesisClient, SynthesisError, SynthesisResult};
