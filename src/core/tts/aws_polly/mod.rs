//! Amazon Polly synthesis adapter.
//!
//! Talks to Amazon Polly's SynthesizeSpeech API through the AWS SDK for
//! Rust, which handles request signing and credential management. Input
//! is always SSML and output is fixed to raw PCM (16-bit signed
//! little-endian, mono), the format the rest of the pipeline consumes.
//!
//! # Authentication
//!
//! AWS credentials come from the default chain:
//! 1. Environment variables: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
//! 2. AWS credentials file (`~/.aws/credentials`)
//! 3. IAM instance profile (for EC2/ECS/Lambda)
//!
//! The region is taken from [`PollySettings::region`] when set, otherwise
//! from the default chain (`AWS_DEFAULT_REGION`, profile, instance
//! metadata).

mod config;
mod provider;

pub use config::{
    DEFAULT_SAMPLE_RATE, MAX_TOTAL_LENGTH, PCM_SAMPLE_RATES, PollyEngine, PollySettings,
};
pub use provider::PollyTts;
