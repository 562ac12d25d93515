//! Configuration for a batch run.
//!
//! A [`RunConfig`] carries everything `main` collects from the CLI:
//! input/output paths, scheduling knobs, and voice selection. Values are
//! checked up front with [`RunConfig::validate`], the destination
//! directory is created once per run with
//! [`RunConfig::prepare_destination`], and the remaining accessors
//! translate raw values into the typed forms the pipeline consumes.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::audio::AudioFormat;
use crate::core::batch::{DEFAULT_CONCURRENCY, FailurePolicy};
use crate::core::tts::aws_polly::DEFAULT_SAMPLE_RATE;
use crate::core::tts::{PCM_SAMPLE_RATES, PollyEngine, PollySettings};

/// Configuration failure detected before any synthesis starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The destination directory is already present.
    #[error("destination directory {} already exists, move it aside first", .0.display())]
    DestinationExists(PathBuf),

    /// The destination directory could not be created.
    #[error("failed to create destination directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sample rate is outside what Polly PCM output supports.
    #[error("sample rate {rate} Hz is not supported for PCM output, supported rates: {supported:?}")]
    UnsupportedSampleRate {
        rate: u32,
        supported: &'static [u32],
    },

    /// The concurrency cap must allow at least one task.
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

/// Batch run configuration.
///
/// Field values arrive raw from the CLI; [`RunConfig::voice_settings`]
/// and friends convert them into typed pipeline inputs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    // Input and output
    /// CSV script path
    pub input: PathBuf,
    /// Destination directory for generated WAV files (must not exist yet)
    pub dest: PathBuf,

    // Scheduling
    /// Cap on concurrently running synthesis tasks
    pub concurrency: usize,
    /// Keep running after a record fails instead of aborting the batch
    pub keep_going: bool,

    // Voice selection
    /// Polly engine name (standard, neural, long-form, generative)
    pub engine: String,
    /// Polly language code (e.g. "en-US")
    pub language: String,
    /// Polly voice id (e.g. "Matthew")
    pub voice: String,
    /// PCM sample rate in Hz (8000 or 16000)
    pub sample_rate: u32,
    /// AWS region override; `None` uses the default region chain
    pub region: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("custom.csv"),
            dest: PathBuf::from("custom"),
            concurrency: DEFAULT_CONCURRENCY,
            keep_going: false,
            engine: "standard".to_string(),
            language: "en-US".to_string(),
            voice: "Matthew".to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            region: None,
        }
    }
}

impl RunConfig {
    /// Check invariants that do not touch the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency < 1 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if !PCM_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(ConfigError::UnsupportedSampleRate {
                rate: self.sample_rate,
                supported: PCM_SAMPLE_RATES,
            });
        }
        Ok(())
    }

    /// Create the destination directory.
    ///
    /// One directory level is created, like `mkdir`. Fails if the
    /// directory already exists so an earlier run's output is never
    /// silently mixed with a new one.
    pub fn prepare_destination(&self) -> Result<(), ConfigError> {
        if self.dest.exists() {
            return Err(ConfigError::DestinationExists(self.dest.clone()));
        }
        std::fs::create_dir(&self.dest).map_err(|source| ConfigError::CreateDir {
            path: self.dest.clone(),
            source,
        })
    }

    /// Audio format every output file is written in.
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::mono_16bit(self.sample_rate)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        }
    }

    /// Voice settings handed to the Polly client.
    pub fn voice_settings(&self) -> PollySettings {
        PollySettings {
            engine: PollyEngine::from_str_or_default(&self.engine),
            language: self.language.clone(),
            voice: self.voice.clone(),
            sample_rate: self.sample_rate,
            region: self.region.clone(),
        }
    }
}
