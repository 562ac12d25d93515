pub mod audio;
pub mod batch;
pub mod record;
pub mod tts;

// Re-export commonly used types for convenience
pub use audio::{
    AudioFormat, AudioWriter, NormalizeError, NormalizeResult, WavWriter, WriteError, WriteResult,
    decode_samples, normalize, output_path,
};

pub use batch::{
    BatchOutcome, BatchScheduler, BatchState, DEFAULT_CONCURRENCY, FailurePolicy, TaskError,
};

pub use record::{ParseError, Record, parse_records};

pub use tts::{
    PCM_SAMPLE_RATES, PollyEngine, PollySettings, PollyTts, SynthesisClient, SynthesisError,
    SynthesisResult,
};
