//! Configuration types for the Amazon Polly synthesis client.

// =============================================================================
// Polly Engine
// =============================================================================

/// Synthesis engine families Polly exposes.
///
/// Quality rises and per-character price with it, from `Standard` up
/// through `Generative`. Not every voice supports every engine; Polly
/// rejects unsupported combinations at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollyEngine {
    /// Concatenative voices, the cheapest tier
    #[default]
    Standard,
    /// Neural voices
    Neural,
    /// Voices tuned for long narration
    LongForm,
    /// Generative voices, the most natural tier
    Generative,
}

impl PollyEngine {
    /// The identifier the Polly API expects.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::LongForm => "long-form",
            Self::Generative => "generative",
        }
    }

    /// Parse from string, with fallback to Standard.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "standard" => Self::Standard,
            "neural" => Self::Neural,
            "long-form" | "longform" | "long_form" => Self::LongForm,
            "generative" => Self::Generative,
            _ => Self::default(),
        }
    }
}

impl std::fmt::Display for PollyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Service Limits
// =============================================================================

/// Sample rates Polly supports for PCM output (Hz).
pub const PCM_SAMPLE_RATES: &[u32] = &[8000, 16000];

/// Default PCM sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Largest input Polly accepts per request, SSML markup included
/// (characters).
pub const MAX_TOTAL_LENGTH: usize = 6000;

// =============================================================================
// Voice Settings
// =============================================================================

/// Voice selection for a synthesis run.
///
/// Language code and voice id pass through to the API as-is, so any
/// voice Polly offers is usable without a catalog here. See
/// <https://docs.aws.amazon.com/polly/latest/dg/voicelist.html> for the
/// full list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollySettings {
    /// Engine family to synthesize with
    pub engine: PollyEngine,
    /// Polly language code (e.g. "en-US")
    pub language: String,
    /// Polly voice id (e.g. "Matthew")
    pub voice: String,
    /// PCM sample rate in Hz (8000 or 16000)
    pub sample_rate: u32,
    /// AWS region override; `None` uses the default region chain
    pub region: Option<String>,
}

impl Default for PollySettings {
    fn default() -> Self {
        Self {
            engine: PollyEngine::default(),
            language: "en-US".to_string(),
            voice: "Matthew".to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            region: None,
        }
    }
}
