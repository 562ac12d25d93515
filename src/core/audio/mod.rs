//! PCM audio handling.
//!
//! The synthesis provider returns raw signed 16-bit little-endian mono
//! PCM. This module decodes that byte stream, applies peak
//! normalization, and (via [`WavWriter`]) encodes the result as a WAV
//! file.

use thiserror::Error;

mod wav;

pub use wav::{AudioWriter, WavWriter, WriteError, WriteResult, output_path};

/// Sample layout of a PCM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Mono 16-bit PCM at the given sample rate.
    pub fn mono_16bit(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl Default for AudioFormat {
    /// 16 kHz mono 16-bit, the crate's native PCM format.
    fn default() -> Self {
        Self::mono_16bit(16_000)
    }
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Peak normalization failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Every sample is zero, so no gain brings the peak to full scale.
    #[error("audio contains only silence, nothing to normalize")]
    SilentInput,

    /// The byte stream does not divide into whole 16-bit samples.
    #[error("PCM byte stream has odd length {len}, expected whole 16-bit samples")]
    OddByteLength { len: usize },
}

/// Decode a little-endian 16-bit PCM byte stream into samples.
///
/// A trailing odd byte is dropped; [`normalize`] rejects odd-length
/// input before decoding, so the truncation only matters for direct
/// callers.
pub fn decode_samples(raw: &[u8]) -> Vec<i16> {
    raw.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Scale a PCM buffer so its loudest sample sits at full scale.
///
/// The gain is `i16::MAX / peak`, applied uniformly, so relative sample
/// amplitudes are preserved and the output peak lands exactly on 32767
/// (or -32767 when the loudest sample is negative). Output on input
/// that is already normalized is unchanged.
///
/// Empty and all-zero input has no peak to scale and is rejected with
/// [`NormalizeError::SilentInput`].
pub fn normalize(raw: &[u8]) -> NormalizeResult<Vec<i16>> {
    if raw.len() % 2 != 0 {
        return Err(NormalizeError::OddByteLength { len: raw.len() });
    }

    let samples = decode_samples(raw);

    // i16::MIN.abs() would overflow; unsigned_abs carries the full
    // 32768 magnitude.
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    if peak == 0 {
        return Err(NormalizeError::SilentInput);
    }

    let scale = f64::from(i16::MAX) / f64::from(peak);
    let normalized = samples
        .iter()
        .map(|s| {
            (f64::from(*s) * scale)
                .round()
                .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
        })
        .collect();

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
        samples
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect()
    }

    #[test]
    fn test_decode_samples_little_endian() {
        let decoded = decode_samples(&[0x01, 0x00, 0x00, 0x80, 0xFF, 0x7F]);
        assert_eq!(decoded, vec![1, i16::MIN, i16::MAX]);
    }

    #[test]
    fn test_normalize_scales_peak_to_full_scale() {
        let raw = pcm_bytes(&[100, -50, 25]);
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized[0], i16::MAX);
        assert_eq!(normalized.iter().map(|s| s.abs()).max(), Some(i16::MAX));
    }

    #[test]
    fn test_normalize_preserves_relative_amplitudes() {
        // 32767 / 4681 is exactly 7, so every sample scales by 7.
        let raw = pcm_bytes(&[4681, -2000, 33, 0]);
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized, vec![32767, -14000, 231, 0]);
    }

    #[test]
    fn test_normalize_preserves_length_and_order() {
        let raw = pcm_bytes(&[3, 1, 4, 1, 5]);
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.len(), 5);
        assert_eq!(normalized[1], normalized[3]);
        assert!(normalized[4] > normalized[2]);
    }

    #[test]
    fn test_normalize_negative_peak() {
        // i16::MIN has magnitude 32768, one past full scale.
        let raw = pcm_bytes(&[i16::MIN, 100]);
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized[0], -32767);
        assert!(normalized.iter().all(|s| *s > i16::MIN));
    }

    #[test]
    fn test_normalize_already_normalized_is_identity() {
        let raw = pcm_bytes(&[i16::MAX, -12000, 6000, -100]);
        let first = normalize(&raw).unwrap();
        let second = normalize(&pcm_bytes(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_silent_input_fails() {
        let raw = pcm_bytes(&[0, 0, 0, 0]);
        assert_eq!(normalize(&raw), Err(NormalizeError::SilentInput));
    }

    #[test]
    fn test_normalize_empty_input_fails() {
        assert_eq!(normalize(&[]), Err(NormalizeError::SilentInput));
    }

    #[test]
    fn test_normalize_odd_length_fails() {
        let err = normalize(&[0x01, 0x02, 0x03]).unwrap_err();
        assert_eq!(err, NormalizeError::OddByteLength { len: 3 });
    }

    #[test]
    fn test_audio_format_default_is_polly_pcm() {
        let format = AudioFormat::default();
        assert_eq!(format.sample_rate, 16_000);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
    }
}
