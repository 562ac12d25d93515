//! PCM fixtures for pipeline tests
//!
//! Programmatically generated audio standing in for synthesized voice
//! lines. Generating buffers in code keeps tests free of checked-in
//! audio files and gives precise control over the one property the
//! gain stage cares about, the peak.
//!
//! Buffers are 16-bit signed mono at 16kHz unless a test asks for a
//! different rate in its output format.

use std::f32::consts::PI;

/// Sample rate of generated fixtures (Hz)
pub const SAMPLE_RATE: u32 = 16000;

/// 100ms of samples at 16kHz
pub const MS_100: usize = 1600;

/// One second of samples at 16kHz
pub const SECOND: usize = 16000;

/// Digital silence
pub fn generate_silence(duration_samples: usize) -> Vec<i16> {
    vec![0i16; duration_samples]
}

/// Digital silence as raw bytes
pub fn generate_silence_bytes(duration_samples: usize) -> Vec<u8> {
    samples_to_bytes(&generate_silence(duration_samples))
}

/// Sine tone whose loudest sample approaches `peak`.
///
/// The sampled maximum lands slightly under `peak` unless the period
/// divides the sample rate exactly, so assert with a margin.
pub fn generate_tone(duration_samples: usize, frequency: f32, peak: i16) -> Vec<i16> {
    let step = 2.0 * PI * frequency / SAMPLE_RATE as f32;
    (0..duration_samples)
        .map(|i| ((step * i as f32).sin() * f32::from(peak)) as i16)
        .collect()
}

/// Sine tone as raw little-endian bytes
pub fn generate_tone_bytes(duration_samples: usize, frequency: f32, peak: i16) -> Vec<u8> {
    samples_to_bytes(&generate_tone(duration_samples, frequency, peak))
}

/// A 440Hz tone peaking near 3000, far below full scale.
///
/// Useful wherever a test wants the gain stage to have real work to do.
pub fn generate_quiet_tone_bytes(duration_samples: usize) -> Vec<u8> {
    generate_tone_bytes(duration_samples, 440.0, 3000)
}

/// Convert i16 samples to little-endian bytes
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to i16 samples
pub fn bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Peak magnitude across samples; full scale is 32767, and a buffer
/// containing i16::MIN reports 32768.
pub fn peak_of(samples: &[i16]) -> u16 {
    samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_all_zero() {
        let silence = generate_silence(MS_100);
        assert_eq!(silence.len(), MS_100);
        assert_eq!(peak_of(&silence), 0);
    }

    #[test]
    fn test_tone_peak_is_controlled() {
        let tone = generate_tone(SECOND, 440.0, 3000);
        assert_eq!(tone.len(), SECOND);

        let peak = peak_of(&tone);
        assert!(peak <= 3000);
        assert!(peak > 2900, "sampled peak {peak} dropped too far below 3000");
    }

    #[test]
    fn test_byte_conversion_roundtrips() {
        let samples = vec![0i16, 257, -4681, i16::MAX, i16::MIN];
        let bytes = samples_to_bytes(&samples);
        assert_eq!(bytes.len(), samples.len() * 2);
        assert_eq!(bytes_to_samples(&bytes), samples);
    }
}
