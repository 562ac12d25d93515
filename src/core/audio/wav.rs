//! WAV encoding and file output.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::AudioFormat;

pub type WriteResult<T> = Result<T, WriteError>;

/// Audio output failure.
#[derive(Error, Debug)]
pub enum WriteError {
    /// WAV encoding rejected the samples or format.
    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),

    /// The encoded file could not be written to disk.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Sink for finished audio.
#[async_trait]
pub trait AudioWriter: Send + Sync {
    /// Encode `samples` in `format` and persist them at `path`.
    async fn write(&self, path: &Path, samples: &[i16], format: AudioFormat) -> WriteResult<()>;
}

/// Writes self-describing WAV files, one per record.
///
/// The whole file is encoded in memory and written with a single
/// filesystem call, so a crash mid-batch leaves no half-written RIFF
/// headers. An existing file at the same path is overwritten.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavWriter;

#[async_trait]
impl AudioWriter for WavWriter {
    async fn write(&self, path: &Path, samples: &[i16], format: AudioFormat) -> WriteResult<()> {
        let encoded = encode_wav(samples, format)?;
        tokio::fs::write(path, encoded)
            .await
            .map_err(|source| WriteError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Encode samples as an in-memory WAV file.
fn encode_wav(samples: &[i16], format: AudioFormat) -> WriteResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Resolve a record's output path inside the destination directory.
pub fn output_path(dest: &Path, name: &str) -> PathBuf {
    dest.join(name)
}
