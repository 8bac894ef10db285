//! WAV format encoder using hound
//!
//! Mono output in 16-bit, 24-bit, or 32-bit float.

use crate::dsp::{normalize_peak, sanitize};
use crate::error::{ExportError, Result};
use crate::options::{BitDepth, ExportOptions, NormalizationMode};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;

/// WAV encoder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth
    pub bit_depth: BitDepth,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Int16,
        }
    }
}

impl WavConfig {
    pub fn new(sample_rate: u32, bit_depth: BitDepth) -> Self {
        Self {
            sample_rate,
            bit_depth,
        }
    }

    fn spec(&self) -> Result<WavSpec> {
        if self.sample_rate == 0 {
            return Err(ExportError::InvalidOptions(
                "sample rate must be positive".into(),
            ));
        }
        let (bits_per_sample, sample_format) = match self.bit_depth {
            BitDepth::Int16 => (16, SampleFormat::Int),
            BitDepth::Int24 => (24, SampleFormat::Int),
            BitDepth::Float32 => (32, SampleFormat::Float),
        };
        Ok(WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample,
            sample_format,
        })
    }
}

/// What an export wrote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    /// Frames written
    pub frames: usize,
    /// Normalization gain applied (1.0 when none)
    pub gain: f32,
}

/// Export mono audio to a WAV file using ExportOptions
pub fn export_wav(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    options.validate()?;
    let config = WavConfig::new(sample_rate, options.bit_depth);

    let mut processed = samples.to_vec();
    sanitize(&mut processed);

    let gain = match options.normalization {
        NormalizationMode::None => 1.0,
        NormalizationMode::Peak(target) => normalize_peak(&mut processed, target),
    };

    let path = path.as_ref();
    log::debug!(
        "Writing {} frames to {} ({} bit, gain {:.3})",
        processed.len(),
        path.display(),
        config.bit_depth.bits(),
        gain
    );
    encode_wav_file(&processed, path, &config)?;

    Ok(ExportSummary {
        frames: processed.len(),
        gain,
    })
}

/// Encode mono audio to a WAV file
///
/// # Arguments
/// * `samples` - Mono samples (normalized -1.0 to 1.0)
/// * `path` - Output file path
/// * `config` - WAV configuration
pub fn encode_wav_file(samples: &[f32], path: &Path, config: &WavConfig) -> Result<()> {
    let spec = config.spec()?;
    let mut writer = WavWriter::create(path, spec)?;
    write_samples(&mut writer, samples, config.bit_depth)?;
    writer.finalize()?;
    Ok(())
}

/// Encode mono audio to WAV in memory
///
/// # Returns
/// WAV file bytes
pub fn encode_wav_memory(samples: &[f32], config: &WavConfig) -> Result<Vec<u8>> {
    let spec = config.spec()?;
    let mut buffer = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, spec)?;
        write_samples(&mut writer, samples, config.bit_depth)?;
        // Finalize writes the header and flushes
        writer.finalize()?;
    }
    Ok(buffer)
}

fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f32],
    bit_depth: BitDepth,
) -> Result<()> {
    match bit_depth {
        BitDepth::Int16 => {
            for &sample in samples {
                writer.write_sample(float_to_i16(sample))?;
            }
        }
        BitDepth::Int24 => {
            for &sample in samples {
                writer.write_sample(float_to_i24(sample))?;
            }
        }
        BitDepth::Float32 => {
            for &sample in samples {
                writer.write_sample(sample.clamp(-1.0, 1.0))?;
            }
        }
    }
    Ok(())
}

/// Convert float sample to 16-bit integer with clipping (round half away from zero)
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 32767.0).round() as i16
}

/// Convert float sample to 24-bit integer (stored as i32) with clipping
#[inline]
pub fn float_to_i24(sample: f32) -> i32 {
    let clamped = f64::from(sample.clamp(-1.0, 1.0));
    (clamped * 8_388_607.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_config_default() {
        let config = WavConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.bit_depth, BitDepth::Int16);
    }

    #[test]
    fn test_float_to_i16() {
        assert_eq!(float_to_i16(0.0), 0);
        assert_eq!(float_to_i16(1.0), 32767);
        assert_eq!(float_to_i16(-1.0), -32767);
        // clipping
        assert_eq!(float_to_i16(1.5), 32767);
        assert_eq!(float_to_i16(-1.5), -32767);
        // rounds rather than truncates
        assert_eq!(float_to_i16(0.5), 16384);
        assert_eq!(float_to_i16(-0.5), -16384);
    }

    #[test]
    fn test_float_to_i24() {
        assert_eq!(float_to_i24(0.0), 0);
        assert_eq!(float_to_i24(1.0), 8_388_607);
        assert_eq!(float_to_i24(-1.0), -8_388_607);
    }

    #[test]
    fn test_encode_wav_memory() {
        let samples = vec![0.0, 0.5, -0.5];
        let bytes = encode_wav_memory(&samples, &WavConfig::default()).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte header plus three 16-bit samples
        assert_eq!(bytes.len(), 44 + 6);
    }

    #[test]
    fn test_encode_empty_buffer() {
        let bytes = encode_wav_memory(&[], &WavConfig::default()).unwrap();
        assert_eq!(bytes.len(), 44);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = WavConfig::new(0, BitDepth::Int16);
        assert!(matches!(
            encode_wav_memory(&[0.0], &config),
            Err(ExportError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_export_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples = vec![0.0, 0.25, -0.5, f32::NAN];

        let summary = export_wav(&path, &samples, 22050, &ExportOptions::default()).unwrap();
        assert_eq!(summary.frames, 4);
        assert!((summary.gain - 1.9).abs() < 1e-6);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read[0], 0);
        assert_eq!(read[2], float_to_i16(-0.95));
        assert_eq!(read[3], 0);
    }

    #[test]
    fn test_export_float_without_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let options = ExportOptions::default()
            .with_bit_depth(BitDepth::Float32)
            .with_normalization(NormalizationMode::None);

        export_wav(&path, &[0.1, -0.2], 48000, &options).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_format, SampleFormat::Float);
        let read: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![0.1, -0.2]);
    }
}
