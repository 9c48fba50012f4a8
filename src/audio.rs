//! # Audio I/O
//!
//! WAV loading for impulse responses and WAV writing for rendered output.
//!
//! Impulse responses are sampled acoustic fingerprints (a recorded room or
//! cabinet) applied to the mix by convolution. Mono and two-channel files are
//! supported; integer samples are normalized to f64 in [-1.0, 1.0].

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::TabSynthError;
use crate::types::Signal;

/// Load an impulse response from a WAV file.
///
/// 1 channel yields [`Signal::Mono`], 2 channels [`Signal::Stereo`]; anything
/// else is rejected.
pub fn load_impulse_response(path: impl AsRef<Path>) -> Result<Signal, TabSynthError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<Result<_, _>>()?
        }
    };

    log::debug!(
        "loaded impulse response: {} frames, {} channel(s), {} Hz",
        samples.len() / spec.channels as usize,
        spec.channels,
        spec.sample_rate
    );

    match spec.channels {
        1 => Ok(Signal::Mono(samples)),
        2 => {
            let mut left = Vec::with_capacity(samples.len() / 2);
            let mut right = Vec::with_capacity(samples.len() / 2);
            for frame in samples.chunks_exact(2) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            Ok(Signal::Stereo { left, right })
        }
        n => Err(TabSynthError::UnsupportedFormat(format!(
            "impulse response has {n} channels, expected 1 or 2"
        ))),
    }
}

/// Write a signal to a 16-bit PCM WAV file.
pub fn write_wav(
    path: impl AsRef<Path>,
    signal: &Signal,
    sample_rate: u32,
) -> Result<(), TabSynthError> {
    let spec = WavSpec {
        channels: signal.channels(),
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let quantize = |v: f64| (v.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
    match signal {
        Signal::Mono(samples) => {
            for &sample in samples {
                writer.write_sample(quantize(sample))?;
            }
        }
        Signal::Stereo { left, right } => {
            for (&l, &r) in left.iter().zip(right.iter()) {
                writer.write_sample(quantize(l))?;
                writer.write_sample(quantize(r))?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}
