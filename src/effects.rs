//! # Post-Processing Effects
//!
//! The final stage of the pipeline: convolution with an impulse response,
//! a single-tap echo, and peak normalization.
//!
//! Convolution runs in the frequency domain (zero-padded, linear). A stereo
//! impulse response convolves each channel independently against the mono
//! source and recombines as a two-channel output. The echo is a plain delay
//! tap, not a feedback line. Normalization scales the loudest peak to 0.95 of
//! full scale and leaves all-zero signals untouched.

use realfft::RealFftPlanner;

use crate::types::Signal;

/// Target peak after normalization, leaving headroom against clipping.
pub const PEAK_TARGET: f64 = 0.95;

/// Linear convolution of two real signals via FFT.
///
/// Both inputs are zero-padded to the full convolution length
/// `x.len() + y.len() - 1`; the result is not truncated.
pub fn fft_convolve(x: &[f64], y: &[f64]) -> Vec<f64> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }
    let n = x.len() + y.len() - 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut padded_x = x.to_vec();
    padded_x.resize(n, 0.0);
    let mut padded_y = y.to_vec();
    padded_y.resize(n, 0.0);

    let mut spectrum_x = fft.make_output_vec();
    let mut spectrum_y = fft.make_output_vec();
    fft.process(&mut padded_x, &mut spectrum_x).unwrap();
    fft.process(&mut padded_y, &mut spectrum_y).unwrap();

    // convolution theorem: pointwise product in the frequency domain
    for (a, b) in spectrum_x.iter_mut().zip(spectrum_y.iter()) {
        *a *= *b;
    }

    let mut result = ifft.make_output_vec();
    ifft.process(&mut spectrum_x, &mut result).unwrap();

    // realfft leaves the inverse transform unnormalized
    let scale = 1.0 / n as f64;
    for v in &mut result {
        *v *= scale;
    }
    result
}

/// Convolve a mono signal with an impulse response, truncated back to the
/// signal length. A stereo impulse response produces a stereo output.
pub fn convolve_with_impulse_response(signal: &[f64], ir: &Signal) -> Signal {
    let channel = |ir_channel: &[f64]| {
        let mut convolved = fft_convolve(signal, ir_channel);
        convolved.resize(signal.len(), 0.0);
        convolved
    };
    match ir {
        Signal::Mono(ir) => Signal::Mono(channel(ir)),
        Signal::Stereo { left, right } => Signal::Stereo {
            left: channel(left),
            right: channel(right),
        },
    }
}

/// The signal plus a copy of itself, decayed and shifted by `delay_samples`.
/// The returned buffer is `delay_samples` longer than the input.
fn delayed_sum(samples: &[f64], delay_samples: usize, decay: f64) -> Vec<f64> {
    let mut out = vec![0.0; samples.len() + delay_samples];
    for (i, &v) in samples.iter().enumerate() {
        out[i] += v;
        out[i + delay_samples] += v * decay;
    }
    out
}

/// Apply a single-tap echo.
///
/// Mono output is truncated back to the input length; stereo output keeps the
/// full tail, with the same delay and decay applied per channel.
pub fn add_echo(signal: &Signal, delay: f64, decay: f64, sample_rate: u32) -> Signal {
    let delay_samples = (delay * sample_rate as f64) as usize;
    match signal {
        Signal::Mono(samples) => {
            let mut out = delayed_sum(samples, delay_samples, decay);
            out.truncate(samples.len());
            Signal::Mono(out)
        }
        Signal::Stereo { left, right } => Signal::Stereo {
            left: delayed_sum(left, delay_samples, decay),
            right: delayed_sum(right, delay_samples, decay),
        },
    }
}

/// Scale a buffer so its peak hits [`PEAK_TARGET`]. All-zero buffers are left
/// untouched to avoid a division by zero.
pub fn normalize_peak(samples: &mut [f64]) {
    let peak = samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
    if peak == 0.0 {
        return;
    }
    let scale = PEAK_TARGET / peak;
    for v in samples {
        *v *= scale;
    }
}

/// Peak-normalize a signal; stereo channels share one joint peak so the
/// stereo image is preserved.
pub fn normalize(signal: &mut Signal) {
    let peak = signal.peak();
    if peak == 0.0 {
        return;
    }
    let scale = PEAK_TARGET / peak;
    match signal {
        Signal::Mono(samples) => {
            for v in samples {
                *v *= scale;
            }
        }
        Signal::Stereo { left, right } => {
            for v in left.iter_mut().chain(right.iter_mut()) {
                *v *= scale;
            }
        }
    }
}
