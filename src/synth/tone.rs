//! Single-note additive synthesis.
//!
//! A tone is the sum of the string's configured harmonic partials, each with
//! an inharmonicity-adjusted frequency, a pluck-position-dependent amplitude,
//! and an order-dependent decay. The sum is shaped by an attack ramp and a
//! three-stage release, a thin layer of decaying noise is added, and the
//! whole buffer is scaled by the string's dynamic range factor.

use std::f64::consts::PI;

use crate::error::TabSynthError;
use crate::types::{GuitarString, Instrument};

/// Onset delay between a pluck and the start of its envelope, in seconds.
const ENVELOPE_ONSET: f64 = 0.01;

/// Fundamental frequency of a fretted note, in 12-tone equal temperament:
/// each fret raises the open-string frequency by a semitone.
pub fn fret_to_frequency(string: &GuitarString, fret: u32) -> f64 {
    string.base_frequency * 2f64.powf(fret as f64 / 12.0)
}

/// Attenuation for a harmonic plucked near one of its standing-wave nodes.
///
/// Plucking within ±0.005 of the node position `(h - 1) / (2h)` leaves that
/// harmonic with nothing to excite, so its amplitude is forced to zero.
fn modal_adjustment(harmonic: usize, pluck_position: f64) -> f64 {
    let node = (harmonic as f64 - 1.0) / (2.0 * harmonic as f64);
    if (pluck_position - node).abs() < 0.005 {
        0.0
    } else {
        1.0
    }
}

/// Attack envelope: a blend of a sigmoid ramp and a sine ramp.
///
/// The sigmoid's slow initial slope sounds wrong for very fast plucks, so
/// short attack durations weight the sine ramp more.
fn attack_curve(t: f64, attack_duration: f64) -> f64 {
    let sigmoid = 1.0 / (1.0 + (-12.0 * (t / attack_duration - 1.0)).exp());
    let sinusoid = if t < attack_duration {
        (PI * t / (2.0 * attack_duration)).sin()
    } else {
        1.0
    };
    let blend = (attack_duration * 200.0).clamp(0.0, 1.0);
    (1.0 - blend) * sigmoid + blend * sinusoid
}

/// Release envelope: weighted sum of fast, mid, and very-slow exponential
/// decays, gated to zero once the string's maximum sustain is exceeded.
fn release_curve(t: f64, string: &GuitarString) -> f64 {
    if t >= string.max_duration {
        return 0.0;
    }
    string.fast_decay_weight * (-string.fast_decay_rate * t).exp()
        + string.mid_decay_weight * (-string.mid_decay_rate * t).exp()
        + string.very_slow_decay_weight * (-string.very_slow_decay_rate * t).exp()
}

/// Vibrato frequency multiplier at time `t`, oscillating around 1.
fn vibrato_multiplier(string: &GuitarString, t: f64) -> f64 {
    1.0 + string.vibrato_amplitude * (2.0 * PI * string.vibrato_frequency * t).sin()
}

/// Synthesize one note.
///
/// `decay_t0` shifts the decay start time and may be negative: a later note
/// in a legato stroke fades from a point earlier than its nominal onset so
/// that it blends with the previous note's tail.
///
/// A non-positive duration yields an empty buffer.
pub fn synthesize_tone(
    instrument: &Instrument,
    string_number: usize,
    fret: u32,
    duration: f64,
    pluck_position: f64,
    decay_t0: f64,
    sample_rate: u32,
) -> Result<Vec<f64>, TabSynthError> {
    let string = instrument
        .string(string_number)
        .ok_or_else(|| TabSynthError::StrokeError {
            string: string_number,
            message: format!("instrument has {} strings", instrument.strings.len()),
        })?;

    if duration <= 0.0 {
        return Ok(Vec::new());
    }
    let num_samples = (sample_rate as f64 * duration) as usize;
    let mut tone = vec![0.0f64; num_samples];

    let base_frequency = fret_to_frequency(string, fret);

    for (index, weight) in string.harmonics_weights.iter().enumerate() {
        let harmonic = index + 1;
        let amplitude = weight
            * (PI * pluck_position * harmonic as f64).sin()
            * modal_adjustment(harmonic, pluck_position);
        if amplitude == 0.0 {
            continue;
        }
        // stiffness raises each partial above its integer multiple
        let inharmonic_order =
            harmonic as f64 * (1.0 + string.inharmonicity_coefficient * (harmonic as f64).powi(2));
        let decay_rate = harmonic as f64 / 6.0;

        for (k, sample) in tone.iter_mut().enumerate() {
            let t = k as f64 / sample_rate as f64;
            let vibrato = if instrument.supports_vibrato {
                vibrato_multiplier(string, t)
            } else {
                1.0
            };
            let frequency = base_frequency * inharmonic_order * vibrato;
            let decay = (-decay_rate * (t - decay_t0)).exp();
            *sample += amplitude * (2.0 * PI * frequency * t).sin() * decay;
        }
    }

    let envelope_t0 = decay_t0 + ENVELOPE_ONSET;
    for (k, sample) in tone.iter_mut().enumerate() {
        let t = k as f64 / sample_rate as f64;
        let shaped_t = t - envelope_t0;
        *sample *= attack_curve(shaped_t, string.attack_duration) * release_curve(shaped_t, string);

        // a thin layer of decaying noise for acoustic realism
        let noise = rand::random::<f64>() * 2.0 - 1.0;
        *sample += 0.01 * noise * (-15.0 * (t - decay_t0)).exp();

        *sample *= string.dynamic_range_factor;
    }

    Ok(tone)
}
