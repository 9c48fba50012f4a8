//! # Synthesis Module
//!
//! Renders parsed sequences into audio.
//!
//! ## Sub-modules
//! - `tone` - Single-note additive synthesis (inharmonic partials, modal
//!   pluck-position weighting, attack/release shaping, noise layer)
//! - `mixer` - Walks a sequence, synthesizes every note, and accumulates
//!   per-string overlap-add buffers into one mixed signal
//!
//! ## Entry Points
//! - [`synthesize_tone()`] - one note on one string
//! - [`render_sequence()`] - a whole sequence, mixed and peak-normalized
//!
//! ## Example
//! ```rust
//! use tabsynth::{load_instrument_from_str, parse_tab, synth::render_sequence};
//! # let yaml = r#"
//! # supports_transitions: false
//! # supports_vibrato: false
//! # strings:
//! #   - base_frequency: 329.63
//! #     inharmonicity_coefficient: 0.0001
//! #     vibrato_frequency: 5.0
//! #     vibrato_amplitude: 0.003
//! #     attack_duration: 0.005
//! #     max_duration: 3.0
//! #     dynamic_range_factor: 0.9
//! #     fast_decay_rate: 7.0
//! #     fast_decay_weight: 0.3
//! #     mid_decay_rate: 2.5
//! #     mid_decay_weight: 0.5
//! #     very_slow_decay_rate: 0.6
//! #     very_slow_decay_weight: 0.2
//! #     harmonics_weights: [1.0, 0.5]
//! # "#;
//! let instrument = load_instrument_from_str(yaml)?;
//! let sequence = parse_tab("e |--0--|")?;
//! let samples = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100)?;
//! assert!(!samples.is_empty());
//! # Ok::<(), tabsynth::TabSynthError>(())
//! ```

mod mixer;
mod tone;

#[cfg(test)]
mod tests;

pub use mixer::render_sequence;
pub use tone::{fret_to_frequency, synthesize_tone};
