//! # Data Model
//!
//! This module defines all type structures for tabs, instruments, and audio.
//!
//! ## Type Hierarchy
//! ```text
//! GuitarSheet
//!   ├── title / author
//!   ├── bpm (beats per minute)
//!   ├── capo_fret
//!   └── Vec<SequenceElement>
//!         └── Vec<Stroke> (simultaneous events)
//!               ├── string_number: 1..N (1 = high string)
//!               ├── frets: Vec<u32>
//!               ├── values: Vec<NoteValue>  (same length as frets)
//!               ├── transition_types: Option<Vec<TransitionType>>
//!               └── let_ring: bool
//!
//! Instrument
//!   ├── supports_transitions / supports_vibrato
//!   └── Vec<GuitarString> (index 0 = string 1)
//!         ├── base_frequency, inharmonicity_coefficient
//!         ├── vibrato frequency/amplitude
//!         ├── attack_duration, max_duration, dynamic_range_factor
//!         ├── fast/mid/very_slow decay rate + weight pairs
//!         └── harmonics_weights (index = harmonic number - 1)
//! ```
//!
//! ## Key Concepts
//!
//! ### Strokes and Elements
//! A `Stroke` is one or more timed notes played back-to-back on a single
//! string. A `SequenceElement` groups the strokes that begin at the same
//! point in time (a chord, or simultaneous notes on different strings).
//!
//! ### Time
//! Time only moves forward: the mixer never rewinds the global timeline.
//! Only per-note decay offsets may be negative, which lets an overlapping
//! note fade from a point earlier than its nominal onset (legato blending).
//!
//! ## Related Modules
//! - `parser` - Creates sheets and sequences from tab text
//! - `instrument` - Loads and validates instruments from YAML
//! - `synth` - Renders sequences using these types
//! - `effects` - Operates on `Signal` buffers

use serde::Deserialize;

/// Rhythmic note value as a fraction of a beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValue {
    DoubleNote, // 2.0 beats (breve)
    Whole,      // 1.0
    Half,       // 0.5
    Quarter,    // 0.25
    Eighth,     // 0.125
    Sixteenth,  // 0.0625
}

impl NoteValue {
    /// Returns the duration in fractional beats
    pub fn beats(&self) -> f64 {
        match self {
            NoteValue::DoubleNote => 2.0,
            NoteValue::Whole => 1.0,
            NoteValue::Half => 0.5,
            NoteValue::Quarter => 0.25,
            NoteValue::Eighth => 0.125,
            NoteValue::Sixteenth => 0.0625,
        }
    }
}

/// Articulation between successive notes in a stroke.
///
/// Currently informational only: carried through parsing but not yet part of
/// the signal model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionType {
    /// Direct strike or pluck of the string
    Strike,
    /// Hammer-on or pull-off legato
    HammerOrPull,
    /// Continuous slide between pitches
    Slide,
}

/// Physical and acoustic parameters of one instrument string.
///
/// Immutable once constructed; owned exclusively by an [`Instrument`].
#[derive(Debug, Clone, Deserialize)]
pub struct GuitarString {
    /// Fundamental frequency of the open string in Hz
    pub base_frequency: f64,
    /// Deviation of partials from integer multiples, due to string stiffness
    pub inharmonicity_coefficient: f64,
    /// Pitch modulation rate in Hz
    pub vibrato_frequency: f64,
    /// Pitch modulation depth (relative frequency deviation)
    pub vibrato_amplitude: f64,
    /// Time to reach peak amplitude after the pluck, in seconds
    pub attack_duration: f64,
    /// Maximum sustain before the note is gated to silence, in seconds
    pub max_duration: f64,
    /// Overall amplitude scale for this string
    pub dynamic_range_factor: f64,
    /// Initial fast decay rate
    pub fast_decay_rate: f64,
    /// Mixing weight of the fast decay
    pub fast_decay_weight: f64,
    /// Mid-stage decay rate
    pub mid_decay_rate: f64,
    /// Mixing weight of the mid decay
    pub mid_decay_weight: f64,
    /// Long-tail decay rate
    pub very_slow_decay_rate: f64,
    /// Mixing weight of the long-tail decay
    pub very_slow_decay_weight: f64,
    /// Harmonic partial weights; index = harmonic number - 1
    #[serde(default)]
    pub harmonics_weights: Vec<f64>,
}

/// An instrument: capability flags plus an ordered list of strings.
///
/// Index 0 holds string 1, the conventional high string. Shared read-only
/// across all synthesis calls.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    /// Whether successive notes in a stroke blend into each other
    pub supports_transitions: bool,
    /// Whether tones are frequency-modulated by the string's vibrato settings
    pub supports_vibrato: bool,
    pub strings: Vec<GuitarString>,
}

impl Instrument {
    /// Look up a string by its 1-based number (1 = high string).
    pub fn string(&self, number: usize) -> Option<&GuitarString> {
        if number == 0 {
            return None;
        }
        self.strings.get(number - 1)
    }
}

/// One string event: notes played back-to-back on a single string.
///
/// Invariant: `frets.len() == values.len()`. The mixer rejects strokes that
/// violate it rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// 1-based string number (1 = high string)
    pub string_number: usize,
    /// Fret for each note, before the capo offset is applied
    pub frets: Vec<u32>,
    /// Rhythmic value for each note
    pub values: Vec<NoteValue>,
    /// Per-note articulation, when known
    pub transition_types: Option<Vec<TransitionType>>,
    /// "Let it ring": extend each note well beyond its nominal value
    pub let_ring: bool,
}

/// Strokes that occur at the same point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceElement {
    pub strokes: Vec<Stroke>,
}

/// A complete tab sheet: metadata plus the ordered musical sequence
#[derive(Debug, Clone)]
pub struct GuitarSheet {
    pub title: String,
    pub author: String,
    pub sequence: Vec<SequenceElement>,
    /// Tempo in beats per minute
    pub bpm: u32,
    /// Fret offset added to every note
    pub capo_fret: u32,
}

/// A rendered audio buffer, mono or two-channel.
///
/// Stereo channels are stored separately (not interleaved); both channels
/// always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Mono(Vec<f64>),
    Stereo { left: Vec<f64>, right: Vec<f64> },
}

impl Signal {
    /// Number of frames (samples per channel)
    pub fn len(&self) -> usize {
        match self {
            Signal::Mono(samples) => samples.len(),
            Signal::Stereo { left, .. } => left.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels (1 or 2)
    pub fn channels(&self) -> u16 {
        match self {
            Signal::Mono(_) => 1,
            Signal::Stereo { .. } => 2,
        }
    }

    /// Largest absolute sample value across all channels
    pub fn peak(&self) -> f64 {
        let fold = |samples: &[f64]| samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
        match self {
            Signal::Mono(samples) => fold(samples),
            Signal::Stereo { left, right } => fold(left).max(fold(right)),
        }
    }
}
