//! Sequence mixing.
//!
//! Maintains one growable buffer per instrument string, all kept
//! length-synchronized before each element. Strokes synthesize their notes
//! back-to-back into the owning string's buffer; simultaneous strokes advance
//! the global timeline by the longest one. The global timeline never moves
//! backwards.

use crate::effects::normalize_peak;
use crate::error::TabSynthError;
use crate::synth::tone::synthesize_tone;
use crate::types::{Instrument, SequenceElement, Stroke};

/// Forward shift applied to legato decay offsets so a blended note still has
/// a hint of its own onset.
const TRANSITION_EPSILON: f64 = 0.005;

/// Sum a tone into a string buffer at the given sample offset.
///
/// The buffer is cut at the insertion point (a new note on a string takes
/// over from the previous note's tail) and extended to fit the tone.
fn concatenate_add(buffer: &mut Vec<f64>, tone: &[f64], offset: usize) {
    if buffer.is_empty() {
        *buffer = tone.to_vec();
        return;
    }
    buffer.truncate(offset);
    let total = (offset + tone.len()).max(buffer.len());
    buffer.resize(total, 0.0);
    for (k, &v) in tone.iter().enumerate() {
        buffer[offset + k] += v;
    }
}

/// Synthesize all notes of one stroke into its string buffer.
///
/// Returns the stroke's total duration in seconds.
fn process_stroke(
    instrument: &Instrument,
    stroke: &Stroke,
    capo_fret: u32,
    seconds_per_beat: f64,
    pluck_position: f64,
    string_buffers: &mut [Vec<f64>],
    total_time: f64,
    sample_rate: u32,
) -> Result<f64, TabSynthError> {
    if stroke.frets.len() != stroke.values.len() {
        return Err(TabSynthError::StrokeError {
            string: stroke.string_number,
            message: format!(
                "{} frets but {} note values",
                stroke.frets.len(),
                stroke.values.len()
            ),
        });
    }

    let mut stroke_time = 0.0;
    for (&fret, value) in stroke.frets.iter().zip(&stroke.values) {
        let duration = value.beats() * seconds_per_beat;

        // a let-ring note rings for a full beat instead of its nominal value;
        // with transitions, later notes fade from before their onset so they
        // blend with the previous note's tail
        let tone = synthesize_tone(
            instrument,
            stroke.string_number,
            capo_fret + fret,
            if stroke.let_ring {
                seconds_per_beat
            } else {
                duration
            },
            pluck_position,
            if instrument.supports_transitions {
                -stroke_time + TRANSITION_EPSILON
            } else {
                0.0
            },
            sample_rate,
        )?;

        let start = ((total_time + stroke_time) * sample_rate as f64) as usize;
        concatenate_add(&mut string_buffers[stroke.string_number - 1], &tone, start);

        stroke_time += duration;
    }

    Ok(stroke_time)
}

/// Process one element; simultaneous strokes all start at `total_time`.
///
/// Returns the element's duration: the longest of its strokes.
fn process_element(
    instrument: &Instrument,
    element: &SequenceElement,
    capo_fret: u32,
    seconds_per_beat: f64,
    pluck_position: f64,
    string_buffers: &mut [Vec<f64>],
    total_time: f64,
    sample_rate: u32,
) -> Result<f64, TabSynthError> {
    let mut element_time = 0.0f64;
    for stroke in &element.strokes {
        let stroke_time = process_stroke(
            instrument,
            stroke,
            capo_fret,
            seconds_per_beat,
            pluck_position,
            string_buffers,
            total_time,
            sample_rate,
        )?;
        element_time = element_time.max(stroke_time);
    }
    Ok(element_time)
}

/// Synthesize a sequence into per-string buffers and sum them to one mono
/// buffer (not yet normalized).
fn synthesize_sequence(
    instrument: &Instrument,
    sequence: &[SequenceElement],
    capo_fret: u32,
    seconds_per_beat: f64,
    pluck_position: f64,
    sample_rate: u32,
) -> Result<Vec<f64>, TabSynthError> {
    let mut string_buffers: Vec<Vec<f64>> = vec![Vec::new(); instrument.strings.len()];
    let mut total_time = 0.0;

    for element in sequence {
        // keep all buffers length-synchronized before each element
        let max_len = string_buffers.iter().map(Vec::len).max().unwrap_or(0);
        for buffer in &mut string_buffers {
            buffer.resize(max_len, 0.0);
        }

        total_time += process_element(
            instrument,
            element,
            capo_fret,
            seconds_per_beat,
            pluck_position,
            &mut string_buffers,
            total_time,
            sample_rate,
        )?;
    }

    let max_len = string_buffers.iter().map(Vec::len).max().unwrap_or(0);
    let mut mixed = vec![0.0f64; max_len];
    for buffer in &string_buffers {
        for (k, &v) in buffer.iter().enumerate() {
            mixed[k] += v;
        }
    }
    Ok(mixed)
}

/// Render a sequence into a peak-normalized mono buffer.
///
/// `bpm` converts note values to seconds (`60 / bpm` seconds per beat);
/// `capo_fret` is added to every fret. Strokes referencing strings the
/// instrument does not have, or with mismatched fret/value lists, are
/// rejected.
pub fn render_sequence(
    instrument: &Instrument,
    sequence: &[SequenceElement],
    bpm: u32,
    capo_fret: u32,
    pluck_position: f64,
    sample_rate: u32,
) -> Result<Vec<f64>, TabSynthError> {
    if bpm == 0 {
        return Err(TabSynthError::MetadataError(
            "bpm must be positive".to_string(),
        ));
    }
    let seconds_per_beat = 60.0 / bpm as f64;

    log::info!(
        "rendering {} elements at {} bpm, capo {}, {} Hz",
        sequence.len(),
        bpm,
        capo_fret,
        sample_rate
    );

    let mut mixed = synthesize_sequence(
        instrument,
        sequence,
        capo_fret,
        seconds_per_beat,
        pluck_position,
        sample_rate,
    )?;
    normalize_peak(&mut mixed);
    Ok(mixed)
}
