use super::*;
use crate::parser::parse_tab;
use crate::types::{GuitarString, Instrument, NoteValue, SequenceElement, Stroke};

fn test_string(base_frequency: f64) -> GuitarString {
    GuitarString {
        base_frequency,
        inharmonicity_coefficient: 0.0001,
        vibrato_frequency: 5.0,
        vibrato_amplitude: 0.003,
        attack_duration: 0.005,
        max_duration: 3.0,
        dynamic_range_factor: 0.9,
        fast_decay_rate: 7.0,
        fast_decay_weight: 0.3,
        mid_decay_rate: 2.5,
        mid_decay_weight: 0.5,
        very_slow_decay_rate: 0.6,
        very_slow_decay_weight: 0.2,
        harmonics_weights: vec![1.0, 0.5, 0.25],
    }
}

/// Six strings tuned like a classical guitar, high e to low E.
fn test_guitar() -> Instrument {
    Instrument {
        supports_transitions: false,
        supports_vibrato: true,
        strings: vec![
            test_string(329.63),
            test_string(246.94),
            test_string(196.00),
            test_string(146.83),
            test_string(110.00),
            test_string(82.41),
        ],
    }
}

fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
}

#[test]
fn test_render_single_note_length() {
    let instrument = test_guitar();
    let sequence = vec![SequenceElement {
        strokes: vec![Stroke {
            string_number: 1,
            frets: vec![0],
            values: vec![NoteValue::Quarter],
            transition_types: None,
            let_ring: false,
        }],
    }];
    // at 60 bpm a quarter note lasts 0.25 s
    let samples = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100).unwrap();
    assert_eq!(samples.len(), 11025);
}

#[test]
fn test_render_is_normalized() {
    let instrument = test_guitar();
    let sequence = parse_tab("e |--0--3--|").unwrap();
    let samples = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100).unwrap();
    assert!(!samples.is_empty());
    assert!((peak(&samples) - 0.95).abs() < 1e-9);
}

#[test]
fn test_element_advances_by_longest_stroke() {
    let instrument = test_guitar();
    // a half note on string 1 against a quarter note on string 2: the
    // element must advance the timeline by the half note
    let sequence = vec![
        SequenceElement {
            strokes: vec![
                Stroke {
                    string_number: 1,
                    frets: vec![0],
                    values: vec![NoteValue::Half],
                    transition_types: None,
                    let_ring: false,
                },
                Stroke {
                    string_number: 2,
                    frets: vec![0],
                    values: vec![NoteValue::Quarter],
                    transition_types: None,
                    let_ring: false,
                },
            ],
        },
        SequenceElement {
            strokes: vec![Stroke {
                string_number: 1,
                frets: vec![0],
                values: vec![NoteValue::Quarter],
                transition_types: None,
                let_ring: false,
            }],
        },
    ];
    let samples = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100).unwrap();
    // 0.5 s (half) + 0.25 s (quarter) of audio
    assert_eq!(samples.len(), (0.75f64 * 44100.0) as usize);
}

#[test]
fn test_let_ring_extends_to_a_full_beat() {
    let instrument = test_guitar();
    let mut stroke = Stroke {
        string_number: 1,
        frets: vec![0],
        values: vec![NoteValue::Sixteenth],
        transition_types: None,
        let_ring: false,
    };
    let short = render_sequence(
        &instrument,
        &[SequenceElement {
            strokes: vec![stroke.clone()],
        }],
        60,
        0,
        0.7,
        44100,
    )
    .unwrap();

    stroke.let_ring = true;
    let ringing = render_sequence(
        &instrument,
        &[SequenceElement {
            strokes: vec![stroke],
        }],
        60,
        0,
        0.7,
        44100,
    )
    .unwrap();

    // the ringing note fills a whole beat (1 s at 60 bpm), the plain
    // sixteenth only 0.0625 s
    assert_eq!(short.len(), (0.0625f64 * 44100.0) as usize);
    assert_eq!(ringing.len(), 44100);
}

#[test]
fn test_notes_in_a_stroke_play_back_to_back() {
    let instrument = test_guitar();
    let sequence = vec![SequenceElement {
        strokes: vec![Stroke {
            string_number: 1,
            frets: vec![0, 2, 3],
            values: vec![NoteValue::Quarter; 3],
            transition_types: None,
            let_ring: false,
        }],
    }];
    let samples = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100).unwrap();
    assert_eq!(samples.len(), (0.75f64 * 44100.0) as usize);
}

#[test]
fn test_string_lookup_is_one_based() {
    let instrument = test_guitar();
    assert!((instrument.string(1).unwrap().base_frequency - 329.63).abs() < 1e-9);
    assert!((instrument.string(6).unwrap().base_frequency - 82.41).abs() < 1e-9);
    assert!(instrument.string(0).is_none());
    assert!(instrument.string(7).is_none());
}

#[test]
fn test_transitions_blend_against_independent_decays() {
    let sequence = vec![SequenceElement {
        strokes: vec![Stroke {
            string_number: 1,
            frets: vec![0, 2],
            values: vec![NoteValue::Quarter; 2],
            transition_types: None,
            let_ring: false,
        }],
    }];

    let mut legato = test_guitar();
    legato.supports_transitions = true;
    let mut plucked = test_guitar();
    plucked.supports_transitions = false;

    let legato_out = render_sequence(&legato, &sequence, 60, 0, 0.7, 44100).unwrap();
    let plucked_out = render_sequence(&plucked, &sequence, 60, 0, 0.7, 44100).unwrap();

    // the second note starts 0.25 s in; with transitions its decay starts
    // earlier, so the rendered windows must differ
    assert_eq!(legato_out.len(), plucked_out.len());
    let start = (0.26f64 * 44100.0) as usize;
    let window = 1000;
    let differs = legato_out[start..start + window]
        .iter()
        .zip(&plucked_out[start..start + window])
        .any(|(a, b)| (a - b).abs() > 1e-3);
    assert!(differs);
}

#[test]
fn test_mismatched_fret_and_value_lists_are_rejected() {
    let instrument = test_guitar();
    let sequence = vec![SequenceElement {
        strokes: vec![Stroke {
            string_number: 1,
            frets: vec![0, 2],
            values: vec![NoteValue::Quarter],
            transition_types: None,
            let_ring: false,
        }],
    }];
    let result = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100);
    assert!(matches!(
        result,
        Err(crate::error::TabSynthError::StrokeError { string: 1, .. })
    ));
}

#[test]
fn test_stroke_on_missing_string_is_rejected() {
    let instrument = Instrument {
        supports_transitions: false,
        supports_vibrato: false,
        strings: vec![test_string(110.0)],
    };
    let sequence = vec![SequenceElement {
        strokes: vec![Stroke {
            string_number: 5,
            frets: vec![0],
            values: vec![NoteValue::Quarter],
            transition_types: None,
            let_ring: false,
        }],
    }];
    let result = render_sequence(&instrument, &sequence, 60, 0, 0.7, 44100);
    assert!(matches!(
        result,
        Err(crate::error::TabSynthError::StrokeError { string: 5, .. })
    ));
}

#[test]
fn test_zero_bpm_is_rejected() {
    let instrument = test_guitar();
    let result = render_sequence(&instrument, &[], 0, 0, 0.7, 44100);
    assert!(matches!(
        result,
        Err(crate::error::TabSynthError::MetadataError(_))
    ));
}

#[test]
fn test_empty_sequence_renders_empty_buffer() {
    let instrument = test_guitar();
    let samples = render_sequence(&instrument, &[], 60, 0, 0.7, 44100).unwrap();
    assert!(samples.is_empty());
}
