//! Integration tests for the tabsynth pipeline
//!
//! Tests the full path from tab text and instrument YAML to rendered audio.

use tabsynth::{
    load_instrument_from_str, parse_sheet, render_sheet, RenderOptions, Signal, TabSynthError,
};

/// Six nylon strings in standard tuning, high e to low E.
fn guitar_yaml() -> String {
    let mut yaml = String::from(
        "supports_transitions: true\nsupports_vibrato: true\nstrings:\n",
    );
    for frequency in [329.63, 246.94, 196.0, 146.83, 110.0, 82.41] {
        yaml.push_str(&format!("  - base_frequency: {frequency}\n"));
        for line in [
            "inharmonicity_coefficient: 0.00005",
            "vibrato_frequency: 5.0",
            "vibrato_amplitude: 0.003",
            "attack_duration: 0.004",
            "max_duration: 4.5",
            "dynamic_range_factor: 0.9",
            "fast_decay_rate: 7.0",
            "fast_decay_weight: 0.3",
            "mid_decay_rate: 2.5",
            "mid_decay_weight: 0.5",
            "very_slow_decay_rate: 0.6",
            "very_slow_decay_weight: 0.2",
            "harmonics_weights: [1.0, 0.6, 0.45, 0.3, 0.2]",
        ] {
            yaml.push_str("    ");
            yaml.push_str(line);
            yaml.push('\n');
        }
    }
    yaml
}

fn peak(signal: &Signal) -> f64 {
    signal.peak()
}

#[test]
fn test_two_column_tab_end_to_end() {
    let source = "\
D|--2---|
A|--0---|
";
    let sheet = parse_sheet(source).unwrap();
    assert_eq!(sheet.sequence.len(), 1);
    assert_eq!(sheet.sequence[0].strokes.len(), 2);

    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();
    let signal = render_sheet(&instrument, &sheet, &RenderOptions::default()).unwrap();
    assert!(!signal.is_empty());
    assert!((peak(&signal) - 0.95).abs() < 1e-9);
}

#[test]
fn test_render_with_mono_impulse_response() {
    let sheet = parse_sheet("e |--0--|\n").unwrap();
    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();

    let options = RenderOptions {
        apply_convolution: true,
        impulse_response: Some(Signal::Mono(vec![1.0, 0.4, 0.15, 0.05])),
        ..RenderOptions::default()
    };
    let signal = render_sheet(&instrument, &sheet, &options).unwrap();
    assert_eq!(signal.channels(), 1);
    assert!(!signal.is_empty());
    assert!((peak(&signal) - 0.95).abs() < 1e-9);
}

#[test]
fn test_stereo_impulse_response_gives_stereo_render() {
    let sheet = parse_sheet("e |--0--|\n").unwrap();
    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();

    let options = RenderOptions {
        apply_convolution: true,
        impulse_response: Some(Signal::Stereo {
            left: vec![1.0, 0.2],
            right: vec![0.8, 0.3],
        }),
        ..RenderOptions::default()
    };
    let signal = render_sheet(&instrument, &sheet, &options).unwrap();
    assert_eq!(signal.channels(), 2);
    assert!((peak(&signal) - 0.95).abs() < 1e-9);
}

#[test]
fn test_convolution_without_impulse_response_is_an_error() {
    let sheet = parse_sheet("e |--0--|\n").unwrap();
    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();

    let options = RenderOptions {
        apply_convolution: true,
        impulse_response: None,
        ..RenderOptions::default()
    };
    let result = render_sheet(&instrument, &sheet, &options);
    assert!(matches!(result, Err(TabSynthError::MissingImpulseResponse)));
}

#[test]
fn test_tempo_scales_output_length() {
    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();
    let options = RenderOptions {
        apply_echo: false,
        ..RenderOptions::default()
    };

    let slow = parse_sheet("bpm: 30\n\ne |--0--|\n").unwrap();
    let fast = parse_sheet("bpm: 60\n\ne |--0--|\n").unwrap();
    assert_eq!(slow.bpm, 30);
    assert_eq!(fast.bpm, 60);

    let slow_signal = render_sheet(&instrument, &slow, &options).unwrap();
    let fast_signal = render_sheet(&instrument, &fast, &options).unwrap();
    // doubling the tempo halves every note duration
    assert_eq!(slow_signal.len(), 2 * fast_signal.len());
}

#[test]
fn test_metadata_reaches_the_sheet() {
    let source = "\
title: Agua Marina
author: Anonymous
bpm: 90
capo fret: 2

e |--2--|
";
    let sheet = parse_sheet(source).unwrap();
    assert_eq!(sheet.title, "Agua Marina");
    assert_eq!(sheet.author, "Anonymous");
    assert_eq!(sheet.bpm, 90);
    assert_eq!(sheet.capo_fret, 2);
}

#[test]
fn test_sections_render_in_order() {
    let source = "\
e |--0--|

e |--0--0--|
";
    let sheet = parse_sheet(source).unwrap();
    assert_eq!(sheet.sequence.len(), 3);

    let instrument = load_instrument_from_str(&guitar_yaml()).unwrap();
    let options = RenderOptions {
        apply_echo: false,
        ..RenderOptions::default()
    };
    let signal = render_sheet(&instrument, &sheet, &options).unwrap();
    // three quarter notes at 60 bpm
    assert_eq!(signal.len(), (0.75f64 * 44100.0) as usize);
}

#[test]
fn test_malformed_tab_reports_parse_error() {
    let result = parse_sheet("nothing here resembles a tab line\n");
    assert!(matches!(
        result,
        Err(TabSynthError::ParseError { section: 1, .. })
    ));
}
