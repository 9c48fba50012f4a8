//! # tabsynth
//!
//! Synthesizes audio from guitar tablature text.
//!
//! ## Pipeline
//! 1. [`parse_sheet()`] turns tab notation into a [`GuitarSheet`]
//! 2. [`render_sheet()`] synthesizes every note with an additive-harmonic
//!    string model, mixes per-string timelines, and post-processes the result
//!    (impulse-response convolution, echo, peak normalization)
//!
//! The whole pipeline is single-threaded and synchronous: a sheet is rendered
//! into a finite buffer before anything is written out.
//!
//! ## Example
//! ```rust,no_run
//! use tabsynth::{
//!     load_impulse_response, load_instrument_from_path, parse_sheet, render_sheet,
//!     RenderOptions,
//! };
//!
//! let instrument = load_instrument_from_path("assets/classical_guitar.yaml")?;
//! let sheet = parse_sheet(&std::fs::read_to_string("assets/demo.tab")?)?;
//!
//! let options = RenderOptions {
//!     apply_convolution: true,
//!     impulse_response: Some(load_impulse_response("ir.wav")?),
//!     ..RenderOptions::default()
//! };
//! let signal = render_sheet(&instrument, &sheet, &options)?;
//! tabsynth::write_wav("out.wav", &signal, options.sample_rate)?;
//! # Ok::<(), tabsynth::TabSynthError>(())
//! ```

pub mod audio;
pub mod effects;
pub mod error;
pub mod instrument;
pub mod parser;
pub mod synth;
pub mod types;

pub use audio::{load_impulse_response, write_wav};
pub use error::TabSynthError;
pub use instrument::{load_instrument_from_path, load_instrument_from_str};
pub use parser::{parse_sheet, parse_tab};
pub use synth::{render_sequence, synthesize_tone};
pub use types::*;

/// Configuration for [`render_sheet()`].
///
/// The impulse response is owned by the caller; there is no ambient default.
/// Requesting convolution without one is an error.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Relative pluck position along the string (0..1)
    pub pluck_position: f64,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Convolve the mix with the impulse response
    pub apply_convolution: bool,
    /// Impulse response for convolution; its channel count decides whether
    /// the output is mono or stereo
    pub impulse_response: Option<Signal>,
    /// Apply the single-tap echo
    pub apply_echo: bool,
    /// Echo delay in seconds
    pub echo_delay: f64,
    /// Echo decay factor
    pub echo_decay: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pluck_position: 0.7,
            sample_rate: 44100,
            apply_convolution: false,
            impulse_response: None,
            apply_echo: true,
            echo_delay: 0.2,
            echo_decay: 0.2,
        }
    }
}

/// Render a sheet into a normalized audio signal.
///
/// This is the main entry point for the library.
///
/// # Pipeline
/// 1. Synthesize and mix the sheet's sequence at its tempo and capo setting
/// 2. Optionally convolve with the impulse response
/// 3. Optionally add echo
/// 4. Peak-normalize to 0.95 of full scale
///
/// # Errors
/// Returns [`TabSynthError`] for strokes the instrument cannot realize, a
/// zero tempo, or a convolution request without an impulse response.
pub fn render_sheet(
    instrument: &Instrument,
    sheet: &GuitarSheet,
    options: &RenderOptions,
) -> Result<Signal, TabSynthError> {
    // a convolution request without an impulse response is a configuration
    // error; report it before rendering anything
    if options.apply_convolution && options.impulse_response.is_none() {
        return Err(TabSynthError::MissingImpulseResponse);
    }

    let mixed = synth::render_sequence(
        instrument,
        &sheet.sequence,
        sheet.bpm,
        sheet.capo_fret,
        options.pluck_position,
        options.sample_rate,
    )?;

    let mut signal = match &options.impulse_response {
        Some(ir) if options.apply_convolution => {
            log::info!("applying impulse response ({} channel(s))", ir.channels());
            effects::convolve_with_impulse_response(&mixed, ir)
        }
        _ => Signal::Mono(mixed),
    };

    if options.apply_echo {
        signal = effects::add_echo(
            &signal,
            options.echo_delay,
            options.echo_decay,
            options.sample_rate,
        );
    }

    effects::normalize(&mut signal);
    Ok(signal)
}
