//! # Error Types
//!
//! This module defines all error types for the tabsynth library.
//!
//! Errors carry enough context to point users at the failing input: parse
//! errors name the tab section, stroke errors name the string.
//!
//! ## Error Types
//! - `ParseError` - Tab text that cannot be interpreted as string lines
//! - `MetadataError` - Sheet metadata that cannot drive synthesis (e.g. a zero tempo)
//! - `InstrumentError` - Invalid instrument definition (YAML or validation)
//! - `StrokeError` - A stroke referencing a missing string or with mismatched note lists
//! - `MissingImpulseResponse` - Convolution requested without an impulse response
//! - `UnsupportedFormat` - Audio data the pipeline cannot consume
//! - `Wav` / `Io` - Wrapped I/O failures from WAV and file handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabSynthError {
    /// Tab parse error with the 1-based index of the offending section.
    ///
    /// Sections are the blank-line-separated blocks of a tab file. A section
    /// with content but no recognized string-label lines is rejected here.
    #[error("Parse error in section {section}: {message}")]
    ParseError { section: usize, message: String },

    /// Sheet metadata that cannot drive synthesis.
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// Invalid instrument definition.
    ///
    /// Covers both YAML deserialization failures and semantic validation
    /// (an instrument with no strings, a string with no harmonic weights).
    #[error("Invalid instrument definition: {0}")]
    InstrumentError(String),

    /// A stroke that the mixer cannot realize on the given instrument.
    #[error("Invalid stroke on string {string}: {message}")]
    StrokeError { string: usize, message: String },

    /// Convolution was requested but no impulse response was provided.
    #[error("No impulse response provided for convolution")]
    MissingImpulseResponse,

    /// Audio data in a shape the pipeline cannot consume.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// WAV read/write failure.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
