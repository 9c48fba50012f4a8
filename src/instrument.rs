//! # Instrument Loading
//!
//! Loads [`Instrument`] definitions from YAML.
//!
//! A definition carries the capability flags and the full per-string
//! parameter set, strings ordered high to low (index 0 = string 1):
//!
//! ```yaml
//! supports_transitions: true
//! supports_vibrato: true
//! strings:
//!   - base_frequency: 329.63   # open high E
//!     inharmonicity_coefficient: 0.00005
//!     vibrato_frequency: 5.0
//!     vibrato_amplitude: 0.003
//!     attack_duration: 0.004
//!     max_duration: 4.5
//!     dynamic_range_factor: 0.9
//!     fast_decay_rate: 7.0
//!     fast_decay_weight: 0.3
//!     mid_decay_rate: 2.5
//!     mid_decay_weight: 0.5
//!     very_slow_decay_rate: 0.6
//!     very_slow_decay_weight: 0.2
//!     harmonics_weights: [1.0, 0.6, 0.45, 0.3, 0.2]
//! ```
//!
//! Deserialization is followed by a validation pass so that degenerate
//! definitions fail at load time instead of producing NaNs mid-render.

use std::fs;
use std::path::Path;

use crate::error::TabSynthError;
use crate::types::Instrument;

/// Parse an instrument definition from YAML text.
pub fn load_instrument_from_str(source: &str) -> Result<Instrument, TabSynthError> {
    let instrument: Instrument =
        serde_yaml::from_str(source).map_err(|e| TabSynthError::InstrumentError(e.to_string()))?;
    validate_instrument(&instrument)?;
    Ok(instrument)
}

/// Read and parse an instrument definition file.
pub fn load_instrument_from_path(path: impl AsRef<Path>) -> Result<Instrument, TabSynthError> {
    let source = fs::read_to_string(path)?;
    load_instrument_from_str(&source)
}

fn validate_instrument(instrument: &Instrument) -> Result<(), TabSynthError> {
    if instrument.strings.is_empty() {
        return Err(TabSynthError::InstrumentError(
            "instrument has no strings".to_string(),
        ));
    }
    for (index, string) in instrument.strings.iter().enumerate() {
        let number = index + 1;
        if string.harmonics_weights.is_empty() {
            return Err(TabSynthError::InstrumentError(format!(
                "string {number} has no harmonic weights"
            )));
        }
        if string.base_frequency <= 0.0 {
            return Err(TabSynthError::InstrumentError(format!(
                "string {number} has non-positive base frequency"
            )));
        }
        if string.attack_duration <= 0.0 {
            return Err(TabSynthError::InstrumentError(format!(
                "string {number} has non-positive attack duration"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
supports_transitions: true
supports_vibrato: false
strings:
  - base_frequency: 110.0
    inharmonicity_coefficient: 0.0001
    vibrato_frequency: 5.0
    vibrato_amplitude: 0.003
    attack_duration: 0.005
    max_duration: 3.0
    dynamic_range_factor: 0.9
    fast_decay_rate: 7.0
    fast_decay_weight: 0.3
    mid_decay_rate: 2.5
    mid_decay_weight: 0.5
    very_slow_decay_rate: 0.6
    very_slow_decay_weight: 0.2
    harmonics_weights: [1.0, 0.5, 0.25]
";

    #[test]
    fn test_load_minimal_instrument() {
        let instrument = load_instrument_from_str(MINIMAL).unwrap();
        assert!(instrument.supports_transitions);
        assert!(!instrument.supports_vibrato);
        assert_eq!(instrument.strings.len(), 1);
        assert_eq!(instrument.strings[0].base_frequency, 110.0);
        assert_eq!(instrument.strings[0].harmonics_weights.len(), 3);
    }

    #[test]
    fn test_yaml_comments_are_allowed() {
        let source = MINIMAL.replace(
            "base_frequency: 110.0",
            "base_frequency: 110.0 # open A",
        );
        let instrument = load_instrument_from_str(&source).unwrap();
        assert_eq!(instrument.strings[0].base_frequency, 110.0);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let source = MINIMAL.replace("    max_duration: 3.0\n", "");
        assert!(matches!(
            load_instrument_from_str(&source),
            Err(TabSynthError::InstrumentError(_))
        ));
    }

    #[test]
    fn test_no_strings_is_an_error() {
        let source = "\
supports_transitions: false
supports_vibrato: false
strings: []
";
        assert!(matches!(
            load_instrument_from_str(source),
            Err(TabSynthError::InstrumentError(_))
        ));
    }

    #[test]
    fn test_no_harmonics_is_an_error() {
        let source = MINIMAL.replace("    harmonics_weights: [1.0, 0.5, 0.25]\n", "");
        assert!(matches!(
            load_instrument_from_str(&source),
            Err(TabSynthError::InstrumentError(_))
        ));
    }
}
