use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ParamsError};

/// Scheduler tick counter. Monotonic, but allowed to wrap.
pub type Tick = u32;

/// Largest per-character buffer the decoder accepts.
pub const MAX_BUFFER_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Rising,
    Falling,
}

/// A logical transition of the key line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub tick: Tick,
}

impl Edge {
    pub fn rising(tick: Tick) -> Self {
        Self {
            kind: EdgeKind::Rising,
            tick,
        }
    }

    pub fn falling(tick: Tick) -> Self {
        Self {
            kind: EdgeKind::Falling,
            tick,
        }
    }
}

/// Duration of one dot, in ticks. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitLength(NonZeroU32);

impl UnitLength {
    /// Returns `None` for a zero width.
    pub fn new(ticks: u32) -> Option<Self> {
        NonZeroU32::new(ticks).map(Self)
    }

    pub fn ticks(self) -> u32 {
        self.0.get()
    }
}

/// Raw levels of both input lines for one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSample {
    /// Morse key line, `true` while the key is down.
    pub key: bool,
    /// Operator reset button, `true` while pressed.
    pub reset: bool,
}

/// Meaning of a gap between two pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Space {
    IntraCharacter,
    EndOfCharacter,
    EndOfWord,
}

/// Everything the decoder reports downstream, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum DecodeEvent {
    /// A resolved character, the error character, or an inter-word space.
    Character(char),
    Error(DecodeError),
    #[serde(rename_all = "camelCase")]
    Calibrated { unit_length: UnitLength },
    Reset,
}

impl DecodeEvent {
    pub fn as_char(&self) -> Option<char> {
        match self {
            DecodeEvent::Character(ch) => Some(*ch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationParams {
    /// First/second width ratio (percent) at or below which the first pulse is the dot.
    pub short_ratio_max: f64,
    /// Ratio (percent) above which the second pulse is the dot.
    pub long_ratio_min: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            short_ratio_max: 33.66,
            long_ratio_min: 299.0,
        }
    }
}

/// Half-widths of the classification bands, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tolerances {
    pub dot_pulse: u32,
    pub dash_pulse: u32,
    pub dot_space: u32,
    pub char_space: u32,
    pub word_space: u32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            dot_pulse: 1,
            dash_pulse: 10,
            dot_space: 6,
            char_space: 52,
            word_space: 122,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecoderParams {
    /// Settle window of the line debouncers.
    pub debounce_ticks: u32,
    /// Maximum number of symbols in one character.
    pub buffer_capacity: usize,
    /// Emitted for sequences missing from the code table.
    pub error_char: char,
    /// Ignore pulses after calibration until the first character boundary.
    pub sync_after_calibration: bool,
    pub calibration: CalibrationParams,
    pub tolerances: Tolerances,
}

impl Default for DecoderParams {
    fn default() -> Self {
        Self {
            debounce_ticks: 30,
            buffer_capacity: 8,
            error_char: '~',
            sync_after_calibration: false,
            calibration: CalibrationParams::default(),
            tolerances: Tolerances::default(),
        }
    }
}

impl DecoderParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ParamsError::BufferCapacity(self.buffer_capacity));
        }

        let CalibrationParams {
            short_ratio_max,
            long_ratio_min,
        } = self.calibration;
        if !(short_ratio_max > 0.0 && short_ratio_max < long_ratio_min) {
            return Err(ParamsError::CalibrationRatios {
                short_max: short_ratio_max,
                long_min: long_ratio_min,
            });
        }

        if self.error_char.is_whitespace() {
            return Err(ParamsError::ErrorChar(self.error_char));
        }

        Ok(())
    }

    /// Parse a (possibly partial) JSON object. Empty input means defaults.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str::<Self>(json).map_err(|e| ParamsError::Json(e.to_string()))?
        };
        params.validate()?;
        Ok(params)
    }
}

/// Parameters for rendering text as ideal key-line edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyingParams {
    pub unit_ticks: u32,
    /// Tick of the first rising edge. The line is idle before it.
    pub start_tick: Tick,
    /// Maximum random deviation applied to every duration.
    pub jitter_ticks: u32,
    /// 0 selects a fixed default seed.
    pub random_seed: u32,
}

impl Default for KeyingParams {
    fn default() -> Self {
        Self {
            unit_ticks: 100,
            start_tick: 100,
            jitter_ticks: 0,
            random_seed: 1,
        }
    }
}

/// One recorded key-down or key-up period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorseSignal {
    pub on: bool,
    pub ticks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MorseInterpretParams {
    pub max_output_length: usize,
    /// Flush a trailing unfinished character as if an end-of-character gap followed.
    pub flush_trailing: bool,
    #[serde(flatten)]
    pub decoder: DecoderParams,
}

impl Default for MorseInterpretParams {
    fn default() -> Self {
        Self {
            max_output_length: 1000,
            flush_trailing: true,
            decoder: DecoderParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorseInterpretResult {
    pub text: String,
    pub unit_length: Option<UnitLength>,
    pub confidence: f32,
    pub signals_processed: usize,
    pub patterns_recognized: usize,
    pub errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_length_rejects_zero() {
        assert!(UnitLength::new(0).is_none());
        assert_eq!(UnitLength::new(100).map(UnitLength::ticks), Some(100));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params = DecoderParams::from_json(r#"{"bufferCapacity": 6, "tolerances": {"dotPulse": 3}}"#)
            .unwrap();
        assert_eq!(params.buffer_capacity, 6);
        assert_eq!(params.tolerances.dot_pulse, 3);
        assert_eq!(params.tolerances.word_space, 122);
        assert_eq!(params.debounce_ticks, 30);
        assert_eq!(params.error_char, '~');
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(DecoderParams::from_json("  ").unwrap(), DecoderParams::default());
        assert_eq!(DecoderParams::from_json("{}").unwrap(), DecoderParams::default());
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let params = DecoderParams {
            buffer_capacity: 0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::BufferCapacity(0)));

        let params = DecoderParams {
            calibration: CalibrationParams {
                short_ratio_max: 300.0,
                long_ratio_min: 299.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::CalibrationRatios { .. })
        ));

        let params = DecoderParams {
            error_char: ' ',
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::ErrorChar(' ')));

        assert!(matches!(
            DecoderParams::from_json("{not json"),
            Err(ParamsError::Json(_))
        ));
    }

    #[test]
    fn test_decode_event_serializes_tagged() {
        let json = serde_json::to_string(&DecodeEvent::Character('K')).unwrap();
        assert_eq!(json, r#"{"type":"character","value":"K"}"#);

        let calibrated = DecodeEvent::Calibrated {
            unit_length: UnitLength::new(100).unwrap(),
        };
        let json = serde_json::to_string(&calibrated).unwrap();
        assert_eq!(json, r#"{"type":"calibrated","value":{"unitLength":100}}"#);

        let json = serde_json::to_string(&Edge::rising(42)).unwrap();
        assert_eq!(json, r#"{"type":"rising","tick":42}"#);
    }
}
