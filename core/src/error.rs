// Error values reported by the decoder and by parameter validation
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MAX_BUFFER_CAPACITY;

/// Recoverable decode failures, surfaced downstream as `DecodeEvent::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodeError {
    #[error("pulse of {width} ticks is neither dot nor dash")]
    BadPulse { width: u32 },

    #[error("gap of {width} ticks is not a valid space")]
    BadSpace { width: u32 },

    #[error("character longer than {capacity} symbols")]
    BufferOverflow { capacity: usize },

    #[error("no character for pattern {pattern}")]
    NoCodeMatch { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("buffer capacity {0} outside 1..={max}", max = MAX_BUFFER_CAPACITY)]
    BufferCapacity(usize),

    #[error("calibration ratios must satisfy 0 < {short_max} < {long_min}")]
    CalibrationRatios { short_max: f64, long_min: f64 },

    #[error("error character {0:?} must be printable")]
    ErrorChar(char),

    #[error("invalid decoder config: {0}")]
    Json(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_width() {
        let err = DecodeError::BadPulse { width: 237 };
        assert_eq!(err.to_string(), "pulse of 237 ticks is neither dot nor dash");
    }

    #[test]
    fn test_params_error_display() {
        assert_eq!(
            ParamsError::BufferCapacity(17).to_string(),
            "buffer capacity 17 outside 1..=16"
        );
        assert_eq!(
            ParamsError::ErrorChar(' ').to_string(),
            "error character ' ' must be printable"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let err = DecodeError::BufferOverflow { capacity: 8 };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"bufferOverflow","capacity":8}"#);
    }
}
