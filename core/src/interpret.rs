use log::debug;

use crate::decoder::Decoder;
use crate::error::{DecodeError, ParamsError};
use crate::types::*;

/// Running totals over the events of one interpretation.
#[derive(Debug, Default)]
struct Tally {
    text: String,
    recognized: usize,
    errors: usize,
    /// The next character event is the error character for a failed lookup.
    after_miss: bool,
}

impl Tally {
    fn add(&mut self, events: Vec<DecodeEvent>, max_output_length: usize) {
        for event in events {
            match event {
                DecodeEvent::Character(ch) => {
                    if ch != ' ' && !self.after_miss {
                        self.recognized += 1;
                    }
                    self.after_miss = false;
                    if self.text.chars().count() < max_output_length {
                        self.text.push(ch);
                    }
                }
                DecodeEvent::Error(err) => {
                    self.after_miss = matches!(err, DecodeError::NoCodeMatch { .. });
                    self.errors += 1;
                }
                DecodeEvent::Calibrated { .. } | DecodeEvent::Reset => {}
            }
        }
    }
}

/// Decode a recorded list of key-down/key-up durations.
///
/// The line is assumed up before the first signal. Consecutive signals with
/// the same level merge into one interval and zero-length signals are
/// skipped.
pub fn morse_interpret(
    signals: &[MorseSignal],
    params: &MorseInterpretParams,
) -> Result<MorseInterpretResult, ParamsError> {
    let mut decoder = Decoder::new(params.decoder.clone())?;
    let mut tally = Tally::default();
    let mut signals_processed = 0;
    let mut tick: Tick = 0;
    let mut level = false;

    for signal in signals {
        if signal.ticks == 0 {
            continue;
        }
        signals_processed += 1;

        if signal.on != level {
            level = signal.on;
            let edge = if level {
                Edge::rising(tick)
            } else {
                Edge::falling(tick)
            };
            tally.add(decoder.handle_edge(edge), params.max_output_length);
        }
        tick = tick.wrapping_add(signal.ticks);

        if tally.text.chars().count() >= params.max_output_length {
            debug!("interpret: output limit reached after {signals_processed} signals");
            break;
        }
    }

    if level {
        tally.add(decoder.handle_edge(Edge::falling(tick)), params.max_output_length);
    }
    if params.flush_trailing {
        tally.add(decoder.flush(), params.max_output_length);
    }

    let attempts = tally.recognized + tally.errors;
    let confidence = if attempts > 0 {
        tally.recognized as f32 / attempts as f32
    } else {
        0.0
    };

    Ok(MorseInterpretResult {
        text: tally.text,
        unit_length: decoder.unit_length(),
        confidence,
        signals_processed,
        patterns_recognized: tally.recognized,
        errors: tally.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_signal(on: bool, ticks: u32) -> MorseSignal {
        MorseSignal { on, ticks }
    }

    /// Signals for `symbols` (`.`/`-`, ` ` = char gap, `/` = word gap) at unit 100.
    fn keyed(symbols: &str) -> Vec<MorseSignal> {
        let mut signals = Vec::new();
        for c in symbols.chars() {
            match c {
                '.' => signals.push(create_test_signal(true, 100)),
                '-' => signals.push(create_test_signal(true, 300)),
                ' ' => {
                    signals.pop();
                    signals.push(create_test_signal(false, 300));
                    continue;
                }
                '/' => {
                    signals.pop();
                    signals.push(create_test_signal(false, 700));
                    continue;
                }
                _ => continue,
            }
            signals.push(create_test_signal(false, 100));
        }
        signals
    }

    #[test]
    fn test_empty_signals() {
        let params = MorseInterpretParams::default();
        let result = morse_interpret(&[], &params).unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.unit_length, None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_hello_world() {
        let params = MorseInterpretParams::default();
        // Calibration on "A", then HELLO WORLD.
        let signals = keyed(".- .... . .-.. .-.. ---/.-- --- .-. .-.. -..");
        let result = morse_interpret(&signals, &params).unwrap();
        assert_eq!(result.text, "HELLO WORLD");
        assert_eq!(result.unit_length, UnitLength::new(100));
        assert_eq!(result.patterns_recognized, 10);
        assert_eq!(result.errors, 0);
        assert!(result.confidence > 0.99);
    }

    #[test]
    fn test_without_flush() {
        let params = MorseInterpretParams {
            flush_trailing: false,
            ..Default::default()
        };
        let result = morse_interpret(&keyed(".- ... --- ..."), &params).unwrap();
        assert_eq!(result.text, "SO");
    }

    #[test]
    fn test_unknown_pattern_lowers_confidence() {
        let params = MorseInterpretParams::default();
        let result = morse_interpret(&keyed(".- ....... ..."), &params).unwrap();
        assert_eq!(result.text, "~S");
        assert_eq!(result.patterns_recognized, 1);
        assert_eq!(result.errors, 1);
        assert!((result.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_merges_and_skips() {
        let params = MorseInterpretParams::default();
        let mut signals = keyed(".-");
        signals.push(create_test_signal(false, 200));
        signals.push(create_test_signal(true, 0));
        signals.extend(keyed("-.-"));
        let result = morse_interpret(&signals, &params).unwrap();
        assert_eq!(result.text, "K");
        assert_eq!(result.signals_processed, signals.len() - 1);
    }

    #[test]
    fn test_output_limit() {
        let params = MorseInterpretParams {
            max_output_length: 2,
            ..Default::default()
        };
        let result = morse_interpret(&keyed(".- . . . . ."), &params).unwrap();
        assert_eq!(result.text, "EE");
    }

    #[test]
    fn test_invalid_params() {
        let params: MorseInterpretParams =
            serde_json::from_str(r#"{"bufferCapacity": 0}"#).unwrap();
        assert_eq!(
            morse_interpret(&[], &params).unwrap_err(),
            ParamsError::BufferCapacity(0)
        );
    }
}
