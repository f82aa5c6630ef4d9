// Per-character symbol buffer and table lookup.
use log::{debug, warn};

use crate::error::DecodeError;
use crate::patterns::{lookup, pattern_text};
use crate::types::{DecodeEvent, Symbol};

/// Bounded symbol sequence for the character being keyed.
#[derive(Debug, Clone)]
pub struct MorseBuffer {
    symbols: Vec<Symbol>,
    capacity: usize,
}

impl MorseBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Fails without modifying the buffer when it is full.
    pub fn push(&mut self, symbol: Symbol) -> Result<(), DecodeError> {
        if self.symbols.len() >= self.capacity {
            return Err(DecodeError::BufferOverflow {
                capacity: self.capacity,
            });
        }
        self.symbols.push(symbol);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}

/// Builds characters from symbols and boundaries, reporting into an event list.
#[derive(Debug, Clone)]
pub struct Accumulator {
    buffer: MorseBuffer,
    error_char: char,
}

impl Accumulator {
    pub fn new(capacity: usize, error_char: char) -> Self {
        Self {
            buffer: MorseBuffer::new(capacity),
            error_char,
        }
    }

    pub fn buffer(&self) -> &MorseBuffer {
        &self.buffer
    }

    /// On overflow the buffer is cleared and the symbol dropped.
    pub fn append(&mut self, symbol: Symbol, out: &mut Vec<DecodeEvent>) {
        match self.buffer.push(symbol) {
            Ok(()) => debug!("morse buffer: {}", pattern_text(self.buffer.as_slice())),
            Err(err) => {
                warn!("{err}, discarding {}", pattern_text(self.buffer.as_slice()));
                self.buffer.clear();
                out.push(DecodeEvent::Error(err));
            }
        }
    }

    pub fn end_of_character(&mut self, out: &mut Vec<DecodeEvent>) {
        self.flush(out);
    }

    pub fn end_of_word(&mut self, out: &mut Vec<DecodeEvent>) {
        self.flush(out);
        out.push(DecodeEvent::Character(' '));
    }

    /// Drop the character in progress after a bad pulse or space.
    pub fn discard(&mut self, err: DecodeError, out: &mut Vec<DecodeEvent>) {
        warn!("{err}, discarding {}", pattern_text(self.buffer.as_slice()));
        self.buffer.clear();
        out.push(DecodeEvent::Error(err));
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    fn flush(&mut self, out: &mut Vec<DecodeEvent>) {
        if self.buffer.is_empty() {
            return;
        }

        match lookup(self.buffer.as_slice()) {
            Some(ch) => {
                debug!("decoded {ch:?}");
                out.push(DecodeEvent::Character(ch));
            }
            None => {
                let err = DecodeError::NoCodeMatch {
                    pattern: pattern_text(self.buffer.as_slice()),
                };
                warn!("{err}");
                out.push(DecodeEvent::Error(err));
                out.push(DecodeEvent::Character(self.error_char));
            }
        }
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::{Dash, Dot};

    fn feed(acc: &mut Accumulator, symbols: &[Symbol]) -> Vec<DecodeEvent> {
        let mut out = Vec::new();
        for &s in symbols {
            acc.append(s, &mut out);
        }
        out
    }

    fn chars(events: &[DecodeEvent]) -> String {
        events.iter().filter_map(DecodeEvent::as_char).collect()
    }

    #[test]
    fn test_four_dots_make_h() {
        let mut acc = Accumulator::new(8, '~');
        assert!(feed(&mut acc, &[Dot, Dot, Dot, Dot]).is_empty());
        let mut out = Vec::new();
        acc.end_of_character(&mut out);
        assert_eq!(out, vec![DecodeEvent::Character('H')]);
        assert!(acc.buffer().is_empty());
    }

    #[test]
    fn test_end_of_word_adds_space() {
        let mut acc = Accumulator::new(8, '~');
        feed(&mut acc, &[Dash, Dash, Dash]);
        let mut out = Vec::new();
        acc.end_of_word(&mut out);
        assert_eq!(chars(&out), "O ");
    }

    #[test]
    fn test_ninth_symbol_overflows() {
        let mut acc = Accumulator::new(8, '~');
        let out = feed(&mut acc, &[Dot; 9]);
        assert_eq!(
            out,
            vec![DecodeEvent::Error(DecodeError::BufferOverflow { capacity: 8 })]
        );
        assert!(acc.buffer().is_empty());

        // The overflowing symbol is not retried.
        let mut out = Vec::new();
        acc.end_of_character(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_pattern_emits_error_char() {
        let mut acc = Accumulator::new(8, '#');
        feed(&mut acc, &[Dot; 7]);
        let mut out = Vec::new();
        acc.end_of_character(&mut out);
        assert_eq!(
            out,
            vec![
                DecodeEvent::Error(DecodeError::NoCodeMatch {
                    pattern: ".......".to_string()
                }),
                DecodeEvent::Character('#'),
            ]
        );
    }

    #[test]
    fn test_discard_clears_without_output_char() {
        let mut acc = Accumulator::new(8, '~');
        feed(&mut acc, &[Dot, Dash]);
        let mut out = Vec::new();
        acc.discard(DecodeError::BadSpace { width: 180 }, &mut out);
        assert_eq!(chars(&out), "");
        assert!(acc.buffer().is_empty());
    }

    #[test]
    fn test_empty_boundaries() {
        let mut acc = Accumulator::new(8, '~');
        let mut out = Vec::new();
        acc.end_of_character(&mut out);
        assert!(out.is_empty());
        acc.end_of_word(&mut out);
        assert_eq!(chars(&out), " ");
    }
}
