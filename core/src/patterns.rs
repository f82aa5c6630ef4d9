// Morse code table: ITU patterns for letters, digits and common punctuation.
// Lookups are exact, symbol for symbol.
use crate::types::Symbol;

pub type MorsePattern = &'static [Symbol];

const DOT: Symbol = Symbol::Dot;
const DASH: Symbol = Symbol::Dash;

/// Longest pattern in the table (`$`, `...-..-`).
pub const MAX_PATTERN_LEN: usize = 7;

static CODE_TABLE: &[(char, MorsePattern)] = &[
    // Letters
    ('A', &[DOT, DASH]),
    ('B', &[DASH, DOT, DOT, DOT]),
    ('C', &[DASH, DOT, DASH, DOT]),
    ('D', &[DASH, DOT, DOT]),
    ('E', &[DOT]),
    ('F', &[DOT, DOT, DASH, DOT]),
    ('G', &[DASH, DASH, DOT]),
    ('H', &[DOT, DOT, DOT, DOT]),
    ('I', &[DOT, DOT]),
    ('J', &[DOT, DASH, DASH, DASH]),
    ('K', &[DASH, DOT, DASH]),
    ('L', &[DOT, DASH, DOT, DOT]),
    ('M', &[DASH, DASH]),
    ('N', &[DASH, DOT]),
    ('O', &[DASH, DASH, DASH]),
    ('P', &[DOT, DASH, DASH, DOT]),
    ('Q', &[DASH, DASH, DOT, DASH]),
    ('R', &[DOT, DASH, DOT]),
    ('S', &[DOT, DOT, DOT]),
    ('T', &[DASH]),
    ('U', &[DOT, DOT, DASH]),
    ('V', &[DOT, DOT, DOT, DASH]),
    ('W', &[DOT, DASH, DASH]),
    ('X', &[DASH, DOT, DOT, DASH]),
    ('Y', &[DASH, DOT, DASH, DASH]),
    ('Z', &[DASH, DASH, DOT, DOT]),
    // Digits
    ('1', &[DOT, DASH, DASH, DASH, DASH]),
    ('2', &[DOT, DOT, DASH, DASH, DASH]),
    ('3', &[DOT, DOT, DOT, DASH, DASH]),
    ('4', &[DOT, DOT, DOT, DOT, DASH]),
    ('5', &[DOT, DOT, DOT, DOT, DOT]),
    ('6', &[DASH, DOT, DOT, DOT, DOT]),
    ('7', &[DASH, DASH, DOT, DOT, DOT]),
    ('8', &[DASH, DASH, DASH, DOT, DOT]),
    ('9', &[DASH, DASH, DASH, DASH, DOT]),
    ('0', &[DASH, DASH, DASH, DASH, DASH]),
    // Punctuation
    ('?', &[DOT, DOT, DASH, DASH, DOT, DOT]),
    ('.', &[DOT, DASH, DOT, DASH, DOT, DASH]),
    (',', &[DASH, DASH, DOT, DOT, DASH, DASH]),
    (':', &[DASH, DASH, DASH, DOT, DOT, DOT]),
    ('\'', &[DOT, DASH, DASH, DASH, DASH, DOT]),
    ('-', &[DASH, DOT, DOT, DOT, DOT, DASH]),
    ('/', &[DASH, DOT, DOT, DASH, DOT]),
    ('(', &[DASH, DOT, DASH, DASH, DOT]),
    (')', &[DASH, DOT, DASH, DASH, DOT, DASH]),
    ('"', &[DOT, DASH, DOT, DOT, DASH, DOT]),
    ('=', &[DASH, DOT, DOT, DOT, DASH]),
    ('!', &[DASH, DOT, DASH, DOT, DASH, DASH]),
    ('$', &[DOT, DOT, DOT, DASH, DOT, DOT, DASH]),
    ('&', &[DOT, DASH, DOT, DOT, DOT]),
    ('+', &[DOT, DASH, DOT, DASH, DOT]),
    (';', &[DASH, DOT, DASH, DOT, DASH, DOT]),
    ('@', &[DOT, DASH, DASH, DOT, DASH, DOT]),
    ('_', &[DOT, DOT, DASH, DASH, DOT, DASH]),
];

/// Character for a symbol sequence, if the table has one.
pub fn lookup(symbols: &[Symbol]) -> Option<char> {
    CODE_TABLE
        .iter()
        .find(|(_, pattern)| *pattern == symbols)
        .map(|&(ch, _)| ch)
}

/// Pattern for a character; letters match in either case.
pub fn get_morse_pattern(ch: char) -> Option<MorsePattern> {
    let ch = ch.to_ascii_uppercase();
    CODE_TABLE
        .iter()
        .find(|&&(c, _)| c == ch)
        .map(|&(_, pattern)| pattern)
}

/// Render symbols as dot/dash text, e.g. `.-..`.
pub fn pattern_text(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}
