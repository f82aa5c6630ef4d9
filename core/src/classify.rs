// Pulse and gap classification against a calibrated unit length.
//
// Bands, with `U` the unit length and tolerances in ticks:
//
// | interval | band                     | result         |
// |----------|--------------------------|----------------|
// | pulse    | `[U-1, U+1]`             | dot            |
// | pulse    | `[3U-10, 3U+10]`         | dash           |
// | gap      | `(U-6, U+6)`             | intra-character|
// | gap      | `[3U-52, 3U+52]`         | end of char    |
// | gap      | `[7U-122, 7U+122]`       | end of word    |
//
// Bands are tried shortest first, so if two ever overlap the shorter wins.
use log::debug;

use crate::error::DecodeError;
use crate::types::{Edge, EdgeKind, Space, Symbol, Tick, Tolerances, UnitLength};

/// What a closed interval turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified {
    Symbol(Symbol),
    Space(Space),
}

/// The interval currently open on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interval {
    Unknown,
    Pulse { rise: Tick },
    Gap { fall: Tick },
}

#[derive(Debug, Clone)]
pub struct Classifier {
    unit: UnitLength,
    tolerances: Tolerances,
    open: Interval,
}

fn within(width: u32, center: i64, tolerance: u32) -> bool {
    let width = i64::from(width);
    let tolerance = i64::from(tolerance);
    width >= center - tolerance && width <= center + tolerance
}

fn strictly_within(width: u32, center: i64, tolerance: u32) -> bool {
    let width = i64::from(width);
    let tolerance = i64::from(tolerance);
    width > center - tolerance && width < center + tolerance
}

impl Classifier {
    pub fn new(unit: UnitLength, tolerances: Tolerances) -> Self {
        Self {
            unit,
            tolerances,
            open: Interval::Unknown,
        }
    }

    pub fn unit_length(&self) -> UnitLength {
        self.unit
    }

    fn units(&self, n: i64) -> i64 {
        n * i64::from(self.unit.ticks())
    }

    pub fn classify_pulse(&self, width: u32) -> Result<Symbol, DecodeError> {
        let tol = &self.tolerances;
        if within(width, self.units(1), tol.dot_pulse) {
            Ok(Symbol::Dot)
        } else if within(width, self.units(3), tol.dash_pulse) {
            Ok(Symbol::Dash)
        } else {
            Err(DecodeError::BadPulse { width })
        }
    }

    pub fn classify_space(&self, width: u32) -> Result<Space, DecodeError> {
        let tol = &self.tolerances;
        if strictly_within(width, self.units(1), tol.dot_space) {
            Ok(Space::IntraCharacter)
        } else if within(width, self.units(3), tol.char_space) {
            Ok(Space::EndOfCharacter)
        } else if within(width, self.units(7), tol.word_space) {
            Ok(Space::EndOfWord)
        } else {
            Err(DecodeError::BadSpace { width })
        }
    }

    /// Track the open interval and classify the one this edge closes.
    ///
    /// Returns `None` when the edge closes nothing measurable, i.e. the
    /// first edge seen or a repeated edge of the same kind.
    pub fn on_edge(&mut self, edge: Edge) -> Option<Result<Classified, DecodeError>> {
        let closed = match (self.open, edge.kind) {
            (Interval::Gap { fall }, EdgeKind::Rising) => {
                let width = edge.tick.wrapping_sub(fall);
                let space = self.classify_space(width);
                debug!("gap {width} ticks: {space:?}");
                Some(space.map(Classified::Space))
            }
            (Interval::Pulse { rise }, EdgeKind::Falling) => {
                let width = edge.tick.wrapping_sub(rise);
                let symbol = self.classify_pulse(width);
                debug!("pulse {width} ticks: {symbol:?}");
                Some(symbol.map(Classified::Symbol))
            }
            _ => None,
        };

        self.open = match edge.kind {
            EdgeKind::Rising => Interval::Pulse { rise: edge.tick },
            EdgeKind::Falling => Interval::Gap { fall: edge.tick },
        };
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(unit: u32) -> Classifier {
        Classifier::new(UnitLength::new(unit).unwrap(), Tolerances::default())
    }

    #[test]
    fn test_pulse_bands() {
        let c = classifier(100);
        for w in 99..=101 {
            assert_eq!(c.classify_pulse(w), Ok(Symbol::Dot), "width {w}");
        }
        for w in 290..=310 {
            assert_eq!(c.classify_pulse(w), Ok(Symbol::Dash), "width {w}");
        }
        for w in [0, 50, 98, 102, 200, 289, 311, 700] {
            assert_eq!(
                c.classify_pulse(w),
                Err(DecodeError::BadPulse { width: w }),
                "width {w}"
            );
        }
    }

    #[test]
    fn test_space_bands() {
        let c = classifier(100);
        for w in 95..=105 {
            assert_eq!(c.classify_space(w), Ok(Space::IntraCharacter), "width {w}");
        }
        for w in [94, 106, 247] {
            assert_eq!(c.classify_space(w), Err(DecodeError::BadSpace { width: w }));
        }
        for w in 248..=352 {
            assert_eq!(c.classify_space(w), Ok(Space::EndOfCharacter), "width {w}");
        }
        for w in [353, 577] {
            assert_eq!(c.classify_space(w), Err(DecodeError::BadSpace { width: w }));
        }
        for w in 578..=822 {
            assert_eq!(c.classify_space(w), Ok(Space::EndOfWord), "width {w}");
        }
        assert_eq!(
            c.classify_space(823),
            Err(DecodeError::BadSpace { width: 823 })
        );
    }

    #[test]
    fn test_small_unit_does_not_underflow() {
        // Dash band is [-4, 16] here.
        let c = classifier(2);
        assert_eq!(c.classify_pulse(1), Ok(Symbol::Dot));
        assert_eq!(c.classify_pulse(0), Ok(Symbol::Dash));
        assert_eq!(c.classify_pulse(17), Err(DecodeError::BadPulse { width: 17 }));
        assert_eq!(c.classify_space(0), Ok(Space::IntraCharacter));
    }

    #[test]
    fn test_overlapping_bands_prefer_shorter() {
        // With a unit of 5 ticks the dash band [5, 25] swallows the dot band.
        let c = classifier(5);
        assert_eq!(c.classify_pulse(5), Ok(Symbol::Dot));
        assert_eq!(c.classify_pulse(7), Ok(Symbol::Dash));
    }

    #[test]
    fn test_edges_close_intervals() {
        let mut c = classifier(100);
        assert_eq!(c.on_edge(Edge::rising(0)), None);
        assert_eq!(
            c.on_edge(Edge::falling(300)),
            Some(Ok(Classified::Symbol(Symbol::Dash)))
        );
        assert_eq!(
            c.on_edge(Edge::rising(400)),
            Some(Ok(Classified::Space(Space::IntraCharacter)))
        );
        assert_eq!(
            c.on_edge(Edge::falling(450)),
            Some(Err(DecodeError::BadPulse { width: 50 }))
        );
        assert_eq!(
            c.on_edge(Edge::rising(1150)),
            Some(Ok(Classified::Space(Space::EndOfWord)))
        );
    }

    #[test]
    fn test_repeated_edge_restarts_interval() {
        let mut c = classifier(100);
        c.on_edge(Edge::rising(0));
        assert_eq!(c.on_edge(Edge::rising(50)), None);
        assert_eq!(
            c.on_edge(Edge::falling(150)),
            Some(Ok(Classified::Symbol(Symbol::Dot)))
        );
    }
}
