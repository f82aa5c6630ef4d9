// Unit-length calibration from the operator's first pulses
use log::{debug, info};

use crate::types::{CalibrationParams, Edge, EdgeKind, Tick, UnitLength};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    WaitFirstRise,
    WaitFirstFall { rise: Tick },
    WaitSecondRise { first: u32 },
    WaitSecondFall { first: u32, rise: Tick },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    Pending,
    Complete(UnitLength),
}

/// Compares pairs of pulses until one is about a third of the other.
#[derive(Debug, Clone)]
pub struct Calibrator {
    state: CalibrationState,
    params: CalibrationParams,
}

impl Calibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self {
            state: CalibrationState::WaitFirstRise,
            params,
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn on_edge(&mut self, edge: Edge) -> CalibrationStep {
        use CalibrationState::*;

        match (self.state, edge.kind) {
            (WaitFirstRise, EdgeKind::Rising) => {
                self.state = WaitFirstFall { rise: edge.tick };
            }
            (WaitFirstFall { rise }, EdgeKind::Falling) => {
                let width = edge.tick.wrapping_sub(rise);
                self.state = if width == 0 {
                    WaitFirstRise
                } else {
                    debug!("calibration: first pulse {width} ticks");
                    WaitSecondRise { first: width }
                };
            }
            (WaitSecondRise { first }, EdgeKind::Rising) => {
                self.state = WaitSecondFall {
                    first,
                    rise: edge.tick,
                };
            }
            (WaitSecondFall { first, rise }, EdgeKind::Falling) => {
                let second = edge.tick.wrapping_sub(rise);
                if second == 0 {
                    self.state = WaitSecondRise { first };
                    return CalibrationStep::Pending;
                }
                return self.compare(first, second);
            }
            // Out-of-order edge for this state, e.g. the line was already
            // down when calibration (re)started.
            _ => {}
        }

        CalibrationStep::Pending
    }

    fn compare(&mut self, first: u32, second: u32) -> CalibrationStep {
        let ratio = 100.0 * f64::from(first) / f64::from(second);
        debug!("calibration: second pulse {second} ticks, ratio {ratio:.2}");

        let dot = if ratio <= self.params.short_ratio_max {
            first
        } else if ratio > self.params.long_ratio_min {
            second
        } else {
            self.state = CalibrationState::WaitSecondRise { first: second };
            return CalibrationStep::Pending;
        };

        // Both widths are non-zero here.
        match UnitLength::new(dot) {
            Some(unit) => {
                info!("calibration complete: unit length {} ticks", unit.ticks());
                self.state = CalibrationState::WaitFirstRise;
                CalibrationStep::Complete(unit)
            }
            None => {
                self.state = CalibrationState::WaitFirstRise;
                CalibrationStep::Pending
            }
        }
    }
}
