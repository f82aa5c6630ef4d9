// Edge-driven decoder: calibration, classification and character assembly
use log::{debug, info};

use crate::accumulate::Accumulator;
use crate::calibrate::{CalibrationState, CalibrationStep, Calibrator};
use crate::classify::{Classified, Classifier};
use crate::error::ParamsError;
use crate::types::{DecodeEvent, DecoderParams, Edge, Space, Symbol, UnitLength};

#[derive(Debug, Clone)]
enum Stage {
    Calibrating(Calibrator),
    /// Calibrated, waiting for the first end-of-character gap.
    Syncing(Classifier),
    Decoding(Classifier),
}

/// All state for one calibration epoch. A reset drops the unit length and
/// the character in progress.
#[derive(Debug, Clone)]
pub struct Decoder {
    params: DecoderParams,
    stage: Stage,
    accumulator: Accumulator,
}

impl Decoder {
    pub fn new(params: DecoderParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            stage: Stage::Calibrating(Calibrator::new(params.calibration)),
            accumulator: Accumulator::new(params.buffer_capacity, params.error_char),
            params,
        })
    }

    /// `None` until calibration completes.
    pub fn unit_length(&self) -> Option<UnitLength> {
        match &self.stage {
            Stage::Calibrating(_) => None,
            Stage::Syncing(c) | Stage::Decoding(c) => Some(c.unit_length()),
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.unit_length().is_some()
    }

    /// Whether pulses are currently being turned into symbols.
    pub fn is_decoding(&self) -> bool {
        matches!(self.stage, Stage::Decoding(_))
    }

    pub fn calibration_state(&self) -> Option<CalibrationState> {
        match &self.stage {
            Stage::Calibrating(cal) => Some(cal.state()),
            _ => None,
        }
    }

    /// Symbols of the character in progress.
    pub fn buffer(&self) -> &[Symbol] {
        self.accumulator.buffer().as_slice()
    }

    pub fn handle_edge(&mut self, edge: Edge) -> Vec<DecodeEvent> {
        let mut out = Vec::new();
        debug!("{:?} edge at tick {}", edge.kind, edge.tick);

        match &mut self.stage {
            Stage::Calibrating(cal) => {
                if let CalibrationStep::Complete(unit) = cal.on_edge(edge) {
                    let mut classifier = Classifier::new(unit, self.params.tolerances);
                    // Calibration completes on a fall: open the following gap.
                    classifier.on_edge(edge);
                    self.stage = if self.params.sync_after_calibration {
                        Stage::Syncing(classifier)
                    } else {
                        Stage::Decoding(classifier)
                    };
                    out.push(DecodeEvent::Calibrated { unit_length: unit });
                }
            }
            Stage::Syncing(classifier) => {
                if let Some(Ok(Classified::Space(Space::EndOfCharacter))) = classifier.on_edge(edge)
                {
                    debug!("synchronized on character boundary");
                    let classifier = classifier.clone();
                    self.stage = Stage::Decoding(classifier);
                }
            }
            Stage::Decoding(classifier) => match classifier.on_edge(edge) {
                None | Some(Ok(Classified::Space(Space::IntraCharacter))) => {}
                Some(Ok(Classified::Symbol(symbol))) => self.accumulator.append(symbol, &mut out),
                Some(Ok(Classified::Space(Space::EndOfCharacter))) => {
                    self.accumulator.end_of_character(&mut out)
                }
                Some(Ok(Classified::Space(Space::EndOfWord))) => {
                    self.accumulator.end_of_word(&mut out)
                }
                Some(Err(err)) => self.accumulator.discard(err, &mut out),
            },
        }

        out
    }

    /// Decode the character in progress as if an end-of-character gap followed.
    pub fn flush(&mut self) -> Vec<DecodeEvent> {
        let mut out = Vec::new();
        if self.is_decoding() {
            self.accumulator.end_of_character(&mut out);
        }
        out
    }

    /// Forget the unit length and the character in progress.
    pub fn reset(&mut self) -> Vec<DecodeEvent> {
        info!("decoder reset, recalibrating");
        self.accumulator.reset();
        self.stage = Stage::Calibrating(Calibrator::new(self.params.calibration));
        vec![DecodeEvent::Reset]
    }
}
