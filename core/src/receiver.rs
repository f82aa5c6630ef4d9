// Tick-driven front end: debounced key and reset lines feeding a `Decoder`
use log::{debug, info};

use crate::debounce::{Debouncer, Transition};
use crate::decoder::Decoder;
use crate::error::ParamsError;
use crate::sampler::EdgeSampler;
use crate::types::{DecodeEvent, DecoderParams, LineSample, Tick};

#[derive(Debug, Clone)]
pub struct Receiver {
    key: Debouncer,
    reset_button: Debouncer,
    sampler: EdgeSampler,
    decoder: Decoder,
    transcript: String,
}

impl Receiver {
    pub fn new(params: DecoderParams) -> Result<Self, ParamsError> {
        let settle = params.debounce_ticks;
        Ok(Self {
            key: Debouncer::new(settle),
            reset_button: Debouncer::new(settle),
            sampler: EdgeSampler::new(),
            decoder: Decoder::new(params)?,
            transcript: String::new(),
        })
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Every character decoded so far, spaces included.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn take_transcript(&mut self) -> String {
        std::mem::take(&mut self.transcript)
    }

    /// Process one scheduler tick.
    ///
    /// A reset press settling on this tick is applied before the key line,
    /// so an edge reported on the same tick starts the new calibration.
    pub fn poll(&mut self, sample: LineSample, now: Tick) -> Vec<DecodeEvent> {
        let mut events = Vec::new();

        if let Some(Transition { level: true, at }) = self.reset_button.poll(sample.reset, now) {
            info!("reset button pressed at tick {at}");
            events.extend(self.decoder.reset());
        }

        if let Some(Transition { level, at }) = self.key.poll(sample.key, now) {
            debug!("key line settled {} at tick {at}", if level { "down" } else { "up" });
        }
        if let Some(edge) = self.sampler.sample(self.key.level(), self.key.since()) {
            events.extend(self.decoder.handle_edge(edge));
        }

        self.record(&events);
        events
    }

    /// Out-of-band operator reset. The line debouncers keep their state.
    pub fn reset(&mut self) -> Vec<DecodeEvent> {
        self.decoder.reset()
    }

    fn record(&mut self, events: &[DecodeEvent]) {
        self.transcript
            .extend(events.iter().filter_map(DecodeEvent::as_char));
    }
}
