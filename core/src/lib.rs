// Self-calibrating Morse decoder for a single keyed input line.
//
// Pipeline: Debouncer -> EdgeSampler -> Calibrator -> Classifier -> Accumulator.
// `Receiver` runs the whole chain once per scheduler tick; `Decoder` starts at
// the edge level for callers that already have clean transitions.

pub mod accumulate;
pub mod calibrate;
pub mod classify;
pub mod debounce;
pub mod decoder;
pub mod error;
pub mod interpret;
pub mod patterns;
pub mod receiver;
pub mod sampler;
pub mod timing;
pub mod types;

// Re-export main public API
pub use decoder::Decoder;
pub use error::{DecodeError, ParamsError};
pub use interpret::morse_interpret;
pub use receiver::Receiver;
pub use timing::{key_edges, line_levels};
pub use types::*;

/// Decode a list of clean edges in one go.
pub fn decode_edges(edges: &[Edge], params: &DecoderParams) -> Result<Vec<DecodeEvent>, ParamsError> {
    let mut decoder = Decoder::new(params.clone())?;
    Ok(edges
        .iter()
        .flat_map(|&edge| decoder.handle_edge(edge))
        .collect())
}

/// Render text as key-line edges and run them through a tick-driven receiver.
pub fn decode_keyed_text(
    text: &str,
    keying: &KeyingParams,
    params: &DecoderParams,
) -> Result<String, String> {
    let edges = timing::key_edges(text, keying)?;
    let mut receiver = Receiver::new(params.clone()).map_err(|e| e.to_string())?;
    let end = edges
        .last()
        .map_or(0, |e| e.tick)
        .saturating_add(params.debounce_ticks + 1);
    for (tick, key) in timing::line_levels(&edges, end) {
        receiver.poll(LineSample { key, reset: false }, tick);
    }
    Ok(receiver.take_transcript())
}
