// WebAssembly bindings for the self-calibrating Morse receiver
use js_sys::Array;
use morse_rx_core::types::*;
use morse_rx_core::{interpret, timing, Receiver};
use wasm_bindgen::prelude::*;

mod logger;
#[macro_use]
mod support;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Forward decoder logs to the browser console at `level` ("debug", "info", ...).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logger::install(logger::parse_level(level));
}

// Tick-driven receiver: call `poll` once per scheduler tick
#[wasm_bindgen]
pub struct WasmReceiver {
    inner: Receiver,
}

#[wasm_bindgen]
impl WasmReceiver {
    /// Invalid decoder parameters are reported instead of replaced by defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmReceiver, JsValue> {
        let params = DecoderParams::from_json(config_json).map_err(to_js_error)?;
        let inner = Receiver::new(params).map_err(to_js_error)?;
        Ok(WasmReceiver { inner })
    }

    /// Characters decoded on this tick, usually empty.
    pub fn poll(&mut self, key: bool, reset: bool, now: u32) -> String {
        self.inner
            .poll(LineSample { key, reset }, now)
            .iter()
            .filter_map(DecodeEvent::as_char)
            .collect()
    }

    /// All events of this tick as `{ type, value }` objects.
    pub fn poll_events(&mut self, key: bool, reset: bool, now: u32) -> Result<JsValue, JsValue> {
        let events = self.inner.poll(LineSample { key, reset }, now);
        serde_wasm_bindgen::to_value(&events).map_err(JsValue::from)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn calibrated(&self) -> bool {
        self.inner.decoder().is_calibrated()
    }

    #[wasm_bindgen(getter)]
    pub fn unit_length(&self) -> Option<u32> {
        self.inner.decoder().unit_length().map(UnitLength::ticks)
    }

    #[wasm_bindgen(getter)]
    pub fn transcript(&self) -> String {
        self.inner.transcript().to_string()
    }

    pub fn take_transcript(&mut self) -> String {
        self.inner.take_transcript()
    }
}

// JavaScript-compatible result type
#[wasm_bindgen]
pub struct KeyEdgesResult {
    edges: Vec<Edge>,
}

#[wasm_bindgen]
impl KeyEdgesResult {
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.edges.len()
    }

    /// Tick just after the last edge, or 0 when there are none.
    #[wasm_bindgen(getter)]
    pub fn end_tick(&self) -> u32 {
        self.edges.last().map_or(0, |e| e.tick.saturating_add(1))
    }

    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Result<Array, JsValue> {
        let array = Array::new();
        for edge in &self.edges {
            let obj = js_sys::Object::new();
            let kind = match edge.kind {
                EdgeKind::Rising => "rising",
                EdgeKind::Falling => "falling",
            };
            js_sys::Reflect::set(&obj, &"type".into(), &kind.into())?;
            js_sys::Reflect::set(&obj, &"tick".into(), &edge.tick.into())?;
            array.push(&obj);
        }
        Ok(array)
    }

    /// Key level at `tick`, for driving a receiver from JavaScript.
    pub fn level_at(&self, tick: u32) -> bool {
        self.edges
            .iter()
            .take_while(|e| e.tick <= tick)
            .last()
            .map_or(false, |e| e.kind == EdgeKind::Rising)
    }
}

wasm_fn! {
    /// Render text as the key-line edges of an ideal operator.
    pub fn generate_key_edges(text: &str, config_json: &str) -> Result<KeyEdgesResult, JsValue>
    with timing::key_edges, KeyingParams, |edges| KeyEdgesResult { edges }
}

#[wasm_bindgen]
pub struct MorseInterpretResultJs {
    result: MorseInterpretResult,
}

#[wasm_bindgen]
impl MorseInterpretResultJs {
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.result.text.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn unit_length(&self) -> Option<u32> {
        self.result.unit_length.map(UnitLength::ticks)
    }

    #[wasm_bindgen(getter)]
    pub fn confidence(&self) -> f32 {
        self.result.confidence
    }

    #[wasm_bindgen(getter)]
    pub fn signals_processed(&self) -> usize {
        self.result.signals_processed
    }

    #[wasm_bindgen(getter)]
    pub fn patterns_recognized(&self) -> usize {
        self.result.patterns_recognized
    }

    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> usize {
        self.result.errors
    }
}

#[wasm_bindgen]
pub fn interpret_morse_signals(
    signals_json: &str,
    config_json: &str,
) -> Result<MorseInterpretResultJs, JsValue> {
    let signals: Vec<MorseSignal> = serde_json::from_str(signals_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid signals JSON: {}", e)))?;

    let params = support::parse_with_defaults::<MorseInterpretParams>(config_json);

    let result = interpret::morse_interpret(&signals, &params).map_err(to_js_error)?;

    Ok(MorseInterpretResultJs { result })
}
