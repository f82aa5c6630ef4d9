use crate::patterns::get_morse_pattern;
use crate::types::{Edge, EdgeKind, KeyingParams, Symbol, Tick};

// ITU timing in units
const UNITS_PER_DOT: u32 = 1;
const UNITS_PER_DASH: u32 = 3;
const UNITS_PER_ELEMENT_GAP: u32 = 1;
const UNITS_PER_CHAR_GAP: u32 = 3;
const UNITS_PER_WORD_GAP: u32 = 7;

// Seed used when the caller passes 0
const DEFAULT_SEED: u32 = 0x5EED;

// Simple PRNG state for jitter - we need deterministic randomness
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        let actual_seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            state: actual_seed.wrapping_add(1),
        }
    }

    fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        (self.state >> 16) as f32 / 65536.0
    }
}

struct Clock {
    tick: Tick,
    unit: u32,
    jitter: u32,
    rng: Option<SimpleRng>,
}

impl Clock {
    /// Advance by `units`, plus up to ±jitter ticks. Never by less than one tick.
    fn advance(&mut self, units: u32) -> Result<Tick, String> {
        let base = i64::from(units) * i64::from(self.unit);
        let offset = match self.rng.as_mut() {
            Some(rng) => ((rng.next_f32() - 0.5) * 2.0 * self.jitter as f32).round() as i64,
            None => 0,
        };
        let ticks = u32::try_from((base + offset).max(1))
            .map_err(|_| "Duration exceeds tick range".to_string())?;
        self.tick = self
            .tick
            .checked_add(ticks)
            .ok_or_else(|| "Timeline exceeds tick range".to_string())?;
        Ok(self.tick)
    }
}

/// Render text as the key-line edges an ideal operator would produce.
///
/// Spaces become word gaps; characters without a pattern are skipped.
/// The last character is not followed by a gap, so a live decoder only
/// resolves it once the next pulse starts.
pub fn key_edges(text: &str, params: &KeyingParams) -> Result<Vec<Edge>, String> {
    if params.unit_ticks == 0 {
        return Err("Invalid unit length".to_string());
    }
    if params.jitter_ticks >= params.unit_ticks {
        return Err("Jitter must be smaller than the unit length".to_string());
    }

    let mut clock = Clock {
        tick: params.start_tick,
        unit: params.unit_ticks,
        jitter: params.jitter_ticks,
        rng: (params.jitter_ticks > 0).then(|| SimpleRng::new(params.random_seed)),
    };

    let mut edges = Vec::new();
    let mut pending_gap: Option<u32> = None;

    for ch in text.chars() {
        if ch == ' ' {
            if !edges.is_empty() {
                pending_gap = Some(UNITS_PER_WORD_GAP);
            }
            continue;
        }

        let Some(pattern) = get_morse_pattern(ch) else {
            continue;
        };

        if let Some(units) = pending_gap.take() {
            clock.advance(units)?;
        }

        for (i, &symbol) in pattern.iter().enumerate() {
            if i > 0 {
                clock.advance(UNITS_PER_ELEMENT_GAP)?;
            }
            edges.push(Edge::rising(clock.tick));
            let units = match symbol {
                Symbol::Dot => UNITS_PER_DOT,
                Symbol::Dash => UNITS_PER_DASH,
            };
            edges.push(Edge::falling(clock.advance(units)?));
        }

        pending_gap = Some(UNITS_PER_CHAR_GAP);
    }

    Ok(edges)
}

/// Expand edges into the key level at every tick in `[0, end)`.
pub fn line_levels(edges: &[Edge], end: Tick) -> impl Iterator<Item = (Tick, bool)> + '_ {
    let mut next = 0;
    let mut level = false;
    (0..end).map(move |tick| {
        while next < edges.len() && edges[next].tick <= tick {
            level = edges[next].kind == EdgeKind::Rising;
            next += 1;
        }
        (tick, level)
    })
}
