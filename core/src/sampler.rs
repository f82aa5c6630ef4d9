use crate::types::{Edge, Tick};

/// Turns a polled stable level into rising/falling edges.
///
/// Only the last seen level is kept, so at most one edge comes out per poll
/// and polling an unchanged level is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EdgeSampler {
    last: Option<bool>,
}

impl EdgeSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, level: bool, at: Tick) -> Option<Edge> {
        let previous = self.last.replace(level);
        match previous {
            None => None,
            Some(prev) if prev == level => None,
            Some(_) if level => Some(Edge::rising(at)),
            Some(_) => Some(Edge::falling(at)),
        }
    }
}
