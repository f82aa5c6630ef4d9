// Contact debouncing for a polled binary line
use crate::types::Tick;

/// A stable level change of a debounced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub level: bool,
    pub at: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Stable {
        level: bool,
        since: Tick,
    },
    Settling {
        level: bool,
        since: Tick,
        first_change: Tick,
        last_change: Tick,
    },
}

/// Settle-window debouncer. A raw change restarts the window; a level that
/// reverts before it expires is never reported.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: State,
    settle_ticks: u32,
    /// Raw level seen on the previous poll.
    last_raw: bool,
}

impl Debouncer {
    pub fn new(settle_ticks: u32) -> Self {
        Self {
            state: State::Init,
            settle_ticks,
            last_raw: false,
        }
    }

    /// Last reported stable level. `false` before the first poll.
    pub fn level(&self) -> bool {
        match self.state {
            State::Init => false,
            State::Stable { level, .. } | State::Settling { level, .. } => level,
        }
    }

    /// Tick at which the current stable level began.
    pub fn since(&self) -> Tick {
        match self.state {
            State::Init => 0,
            State::Stable { since, .. } | State::Settling { since, .. } => since,
        }
    }

    /// Feed one raw sample. Never fails, only delays.
    pub fn poll(&mut self, raw: bool, now: Tick) -> Option<Transition> {
        let raw_changed = raw != self.last_raw;
        self.last_raw = raw;

        match self.state {
            State::Init => {
                self.state = State::Stable {
                    level: raw,
                    since: now,
                };
                None
            }
            State::Stable { level, .. } if raw == level => None,
            State::Stable { level, since } => {
                self.state = State::Settling {
                    level,
                    since,
                    first_change: now,
                    last_change: now,
                };
                self.settle(raw, now)
            }
            State::Settling {
                level,
                since,
                first_change,
                last_change,
            } => {
                let last_change = if raw_changed { now } else { last_change };
                self.state = State::Settling {
                    level,
                    since,
                    first_change,
                    last_change,
                };
                self.settle(raw, now)
            }
        }
    }

    fn settle(&mut self, raw: bool, now: Tick) -> Option<Transition> {
        let State::Settling {
            level,
            since,
            first_change,
            last_change,
        } = self.state
        else {
            return None;
        };

        if now.wrapping_sub(last_change) < self.settle_ticks {
            return None;
        }

        if raw == level {
            // Bounced back before settling.
            self.state = State::Stable { level, since };
            return None;
        }

        self.state = State::Stable {
            level: raw,
            since: first_change,
        };
        Some(Transition {
            level: raw,
            at: first_change,
        })
    }
}
