//! Typing banner - reveals and erases texts one character at a time

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingTimings {
    pub type_ms: u64,
    pub delete_ms: u64,
    pub hold_ms: u64,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Typing,
    Holding,
    Deleting,
}

#[derive(Debug, Clone)]
pub struct TypingTicker {
    texts: Vec<String>,
    timings: TypingTimings,
    current: usize,
    shown: usize,
    phase: Phase,
    pending: Duration,
    until_next: Duration,
}

impl TypingTicker {
    pub fn new(texts: Vec<String>, timings: TypingTimings) -> Self {
        Self {
            texts,
            timings,
            current: 0,
            shown: 0,
            phase: Phase::Typing,
            pending: Duration::ZERO,
            until_next: Duration::from_millis(timings.type_ms.max(1)),
        }
    }

    /// Currently visible prefix
    pub fn text(&self) -> &str {
        let Some(full) = self.texts.get(self.current) else {
            return "";
        };
        match full.char_indices().nth(self.shown) {
            Some((end, _)) => &full[..end],
            None => full,
        }
    }

    /// Feed elapsed time; runs as many steps as have come due
    pub fn advance(&mut self, dt: Duration) {
        if self.texts.is_empty() {
            return;
        }
        self.pending += dt;
        while self.pending >= self.until_next {
            self.pending -= self.until_next;
            self.until_next = self.step();
        }
    }

    /// One transition; returns the delay before the next one
    fn step(&mut self) -> Duration {
        let len = self.texts[self.current].chars().count();
        let t = self.timings;
        let delay = match self.phase {
            Phase::Typing if self.shown < len => {
                self.shown += 1;
                Duration::from_millis(t.type_ms)
            }
            Phase::Typing => {
                self.phase = Phase::Holding;
                Duration::from_millis(t.hold_ms)
            }
            Phase::Holding => {
                self.phase = Phase::Deleting;
                Duration::from_millis(t.delete_ms)
            }
            Phase::Deleting if self.shown > 0 => {
                self.shown -= 1;
                Duration::from_millis(t.delete_ms)
            }
            Phase::Deleting => {
                self.phase = Phase::Typing;
                self.current = (self.current + 1) % self.texts.len();
                Duration::from_millis(t.type_ms)
            }
        };
        // Zero delays would spin the advance loop forever
        delay.max(Duration::from_millis(1))
    }
}
