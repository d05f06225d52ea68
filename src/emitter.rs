use ::rand::Rng;

use crate::config::{Span, MAX_SPAWNS_PER_ADVANCE, MIN_SPAWN_INTERVAL_MS};

/// Randomized-interval spawner. Time only moves when `advance` is called, so
/// the schedule is reproducible under a seeded RNG.
#[derive(Clone, Debug)]
pub struct Emitter {
    window: Span,
    due_in_ms: f32,
    last_interval_ms: Option<f32>,
    fired: u64,
    stopped: bool,
}

impl Emitter {
    /// The first spawn falls due after `start_delay_ms`, later ones after an
    /// interval drawn from `window`.
    pub fn new(window: Span, start_delay_ms: f32) -> Self {
        Self {
            window,
            due_in_ms: start_delay_ms.max(0.0),
            last_interval_ms: None,
            fired: 0,
            stopped: false,
        }
    }

    /// Move the clock forward and return how many spawns fell due, at most
    /// `MAX_SPAWNS_PER_ADVANCE`. Any backlog past the cap is dropped.
    pub fn advance(&mut self, elapsed_ms: f32, rng: &mut impl Rng) -> u32 {
        if self.stopped {
            return 0;
        }
        self.due_in_ms -= elapsed_ms;
        let mut due = 0;
        while self.due_in_ms <= 0.0 {
            due += 1;
            let interval = self.next_interval(rng).max(MIN_SPAWN_INTERVAL_MS);
            if due == MAX_SPAWNS_PER_ADVANCE {
                self.due_in_ms = interval;
                break;
            }
            self.due_in_ms += interval;
        }
        self.fired += u64::from(due);
        due
    }

    pub fn next_interval(&mut self, rng: &mut impl Rng) -> f32 {
        let interval = self.window.sample(rng);
        self.last_interval_ms = Some(interval);
        interval
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn last_interval_ms(&self) -> Option<f32> {
        self.last_interval_ms
    }
}
