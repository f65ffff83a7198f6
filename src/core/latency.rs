//! Injectable latency for the simulated collaborators.
//!
//! Collaborators ask a `Latency` how long to suspend instead of rolling
//! their own randomness, so tests can pin timing down.

use std::time::Duration;

use rand::Rng;

pub trait Latency: Send + Sync {
    /// Duration of the next simulated suspension.
    fn sample(&self) -> Duration;
}

/// Always the same delay.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub Duration);

impl Fixed {
    pub fn millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

impl Latency for Fixed {
    fn sample(&self) -> Duration {
        self.0
    }
}

/// `base` plus a uniform jitter in `[0, jitter]`.
#[derive(Debug, Clone, Copy)]
pub struct Jittered {
    pub base: Duration,
    pub jitter: Duration,
}

impl Jittered {
    pub fn millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter: Duration::from_millis(jitter_ms),
        }
    }
}

impl Latency for Jittered {
    fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.base + Duration::from_millis(extra)
    }
}
