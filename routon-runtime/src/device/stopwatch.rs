use std::time::{Duration, Instant};

use super::Stopwatch;

/// Stopwatch backed by the monotonic system clock.
pub struct SystemStopwatch {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl SystemStopwatch {
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }
}

impl Default for SystemStopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch for SystemStopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(at) = self.started_at.take() {
            self.accumulated += at.elapsed();
        }
    }

    fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn elapsed(&self) -> f32 {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |at| at.elapsed());

        (self.accumulated + running).as_secs_f32()
    }
}
