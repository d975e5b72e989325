use crate::device::Stopwatch;
use crate::runtime::{Component, ComponentContext};

/// Hold the routine for a fixed duration.
///
/// The stopwatch is started on the first cycle it reads exactly zero,
/// which guards against restarting one already running. On completion the
/// stopwatch is stopped and reset so the next timed step starts from
/// zero.
pub struct Sleep {
    duration: f32,
    step: usize,
}

impl Sleep {
    pub fn new(duration: f32, step: usize) -> Self {
        assert!(duration > 0.0, "duration must be positive");
        assert!(step >= 1, "step index is 1-based");

        Self { duration, step }
    }
}

impl Component for Sleep {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        if ctx.stopwatch.elapsed() <= self.duration {
            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!("Step {}: sleep {:.2}s", self.step, self.duration);
            }

            if ctx.stopwatch.elapsed() == 0.0 {
                ctx.stopwatch.start();
            }
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.stopwatch.stop();
            ctx.stopwatch.reset();

            info!("Step {}: sleep complete", self.step);
        }
    }
}
