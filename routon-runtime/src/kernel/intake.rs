use crate::{
    core::Effector,
    device::{Actuator, Stopwatch},
    runtime::{Component, ComponentContext},
};

/// Spin the intake at an open-loop output for a fixed duration.
///
/// Same two modes as the arm: exclusive owns the step advance, concurrent
/// shares its index with a drivetrain step and only tracks its own
/// completion on the effector flag.
pub struct RunIntake {
    duration: f32,
    output: f32,
    step: usize,
    concurrent: bool,
}

impl RunIntake {
    pub fn new(duration: f32, output: f32, step: usize, concurrent: bool) -> Self {
        assert!(duration > 0.0, "duration must be positive");
        assert!(
            (-1.0..=1.0).contains(&output),
            "output must be within [-1, 1]"
        );
        assert!(step >= 1, "step index is 1-based");

        Self {
            duration,
            output,
            step,
            concurrent,
        }
    }

    fn tick_exclusive(&mut self, ctx: &mut ComponentContext) {
        if ctx.stopwatch.elapsed() <= self.duration {
            if ctx.stopwatch.elapsed() == 0.0 {
                ctx.stopwatch.start();
            }

            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!(
                    "Step {}: intake at {:.2} for {:.2}s",
                    self.step, self.output, self.duration
                );
            }

            ctx.intake.set_output(self.output);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.intake.set_output(0.0);
            ctx.stopwatch.stop();
            ctx.stopwatch.reset();

            info!("Step {}: intake complete", self.step);
        }
    }

    fn tick_concurrent(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_registered(self.step) {
            ctx.sequence.register(self.step);
            ctx.sequence.rearm_effector(Effector::Intake);

            info!(
                "Step {}: intake runs alongside at {:.2} for {:.2}s",
                self.step, self.output, self.duration
            );
        }

        if ctx.sequence.effector_finished(Effector::Intake) {
            return;
        }

        if ctx.stopwatch.elapsed() <= self.duration {
            if ctx.stopwatch.elapsed() == 0.0 {
                ctx.stopwatch.start();
            }

            ctx.intake.set_output(self.output);
        } else {
            ctx.sequence.finish_effector(Effector::Intake);
            ctx.intake.set_output(0.0);
            ctx.stopwatch.stop();
            ctx.stopwatch.reset();

            debug!("Step {}: intake portion complete", self.step);
        }
    }
}

impl Component for RunIntake {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        if self.concurrent {
            self.tick_concurrent(ctx);
        } else {
            self.tick_exclusive(ctx);
        }
    }
}
