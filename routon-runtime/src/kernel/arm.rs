use crate::{
    core::Effector,
    device::{Actuator, Stopwatch},
    runtime::{Component, ComponentContext},
};

/// Run the arm at a velocity setpoint for a fixed duration.
///
/// In exclusive mode the step owns its advance, exactly like a sleep step
/// that also drives the actuator. In concurrent mode the step index is
/// shared with a drivetrain step; the arm tracks its own completion on
/// the sequencer's effector flag and leaves the advance to its partner.
pub struct MoveArm {
    duration: f32,
    velocity: f32,
    step: usize,
    concurrent: bool,
}

impl MoveArm {
    pub fn new(duration: f32, velocity: f32, step: usize, concurrent: bool) -> Self {
        assert!(duration > 0.0, "duration must be positive");
        assert!(step >= 1, "step index is 1-based");

        Self {
            duration,
            velocity,
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
                    "Step {}: arm at velocity {:.1} for {:.2}s",
                    self.step, self.velocity, self.duration
                );
            }

            ctx.arm.set_velocity(self.velocity);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.arm.set_velocity(0.0);
            ctx.stopwatch.stop();
            ctx.stopwatch.reset();

            info!("Step {}: arm complete", self.step);
        }
    }

    fn tick_concurrent(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_registered(self.step) {
            ctx.sequence.register(self.step);
            // The flag may be left over from an earlier run on the same
            // index.
            ctx.sequence.rearm_effector(Effector::Arm);

            info!(
                "Step {}: arm runs alongside at velocity {:.1} for {:.2}s",
                self.step, self.velocity, self.duration
            );
        }

        if ctx.sequence.effector_finished(Effector::Arm) {
            return;
        }

        if ctx.stopwatch.elapsed() <= self.duration {
            if ctx.stopwatch.elapsed() == 0.0 {
                ctx.stopwatch.start();
            }

            ctx.arm.set_velocity(self.velocity);
        } else {
            // The partner movement owns the step advance.
            ctx.sequence.finish_effector(Effector::Arm);
            ctx.arm.set_velocity(0.0);
            ctx.stopwatch.stop();
            ctx.stopwatch.reset();

            debug!("Step {}: arm portion complete", self.step);
        }
    }
}

impl Component for MoveArm {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{testing, DriveForward};

    #[test]
    fn test_exclusive_arm_owns_its_step() {
        let mut bench = testing::bench(1);
        let mut arm = MoveArm::new(1.5, 120.0, 1, false);

        arm.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_registered(1));
        assert!(bench.clock.lock().unwrap().is_running());
        assert_eq!(bench.arm.lock().unwrap().velocity(), 120.0);

        bench.clock.lock().unwrap().advance(1.6);
        arm.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_retired(1));
        assert_eq!(bench.arm.lock().unwrap().velocity(), 0.0);
        assert_eq!(bench.ctx.stopwatch.elapsed(), 0.0);
    }

    #[test]
    fn test_concurrent_arm_finishes_before_partner() {
        let mut bench = testing::bench(1);

        // Arm scheduled ahead of its partner, both on step 1.
        let mut arm = MoveArm::new(1.5, 120.0, 1, true);
        let mut drive = DriveForward::new(24.0, 0.5, 1);

        let target = bench.ctx.calibration.target_counts(24.0, 0.5);

        // Quarter-second cycles; the drivetrain crosses its threshold at
        // the 2.0s mark, well after the arm duration.
        let mut arm_finished_at = None;
        for cycle in 0..9 {
            if cycle == 8 {
                bench.ctx.drive_right.reset_position(target + 1.0);
            }

            arm.tick(&mut bench.ctx);
            drive.tick(&mut bench.ctx);

            if arm_finished_at.is_none() && bench.ctx.sequence.effector_finished(Effector::Arm) {
                arm_finished_at = Some(cycle);
                // The step itself is still running.
                assert!(!bench.ctx.sequence.is_retired(1));
                assert_eq!(bench.arm.lock().unwrap().velocity(), 0.0);
            }

            bench.clock.lock().unwrap().advance(0.25);
        }

        assert!(arm_finished_at.is_some());
        assert!(bench.ctx.sequence.is_retired(1));
    }

    #[test]
    fn test_concurrent_arm_rearms_flag_on_registration() {
        let mut bench = testing::bench(1);

        bench.ctx.sequence.finish_effector(Effector::Arm);

        let mut arm = MoveArm::new(1.0, 80.0, 1, true);
        arm.tick(&mut bench.ctx);

        // Stale flag from an earlier run is cleared and the arm runs.
        assert_eq!(bench.arm.lock().unwrap().velocity(), 80.0);
        assert!(!bench.ctx.sequence.effector_finished(Effector::Arm));
    }
}
