use crate::device::Actuator;
use crate::runtime::{Component, ComponentContext};

/// Drive both tracks straight forward over a fixed distance.
///
/// Progress is measured on the right channel. Once the compensated target
/// count is crossed the step advances and both position counters reset to
/// zero, so the next step measures from a clean origin. The outputs are
/// left as commanded; only a halt step drops them to zero.
pub struct DriveForward {
    distance: f32,
    speed: f32,
    step: usize,
}

impl DriveForward {
    pub fn new(distance: f32, speed: f32, step: usize) -> Self {
        assert!(distance > 0.0, "distance must be positive");
        assert!(speed > 0.0 && speed <= 1.0, "speed must be within (0, 1]");
        assert!(step >= 1, "step index is 1-based");

        Self {
            distance,
            speed,
            step,
        }
    }
}

impl Component for DriveForward {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        let target = ctx.calibration.target_counts(self.distance, self.speed);

        if ctx.drive_right.position() <= target {
            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!(
                    "Step {}: drive forward {:.1}in at {:.2}",
                    self.step, self.distance, self.speed
                );
            }

            // The right channel runs mirrored on this drivetrain.
            ctx.drive_right.set_output(-self.speed);
            ctx.drive_left.set_output(self.speed);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.drive_right.reset_position(0.0);
            ctx.drive_left.reset_position(0.0);

            info!("Step {}: drive forward complete", self.step);
        }
    }
}

/// Drive both tracks straight backward over a fixed distance.
///
/// Same shape as the forward step with the output signs flipped; progress
/// is the negated right channel count.
pub struct DriveBackward {
    distance: f32,
    speed: f32,
    step: usize,
}

impl DriveBackward {
    pub fn new(distance: f32, speed: f32, step: usize) -> Self {
        assert!(distance > 0.0, "distance must be positive");
        assert!(speed > 0.0 && speed <= 1.0, "speed must be within (0, 1]");
        assert!(step >= 1, "step index is 1-based");

        Self {
            distance,
            speed,
            step,
        }
    }
}

impl Component for DriveBackward {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        let target = ctx.calibration.target_counts(self.distance, self.speed);

        if -ctx.drive_right.position() <= target {
            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!(
                    "Step {}: drive backward {:.1}in at {:.2}",
                    self.step, self.distance, self.speed
                );
            }

            ctx.drive_right.set_output(self.speed);
            ctx.drive_left.set_output(-self.speed);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.drive_right.reset_position(0.0);
            ctx.drive_left.reset_position(0.0);

            info!("Step {}: drive backward complete", self.step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::testing;

    #[test]
    fn test_forward_commands_and_advances() {
        let mut bench = testing::bench(1);
        let mut forward = DriveForward::new(24.0, 0.5, 1);

        forward.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_registered(1));
        assert_eq!(bench.drive_right.lock().unwrap().output(), -0.5);
        assert_eq!(bench.drive_left.lock().unwrap().output(), 0.5);

        // Cross the compensated threshold: (24 - 0.5 * 15) * CPI.
        let target = bench.ctx.calibration.target_counts(24.0, 0.5);
        bench.ctx.drive_right.reset_position(target + 1.0);

        forward.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_retired(1));
        assert_eq!(bench.ctx.drive_right.position(), 0.0);
        assert_eq!(bench.ctx.drive_left.position(), 0.0);
        // Drive steps leave the outputs as commanded.
        assert_eq!(bench.drive_right.lock().unwrap().output(), -0.5);
    }

    #[test]
    fn test_forward_resets_counters_once() {
        let mut bench = testing::bench(1);
        let mut forward = DriveForward::new(24.0, 0.5, 1);

        forward.tick(&mut bench.ctx);

        let target = bench.ctx.calibration.target_counts(24.0, 0.5);
        bench.ctx.drive_right.reset_position(target + 1.0);
        forward.tick(&mut bench.ctx);

        // A retired step never touches the counters again.
        bench.ctx.drive_right.reset_position(55.0);
        forward.tick(&mut bench.ctx);

        assert_eq!(bench.ctx.drive_right.position(), 55.0);
    }

    #[test]
    fn test_forward_waits_for_predecessor() {
        let mut bench = testing::bench(2);
        let mut forward = DriveForward::new(24.0, 0.5, 2);

        forward.tick(&mut bench.ctx);

        assert!(!bench.ctx.sequence.is_registered(2));
        assert_eq!(bench.drive_right.lock().unwrap().output(), 0.0);
    }

    #[test]
    fn test_backward_commands_and_advances() {
        let mut bench = testing::bench(1);
        let mut backward = DriveBackward::new(18.0, 0.5, 1);

        backward.tick(&mut bench.ctx);

        assert_eq!(bench.drive_right.lock().unwrap().output(), 0.5);
        assert_eq!(bench.drive_left.lock().unwrap().output(), -0.5);

        let target = bench.ctx.calibration.target_counts(18.0, 0.5);
        bench.ctx.drive_right.reset_position(-(target + 1.0));

        backward.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_retired(1));
        assert_eq!(bench.ctx.drive_right.position(), 0.0);
    }
}
