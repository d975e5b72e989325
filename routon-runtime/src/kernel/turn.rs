use crate::device::Actuator;
use crate::runtime::{Component, ComponentContext};

/// Pivot the machine to the left over a fixed arc distance.
///
/// Both channels are driven with positive output; on this drivetrain that
/// runs the right side forward and the left side backward. Progress is
/// measured on the right channel.
pub struct TurnLeft {
    distance: f32,
    speed: f32,
    step: usize,
}

impl TurnLeft {
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

impl Component for TurnLeft {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        let target = ctx.calibration.target_counts(self.distance, self.speed);

        if ctx.drive_right.position() <= target {
            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!(
                    "Step {}: turn left {:.1}in at {:.2}",
                    self.step, self.distance, self.speed
                );
            }

            ctx.drive_right.set_output(self.speed);
            ctx.drive_left.set_output(self.speed);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.drive_right.reset_position(0.0);
            ctx.drive_left.reset_position(0.0);

            info!("Step {}: turn left complete", self.step);
        }
    }
}

/// Pivot the machine to the right over a fixed arc distance.
///
/// Both channels are driven with negative output, the mirror of the left
/// turn. Progress is measured on the left channel.
pub struct TurnRight {
    distance: f32,
    speed: f32,
    step: usize,
}

impl TurnRight {
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

impl Component for TurnRight {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        let target = ctx.calibration.target_counts(self.distance, self.speed);

        if ctx.drive_left.position() <= target {
            if !ctx.sequence.is_registered(self.step) {
                ctx.sequence.register(self.step);
                info!(
                    "Step {}: turn right {:.1}in at {:.2}",
                    self.step, self.distance, self.speed
                );
            }

            ctx.drive_right.set_output(-self.speed);
            ctx.drive_left.set_output(-self.speed);
        } else if ctx.sequence.is_registered(self.step) {
            ctx.sequence.advance(self.step);
            ctx.drive_right.reset_position(0.0);
            ctx.drive_left.reset_position(0.0);

            info!("Step {}: turn right complete", self.step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::testing;

    #[test]
    fn test_turn_left_commands_and_advances() {
        let mut bench = testing::bench(1);
        let mut turn = TurnLeft::new(12.0, 0.4, 1);

        turn.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_registered(1));
        assert_eq!(bench.drive_right.lock().unwrap().output(), 0.4);
        assert_eq!(bench.drive_left.lock().unwrap().output(), 0.4);

        let target = bench.ctx.calibration.target_counts(12.0, 0.4);
        bench.ctx.drive_right.reset_position(target + 1.0);

        turn.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_retired(1));
        assert_eq!(bench.ctx.drive_right.position(), 0.0);
        assert_eq!(bench.ctx.drive_left.position(), 0.0);
    }

    #[test]
    fn test_turn_right_measures_left_channel() {
        let mut bench = testing::bench(1);
        let mut turn = TurnRight::new(12.0, 0.4, 1);

        turn.tick(&mut bench.ctx);

        assert_eq!(bench.drive_right.lock().unwrap().output(), -0.4);
        assert_eq!(bench.drive_left.lock().unwrap().output(), -0.4);

        let target = bench.ctx.calibration.target_counts(12.0, 0.4);

        // Right channel past the target has no effect; the left channel
        // is the measured one.
        bench.ctx.drive_right.reset_position(target + 1.0);
        turn.tick(&mut bench.ctx);
        assert!(!bench.ctx.sequence.is_retired(1));

        bench.ctx.drive_left.reset_position(target + 1.0);
        turn.tick(&mut bench.ctx);
        assert!(bench.ctx.sequence.is_retired(1));
    }
}
