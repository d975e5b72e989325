use crate::device::Actuator;
use crate::runtime::{Component, ComponentContext};

/// Stop the drivetrain.
///
/// A one-cycle stop pulse: the first eligible cycle commands zero output
/// on both channels and registers, the next cycle advances and resets the
/// position counters. The step does not hold the machine; it marks the
/// boundary between two movements.
pub struct Halt {
    step: usize,
}

impl Halt {
    pub fn new(step: usize) -> Self {
        assert!(step >= 1, "step index is 1-based");

        Self { step }
    }
}

impl Component for Halt {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.sequence.is_eligible(self.step) || ctx.sequence.is_retired(self.step) {
            return;
        }

        if !ctx.sequence.is_registered(self.step) {
            ctx.sequence.register(self.step);
            ctx.drive_right.set_output(0.0);
            ctx.drive_left.set_output(0.0);

            info!("Step {}: halt drivetrain", self.step);
        } else {
            ctx.sequence.advance(self.step);
            ctx.drive_right.reset_position(0.0);
            ctx.drive_left.reset_position(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::testing;

    #[test]
    fn test_halt_is_a_one_cycle_pulse() {
        let mut bench = testing::bench(2);

        // Emulate a completed predecessor.
        bench.ctx.sequence.register(1);
        bench.ctx.sequence.advance(1);

        bench.drive_right.lock().unwrap().set_output(0.5);
        bench.ctx.drive_right.reset_position(42.0);

        let mut halt = Halt::new(2);

        halt.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_registered(2));
        assert!(!bench.ctx.sequence.is_retired(2));
        assert_eq!(bench.drive_right.lock().unwrap().output(), 0.0);
        // Counters are reset on advance, not on the pulse.
        assert_eq!(bench.ctx.drive_right.position(), 42.0);

        halt.tick(&mut bench.ctx);

        assert!(bench.ctx.sequence.is_retired(2));
        assert_eq!(bench.ctx.drive_right.position(), 0.0);
    }

    #[test]
    fn test_halt_waits_for_predecessor() {
        let mut bench = testing::bench(2);

        bench.drive_right.lock().unwrap().set_output(0.5);

        let mut halt = Halt::new(2);
        halt.tick(&mut bench.ctx);

        assert!(!bench.ctx.sequence.is_registered(2));
        assert_eq!(bench.drive_right.lock().unwrap().output(), 0.5);
    }
}
