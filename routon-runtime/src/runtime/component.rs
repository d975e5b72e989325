use crate::{
    device::{Actuator, Stopwatch},
    kernel::Calibration,
};

use super::Sequencer;

/// Component context.
///
/// The component context is provided to each executor on each tick. It
/// owns the sequencer, the actuator handles, the shared stopwatch and the
/// drivetrain calibration; executors own nothing but their step
/// parameters.
pub struct ComponentContext {
    /// Routine completion state.
    pub sequence: Sequencer,
    /// Drivetrain calibration.
    pub calibration: Calibration,
    /// Left drivetrain channel.
    pub drive_left: Box<dyn Actuator>,
    /// Right drivetrain channel.
    pub drive_right: Box<dyn Actuator>,
    /// Arm end-effector channel.
    pub arm: Box<dyn Actuator>,
    /// Intake end-effector channel.
    pub intake: Box<dyn Actuator>,
    /// Shared stopwatch for timed steps.
    pub stopwatch: Box<dyn Stopwatch>,
    /// Last tick.
    last_tick: std::time::Instant,
    /// Iteration count.
    iteration: u64,
}

impl ComponentContext {
    pub fn new(
        drive_left: Box<dyn Actuator>,
        drive_right: Box<dyn Actuator>,
        arm: Box<dyn Actuator>,
        intake: Box<dyn Actuator>,
        stopwatch: Box<dyn Stopwatch>,
        calibration: Calibration,
        step_count: usize,
    ) -> Self {
        Self {
            sequence: Sequencer::new(step_count),
            calibration,
            drive_left,
            drive_right,
            arm,
            intake,
            stopwatch,
            last_tick: std::time::Instant::now(),
            iteration: 0,
        }
    }

    /// Retrieve the tick delta.
    pub fn delta(&self) -> std::time::Duration {
        self.last_tick.elapsed()
    }

    /// Retrieve the iteration count.
    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Refresh every device for the coming tick.
    pub(crate) fn tick_devices(&mut self) {
        let dt = self.delta().as_secs_f32();

        self.drive_left.update(dt);
        self.drive_right.update(dt);
        self.arm.update(dt);
        self.intake.update(dt);
    }

    /// Called after all components are ticked.
    pub(crate) fn post_tick(&mut self) {
        self.last_tick = std::time::Instant::now();
        self.iteration += 1;
    }

    /// Command zero output on every channel.
    pub fn stop_all(&mut self) {
        self.drive_left.set_output(0.0);
        self.drive_right.set_output(0.0);
        self.arm.set_output(0.0);
        self.intake.set_output(0.0);
    }
}

/// Routine step executor.
pub trait Component: Send {
    /// Tick the component.
    ///
    /// This method is called on each tick of the runtime. How often the
    /// runtime ticks is determined by the cycle interval.
    fn tick(&mut self, ctx: &mut ComponentContext);
}
