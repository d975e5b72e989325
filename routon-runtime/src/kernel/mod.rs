use std::time::Instant;

use crate::{
    config::{ActionKind, Config, EffectorStepConfig, StepConfig},
    runtime::{Component, ComponentContext, Error, Result},
};

mod arm;
mod drive;
mod halt;
mod intake;
mod sleep;
mod turn;

pub use arm::MoveArm;
pub use drive::{DriveBackward, DriveForward};
pub use halt::Halt;
pub use intake::RunIntake;
pub use sleep::Sleep;
pub use turn::{TurnLeft, TurnRight};

/// Default overshoot compensation gain.
///
/// Commanded speed times this gain is subtracted from the requested
/// distance before conversion to encoder counts. Calibrated per
/// drivetrain; override through the machine configuration.
pub const DEFAULT_OVERSHOOT_GAIN: f32 = 15.0;

/// Drivetrain calibration.
///
/// Converts between physical distance and encoder counts, derived once at
/// construction from the encoder resolution and the wheel geometry.
#[derive(Clone, Copy, Debug)]
pub struct Calibration {
    counts_per_unit: f32,
    overshoot_gain: f32,
}

impl Calibration {
    pub fn new(counts_per_revolution: f32, wheel_circumference: f32, overshoot_gain: f32) -> Self {
        assert!(counts_per_revolution > 0.0, "encoder resolution must be positive");
        assert!(wheel_circumference > 0.0, "wheel circumference must be positive");

        Self {
            counts_per_unit: counts_per_revolution / wheel_circumference,
            overshoot_gain,
        }
    }

    /// Encoder counts per inch of travel.
    #[inline]
    pub fn counts_per_unit(&self) -> f32 {
        self.counts_per_unit
    }

    #[inline]
    pub fn overshoot_gain(&self) -> f32 {
        self.overshoot_gain
    }

    /// Encoder target for a distance at a commanded speed.
    ///
    /// Higher speeds overshoot further past the threshold before the next
    /// cycle observes it, so the compensation shortens the target.
    pub fn target_counts(&self, distance: f32, speed: f32) -> f32 {
        (distance - speed * self.overshoot_gain) * self.counts_per_unit
    }
}

/// Assembled routine: the ordered executor list of one autonomous period.
pub struct Routine {
    components: Vec<Box<dyn Component>>,
    steps: usize,
}

impl Routine {
    /// Number of steps in the routine.
    ///
    /// A step hosting a concurrent end-effector action counts once; size
    /// the sequencer with this.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Number of scheduled executors.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Poll every executor once, in routine order.
    pub fn tick(&mut self, ctx: &mut ComponentContext) {
        ctx.tick_devices();

        for (idx, component) in self.components.iter_mut().enumerate() {
            let component_tick_start = Instant::now();

            component.tick(ctx);

            if component_tick_start.elapsed() > crate::consts::COMPONENT_DELAY_THRESHOLD {
                warn!("Component {} is delaying execution", idx);
            }
        }

        ctx.post_tick();
    }

    /// Whether the last step of the routine has retired.
    pub fn is_complete(&self, ctx: &ComponentContext) -> bool {
        ctx.sequence.is_complete()
    }
}

/// Assemble a routine from configuration.
///
/// Steps receive 1-based indices in document order. A step with an inline
/// end-effector action yields two executors on the same index, the
/// effector scheduled first so it rearms its completion flag before the
/// host registers.
pub fn assemble(config: &Config) -> Result<Routine> {
    if config.step.is_empty() {
        return Err(Error::EmptyRoutine);
    }

    let mut components: Vec<Box<dyn Component>> = Vec::new();

    for (idx, step) in config.step.iter().enumerate() {
        let index = idx + 1;

        if let Some(effector) = &step.with {
            if !step.action.is_movement() {
                return Err(Error::InvalidStep {
                    step: index,
                    reason: "only movement steps can host a concurrent action".to_owned(),
                });
            }

            components.push(effector_component(effector, index)?);
        }

        components.push(step_component(config, step, index)?);
    }

    Ok(Routine {
        components,
        steps: config.step.len(),
    })
}

fn step_component(
    config: &Config,
    step: &StepConfig,
    index: usize,
) -> Result<Box<dyn Component>> {
    match step.action {
        ActionKind::Forward => {
            let (distance, speed) = movement_params(config, step, index)?;
            Ok(Box::new(DriveForward::new(distance, speed, index)))
        }
        ActionKind::Backward => {
            let (distance, speed) = movement_params(config, step, index)?;
            Ok(Box::new(DriveBackward::new(distance, speed, index)))
        }
        ActionKind::TurnLeft => {
            let (distance, speed) = movement_params(config, step, index)?;
            Ok(Box::new(TurnLeft::new(distance, speed, index)))
        }
        ActionKind::TurnRight => {
            let (distance, speed) = movement_params(config, step, index)?;
            Ok(Box::new(TurnRight::new(distance, speed, index)))
        }
        ActionKind::Halt => Ok(Box::new(Halt::new(index))),
        ActionKind::Sleep => {
            let duration = require(step.duration, "duration", index)?;
            positive(duration, "duration", index)?;
            Ok(Box::new(Sleep::new(duration, index)))
        }
        ActionKind::Arm => {
            let duration = require(step.duration, "duration", index)?;
            positive(duration, "duration", index)?;
            let velocity = require(step.velocity, "velocity", index)?;
            Ok(Box::new(MoveArm::new(duration, velocity, index, false)))
        }
        ActionKind::Intake => {
            let duration = require(step.duration, "duration", index)?;
            positive(duration, "duration", index)?;
            let output = require(step.output, "output", index)?;
            output_range(output, index)?;
            Ok(Box::new(RunIntake::new(duration, output, index, false)))
        }
    }
}

fn effector_component(effector: &EffectorStepConfig, index: usize) -> Result<Box<dyn Component>> {
    let duration = require(effector.duration, "duration", index)?;
    positive(duration, "duration", index)?;

    match effector.action {
        ActionKind::Arm => {
            let velocity = require(effector.velocity, "velocity", index)?;
            Ok(Box::new(MoveArm::new(duration, velocity, index, true)))
        }
        ActionKind::Intake => {
            let output = require(effector.output, "output", index)?;
            output_range(output, index)?;
            Ok(Box::new(RunIntake::new(duration, output, index, true)))
        }
        _ => Err(Error::InvalidStep {
            step: index,
            reason: "concurrent action must be an end effector".to_owned(),
        }),
    }
}

fn movement_params(config: &Config, step: &StepConfig, index: usize) -> Result<(f32, f32)> {
    let distance = require(step.distance, "distance", index)?;
    let speed = require(step.speed, "speed", index)?;

    positive(distance, "distance", index)?;

    if speed <= 0.0 || speed > 1.0 {
        return Err(Error::InvalidStep {
            step: index,
            reason: "speed must be within (0, 1]".to_owned(),
        });
    }

    // A distance inside the compensation window would never register a
    // crossing; the step would drive forever.
    if distance - speed * config.machine.overshoot_gain <= 0.0 {
        return Err(Error::InvalidStep {
            step: index,
            reason: "distance does not clear the overshoot compensation".to_owned(),
        });
    }

    Ok((distance, speed))
}

fn require(value: Option<f32>, name: &str, index: usize) -> Result<f32> {
    value.ok_or_else(|| Error::InvalidStep {
        step: index,
        reason: format!("missing parameter `{}`", name),
    })
}

fn positive(value: f32, name: &str, index: usize) -> Result<()> {
    if value <= 0.0 {
        return Err(Error::InvalidStep {
            step: index,
            reason: format!("parameter `{}` must be positive", name),
        });
    }

    Ok(())
}

fn output_range(value: f32, index: usize) -> Result<()> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(Error::InvalidStep {
            step: index,
            reason: "output must be within [-1, 1]".to_owned(),
        });
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    const ROUTINE: &str = r#"
        [machine]
        model = "testbed"
        counts_per_revolution = 360.0
        wheel_circumference = 18.85

        [[step]]
        action = "forward"
        distance = 24.0
        speed = 0.5

        [step.with]
        action = "arm"
        duration = 1.5
        velocity = 120.0

        [[step]]
        action = "halt"

        [[step]]
        action = "turn-right"
        distance = 12.0
        speed = 0.4
    "#;

    #[test]
    fn test_assemble_routine() {
        let config: Config = toml::from_str(ROUTINE).unwrap();
        let routine = assemble(&config).unwrap();

        assert_eq!(routine.step_count(), 3);
        // The concurrent arm action schedules its own executor.
        assert_eq!(routine.len(), 4);
    }

    #[test]
    fn test_machine_defaults() {
        let config: Config = toml::from_str(ROUTINE).unwrap();

        assert_eq!(config.machine.overshoot_gain, DEFAULT_OVERSHOOT_GAIN);
        assert!(!config.simulation.jitter);
    }

    #[test]
    fn test_empty_routine_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            model = "testbed"
            counts_per_revolution = 360.0
            wheel_circumference = 18.85
            "#,
        )
        .unwrap();

        assert!(matches!(assemble(&config), Err(Error::EmptyRoutine)));
    }

    #[test]
    fn test_distance_inside_compensation_window_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            model = "testbed"
            counts_per_revolution = 360.0
            wheel_circumference = 18.85

            [[step]]
            action = "forward"
            distance = 5.0
            speed = 0.5
            "#,
        )
        .unwrap();

        assert!(matches!(
            assemble(&config),
            Err(Error::InvalidStep { step: 1, .. })
        ));
    }

    #[test]
    fn test_halt_cannot_host_concurrent_action() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            model = "testbed"
            counts_per_revolution = 360.0
            wheel_circumference = 18.85

            [[step]]
            action = "halt"

            [step.with]
            action = "intake"
            duration = 1.0
            output = 0.5
            "#,
        )
        .unwrap();

        assert!(matches!(
            assemble(&config),
            Err(Error::InvalidStep { step: 1, .. })
        ));
    }

    #[test]
    fn test_missing_parameter_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            model = "testbed"
            counts_per_revolution = 360.0
            wheel_circumference = 18.85

            [[step]]
            action = "arm"
            duration = 1.0
            "#,
        )
        .unwrap();

        assert!(matches!(
            assemble(&config),
            Err(Error::InvalidStep { step: 1, .. })
        ));
    }

    #[test]
    fn test_calibration_target_counts() {
        let calibration = Calibration::new(360.0, 18.85, 15.0);

        let target = calibration.target_counts(24.0, 0.5);

        assert!((target - 16.5 * (360.0 / 18.85)).abs() < 0.001);
    }

    #[test]
    fn test_timed_routine_runs_to_completion() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            model = "testbed"
            counts_per_revolution = 360.0
            wheel_circumference = 18.85

            [[step]]
            action = "sleep"
            duration = 0.1

            [[step]]
            action = "halt"

            [[step]]
            action = "arm"
            duration = 0.2
            velocity = 80.0
            "#,
        )
        .unwrap();

        let mut routine = assemble(&config).unwrap();
        let mut bench = testing::bench(routine.step_count());

        let mut cycles = 0;
        while !routine.is_complete(&bench.ctx) {
            routine.tick(&mut bench.ctx);
            bench.clock.lock().unwrap().advance(0.05);

            cycles += 1;
            assert!(cycles < 100, "routine failed to complete");
        }

        assert!(bench.ctx.sequence.is_retired(1));
        assert!(bench.ctx.sequence.is_retired(2));
        assert!(bench.ctx.sequence.is_retired(3));
    }
}
