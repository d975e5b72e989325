pub trait Configurable: Clone {}

/// Machine configuration.
#[derive(Clone, Debug, serde_derive::Deserialize)]
pub struct MachineConfig {
    /// Machine instance identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Machine model name.
    pub model: String,
    /// Drive encoder counts per wheel revolution.
    pub counts_per_revolution: f32,
    /// Drive wheel circumference in inches.
    pub wheel_circumference: f32,
    /// Overshoot compensation gain, calibrated per drivetrain.
    #[serde(default = "default_overshoot_gain")]
    pub overshoot_gain: f32,
}

fn default_overshoot_gain() -> f32 {
    crate::kernel::DEFAULT_OVERSHOOT_GAIN
}

/// Simulation configuration.
#[derive(Clone, Debug, Default, serde_derive::Deserialize)]
pub struct SimulationConfig {
    /// Enable sensor jitter.
    #[serde(default)]
    pub jitter: bool,
}

/// Routine step action kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde_derive::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Halt,
    Sleep,
    Arm,
    Intake,
}

impl ActionKind {
    /// Whether the action drives the drivetrain over a distance.
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            ActionKind::Forward
                | ActionKind::Backward
                | ActionKind::TurnLeft
                | ActionKind::TurnRight
        )
    }
}

/// Single routine step.
///
/// Which parameters are required depends on the action kind; the routine
/// assembly rejects steps with missing or nonsense parameters.
#[derive(Clone, Debug, serde_derive::Deserialize)]
pub struct StepConfig {
    pub action: ActionKind,
    /// Distance in inches, for movement actions.
    pub distance: Option<f32>,
    /// Open-loop speed in (0, 1], for movement actions.
    pub speed: Option<f32>,
    /// Duration in seconds, for timed actions.
    pub duration: Option<f32>,
    /// Velocity setpoint, for the arm.
    pub velocity: Option<f32>,
    /// Open-loop output in [-1, 1], for the intake.
    pub output: Option<f32>,
    /// End-effector action running alongside this step.
    pub with: Option<EffectorStepConfig>,
}

/// End-effector action sharing the step index of its host step.
#[derive(Clone, Debug, serde_derive::Deserialize)]
pub struct EffectorStepConfig {
    pub action: ActionKind,
    pub duration: Option<f32>,
    pub velocity: Option<f32>,
    pub output: Option<f32>,
}

/// Routon configuration.
#[derive(Clone, Debug, serde_derive::Deserialize)]
pub struct Config {
    /// Machine configuration.
    pub machine: MachineConfig,
    /// Simulation configuration.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Ordered routine steps.
    #[serde(default)]
    pub step: Vec<StepConfig>,
}

impl Configurable for Config {}
