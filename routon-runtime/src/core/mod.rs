mod instance;

pub use instance::Instance;

/// End-effector identity.
///
/// Each end effector capable of running alongside a drivetrain step has its
/// own completion flag on the sequencer, keyed by this identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effector {
    Arm = 0,
    Intake = 1,
}

impl Effector {
    /// Number of known end effectors.
    pub const COUNT: usize = 2;
}

impl From<Effector> for usize {
    fn from(value: Effector) -> Self {
        value as usize
    }
}

impl std::fmt::Display for Effector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effector::Arm => write!(f, "arm"),
            Effector::Intake => write!(f, "intake"),
        }
    }
}
