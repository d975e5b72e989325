use std::{error, fmt};

#[derive(Debug)]
pub enum Error {
    /// Configuration file could not be read.
    Io(std::io::Error),
    /// Configuration document could not be parsed.
    Parse(toml::de::Error),
    /// Routine holds no steps.
    EmptyRoutine,
    /// Routine step carries invalid parameters.
    InvalidStep { step: usize, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "{}", e),
            Error::EmptyRoutine => write!(f, "routine holds no steps"),
            Error::InvalidStep { step, reason } => {
                write!(f, "invalid step {}: {}", step, reason)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}
