use std::fmt;

/// All errors produced by datecycle.
///
/// Every variant is a malformed-schedule bug on the caller's side (or, for
/// `Compute`, date arithmetic leaving jiff's representable range). The
/// calculator never retries internally and never returns a sentinel result
/// for a structurally valid schedule.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum InvalidScheduleError {
    /// The IANA timezone identifier did not resolve.
    Timezone { name: String, message: String },

    /// A cycle parameter is outside its declared domain.
    Field { message: String },

    /// Date arithmetic failed while searching for the next occurrence.
    Compute { message: String },
}

impl fmt::Display for InvalidScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timezone { name, message } => {
                write!(f, "invalid timezone '{name}': {message}")
            }
            Self::Field { message } => write!(f, "{message}"),
            Self::Compute { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for InvalidScheduleError {}

impl InvalidScheduleError {
    pub fn timezone(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timezone {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn field(message: impl Into<String>) -> Self {
        Self::Field {
            message: message.into(),
        }
    }

    pub fn compute(message: impl Into<String>) -> Self {
        Self::Compute {
            message: message.into(),
        }
    }
}
