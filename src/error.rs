//! Error results that can occur working with clocks and timers
#![warn(missing_docs)]
#![warn(unsafe_code)]

use std::fmt::{Debug, Display, Formatter, Result};

/// An error that can occur when building or running a clock or timer
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Create a new Error with a given ErrorKind variant
    pub fn new(kind: ErrorKind) -> Error {
        Error { kind }
    }

    /// The kind of error that occurred
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Error {
        Error::new(ErrorKind::Config(e.to_string()))
    }
}

/// The kinds of errors that can occur when working with clocks and timers.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Generic error type
    Message(String),

    /// The clock is already running
    ClockAlreadyRunning,

    /// A tick length, interval or rate of zero was given
    ZeroInterval,

    /// A framerate that is not a finite, positive number
    InvalidFramerate(f64),

    /// A timer was started without calling `every` or `once`
    NoTimingSet,

    /// Loading or reading configuration failed
    Config(String),

    /// An instant would lie beyond what the platform clock can represent
    Overflow,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ErrorKind::Message(message) => write!(f, "An error occurred: {}", message),
            ErrorKind::ClockAlreadyRunning => {
                write!(f, "Clock is already running")
            }
            ErrorKind::ZeroInterval => write!(f, "Interval must be longer than zero"),
            ErrorKind::InvalidFramerate(fps) => {
                write!(f, "Invalid framerate {}, must be finite and positive", fps)
            }
            ErrorKind::NoTimingSet => write!(f, "No timing set, call every or once first"),
            ErrorKind::Config(message) => write!(f, "Configuration error: {}", message),
            ErrorKind::Overflow => write!(f, "Instant out of range"),
        }
    }
}

impl ErrorKind {
    /// Return a new generic ErrorKind::Message with a given string message.
    pub fn new(message: &str) -> ErrorKind {
        ErrorKind::Message(message.to_string())
    }
}
