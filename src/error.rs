use crate::body::BodyId;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A spawn or configuration value outside its valid range.
    InvalidParameter { name: &'static str, value: f64 },
    /// A request named a body that is no longer live.
    UnknownBody(BodyId),
    Io(std::io::Error),
    Config(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter { name, value } => {
                write!(f, "invalid parameter `{}`: {}", name, value)
            }
            Error::UnknownBody(id) => write!(f, "no live body with id {}", id),
            Error::Io(e) => write!(f, "failed to read configuration: {}", e),
            Error::Config(e) => write!(f, "failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
