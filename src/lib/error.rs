//! Error type for op-binding
//!
//! Every failure of the binding is reported through [`Error`]. Messages coming
//! from the `op` executable are kept verbatim so callers see the tool's own
//! explanation.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Error messages that indicate the session token is missing or expired.
///
/// Matched case-insensitively as substrings of the tool's error output.
pub const SESSION_EXPIRED_SIGNATURES: [&str; 3] = [
    "session expired",
    "sign in to create a new session",
    "you are not currently signed in",
];

/// Error messages the tool uses when no entity matches a lookup.
const NOT_FOUND_SIGNATURES: [&str; 1] = ["doesn't seem to be"];

/// Error messages the tool uses when a name matches several entities.
const AMBIGUOUS_SIGNATURES: [&str; 1] = ["more than one"];

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the binding
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, detected before any process is started
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The executable could not be started
    #[error("cannot run program \"{executable}\": {source}")]
    Spawn {
        executable: String,
        #[source]
        source: io::Error,
    },

    /// The executable did not finish in time and was terminated
    #[error("\"{executable}\" timed out after {}ms", timeout.as_millis())]
    Timeout {
        executable: String,
        timeout: Duration,
    },

    /// The executable reported an error on stderr or exited unexpectedly
    #[error("{message}")]
    Tool {
        message: String,
        exit_code: Option<i32>,
    },

    /// A lookup matched no entity
    #[error("{0}")]
    NotFound(String),

    /// A lookup by name matched more than one entity
    #[error("{0}")]
    Ambiguous(String),

    /// The tool returned JSON that does not match the expected shape
    #[error("{message}\nJson:\n{json}")]
    Deserialize { message: String, json: String },

    /// Serialization of a value failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading from or writing to the child process failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a tool error from the executable's message
    pub fn tool(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Error::Tool {
            message: message.into(),
            exit_code,
        }
    }

    /// Whether this error means the session must be renewed by signing in again
    pub fn is_session_expired(&self) -> bool {
        match self {
            Error::Tool { message, .. } => contains_any(message, &SESSION_EXPIRED_SIGNATURES),
            _ => false,
        }
    }

    /// Whether this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Whether this error means a name matched several entities
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Error::Ambiguous(_))
    }

    /// Reclassify a tool error as [`Error::NotFound`] or [`Error::Ambiguous`]
    /// when its message carries one of the lookup signatures.
    pub fn classify_lookup(self) -> Self {
        match self {
            Error::Tool { message, .. } if contains_any(&message, &AMBIGUOUS_SIGNATURES) => {
                Error::Ambiguous(message)
            }
            Error::Tool { message, .. } if contains_any(&message, &NOT_FOUND_SIGNATURES) => {
                Error::NotFound(message)
            }
            other => other,
        }
    }
}

fn contains_any(message: &str, signatures: &[&str]) -> bool {
    let message = message.to_lowercase();
    signatures.iter().any(|signature| message.contains(signature))
}
