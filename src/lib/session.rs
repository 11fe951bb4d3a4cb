//! Session data for authenticating with the `op` executable

use std::fmt;

/// Prefix of the environment variable carrying the session token
pub const SESSION_VARIABLE_PREFIX: &str = "OP_SESSION";

/// Session token returned by sign-in, together with the account shorthand.
///
/// A session is immutable. Renewing it means signing in again, which yields
/// a new `Session`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    shorthand: String,
}

impl Session {
    /// Wrap a token obtained from a successful sign-in
    pub fn new(token: impl Into<String>, shorthand: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            shorthand: shorthand.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn shorthand(&self) -> &str {
        &self.shorthand
    }

    /// Name of the environment variable the executable reads the token from
    pub fn environment_variable_name(&self) -> String {
        format!("{}_{}", SESSION_VARIABLE_PREFIX, self.shorthand)
    }
}

// Keeps the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("shorthand", &self.shorthand)
            .finish()
    }
}
