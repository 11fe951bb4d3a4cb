//! Low-level wrapper around the `op` executable
//!
//! [`Op`] turns subcommands into process invocations: it sets the device id
//! and session variables, appends the configured global flags, and returns
//! the raw stdout. [`OpExecutor`] is the seam the session manager is built on.

use log::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::flags::{Flag, Subcommand};
use crate::process::{self, Invocation};
use crate::session::Session;
use crate::util::shorthand_from_address;

/// Environment variable carrying the device id
pub const DEVICE_VARIABLE: &str = "OP_DEVICE";

/// Operations the session manager needs from the executable
pub trait OpExecutor: Send + Sync {
    /// Sign in and return a new session.
    ///
    /// `password` is called exactly once per attempt.
    fn signin(
        &self,
        sign_in_address: &str,
        email_address: &str,
        secret_key: &str,
        password: &dyn Fn() -> String,
    ) -> Result<Session>;

    /// Invalidate a session
    fn signout(&self, session: &Session) -> Result<()>;

    /// Run a subcommand, returning stdout
    fn execute(&self, session: Option<&Session>, arguments: &[Option<String>]) -> Result<String>;

    /// Version of the executable
    fn version(&self) -> Result<String>;
}

/// Runs the `op` executable configured by [`Config`]
#[derive(Debug, Clone, Default)]
pub struct Op {
    config: Config,
}

impl Op {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shorthand used for sessions created from this sign-in address
    pub fn shorthand_for(&self, sign_in_address: &str) -> Result<String> {
        if let Some(shorthand) = self.config.shorthand() {
            return Ok(shorthand.to_string());
        }

        shorthand_from_address(sign_in_address).ok_or_else(|| {
            Error::Config(format!(
                "cannot derive a shorthand from sign-in address \"{}\", configure one explicitly",
                sign_in_address
            ))
        })
    }

    fn invocation(&self, session: Option<&Session>, arguments: &[Option<String>]) -> Invocation {
        let mut invocation = Invocation::new(self.config.executable_path())
            .args(arguments.iter().cloned())
            .env(DEVICE_VARIABLE, self.config.device())
            .timeout(self.config.timeout());

        if let Some(session) = session {
            invocation = invocation.env(session.environment_variable_name(), session.token());
        }

        if self.config.cache() {
            invocation = invocation.arg(Flag::Cache.to_string());
        }

        if let Some(dir) = self.config.config_dir() {
            invocation = invocation.args([Flag::Config.is(Some(dir.to_string_lossy()))]);
        }

        invocation
    }
}

impl OpExecutor for Op {
    fn signin(
        &self,
        sign_in_address: &str,
        email_address: &str,
        secret_key: &str,
        password: &dyn Fn() -> String,
    ) -> Result<Session> {
        let shorthand = self.shorthand_for(sign_in_address)?;
        let arguments = [
            Some(Subcommand::Signin.to_string()),
            Some(sign_in_address.to_string()),
            Some(email_address.to_string()),
            Some(secret_key.to_string()),
            Some(Flag::Raw.to_string()),
            Flag::Shorthand.is(Some(&shorthand)),
        ];

        let invocation = self.invocation(None, &arguments).input(password());
        let output = process::run(&invocation)?;

        let token = output.stdout.trim();
        if token.is_empty() {
            return Err(Error::tool(
                "sign in did not return a session token",
                Some(output.exit_code),
            ));
        }

        info!("signed in to {} as {}", sign_in_address, email_address);
        Ok(Session::new(token, shorthand))
    }

    fn signout(&self, session: &Session) -> Result<()> {
        let arguments = [Some(Subcommand::Signout.to_string())];
        process::run(&self.invocation(Some(session), &arguments))?;
        info!("signed out of session {}", session.shorthand());
        Ok(())
    }

    fn execute(&self, session: Option<&Session>, arguments: &[Option<String>]) -> Result<String> {
        let output = process::run(&self.invocation(session, arguments))?;
        Ok(output.stdout)
    }

    fn version(&self) -> Result<String> {
        let arguments = [Some(Flag::Version.to_string())];
        let output = process::run(&self.invocation(None, &arguments))?;
        Ok(output.stdout.trim().to_string())
    }
}
