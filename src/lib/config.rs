//! Configuration for invoking the `op` executable

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{executable_file_name, is_valid_device_id, random_base32, DEVICE_ID_LENGTH};

/// Default time a single invocation may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared by every invocation of the executable
#[derive(Debug, Clone)]
pub struct Config {
    executable: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    cache: bool,
    shorthand: Option<String>,
    device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: None,
            config_dir: None,
            timeout: Some(DEFAULT_TIMEOUT),
            cache: false,
            shorthand: None,
            device: random_base32(DEVICE_ID_LENGTH),
        }
    }
}

impl Config {
    /// Create a configuration with defaults and a freshly generated device id
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `OP_BINDING_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(executable) = env_var("OP_BINDING_EXECUTABLE") {
            config.executable = Some(PathBuf::from(executable));
        }
        if let Some(dir) = env_var("OP_BINDING_CONFIG_DIR") {
            config.config_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = env_var("OP_BINDING_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("OP_BINDING_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config.cache = env_var("OP_BINDING_CACHE").is_some_and(|v| v == "1" || v == "true");
        config.shorthand = env_var("OP_BINDING_SHORTHAND");
        if let Some(device) = env_var("OP_BINDING_DEVICE") {
            config.set_device(Some(&device))?;
        }

        Ok(config)
    }

    /// Use a specific executable instead of `op` from the `PATH`
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    /// Pass `--config=<dir>` to every invocation
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Limit the duration of each invocation; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pass `--cache` to every invocation
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Use an explicit account shorthand instead of deriving it from the sign-in address
    pub fn with_shorthand(mut self, shorthand: impl Into<String>) -> Self {
        self.shorthand = Some(shorthand.into());
        self
    }

    /// Use an explicit device id
    pub fn with_device(mut self, device: &str) -> Result<Self> {
        self.set_device(Some(device))?;
        Ok(self)
    }

    /// Set the device id. `None` generates a new random one.
    ///
    /// The id must be 26 characters from the alphabet `a-z2-7`.
    pub fn set_device(&mut self, device: Option<&str>) -> Result<()> {
        match device {
            Some(device) if is_valid_device_id(device) => {
                self.device = device.to_string();
                Ok(())
            }
            Some(device) => Err(Error::Config(format!(
                "device id must be {} characters of [a-z2-7], got \"{}\"",
                DEVICE_ID_LENGTH, device
            ))),
            None => {
                self.device = random_base32(DEVICE_ID_LENGTH);
                Ok(())
            }
        }
    }

    /// Explicitly configured executable, if any
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    /// Executable that will be started
    pub fn executable_path(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| PathBuf::from(executable_file_name()))
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cache(&self) -> bool {
        self.cache
    }

    pub fn shorthand(&self) -> Option<&str> {
        self.shorthand.as_deref()
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
