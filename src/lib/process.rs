//! Process runner for the `op` executable
//!
//! Starts the executable, feeds it input lines, collects stdout/stderr and
//! maps the outcome onto [`Result`]:
//! - exit codes 0 and 1 are not fatal by themselves, the tool uses 1 for many
//!   expected rejections
//! - any other exit code, or termination by a signal, is a tool error
//! - non-empty stderr (after removing informational banners) is a tool error,
//!   even with exit code 0
//! - exceeding the timeout kills the process and yields [`Error::Timeout`]

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};

/// Interval between checks for process completion
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exit codes that require inspecting the output instead of failing outright
pub const NON_FATAL_EXIT_CODES: [i32; 2] = [0, 1];

/// Informational banners the tool prints on stderr
const IGNORED_STDERR_PATTERNS: [&str; 1] =
    [r#"Using configuration at non-standard location ".+"\r?\n?"#];

/// A single invocation of an executable
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Executable to start
    pub executable: PathBuf,
    /// Arguments; `None` entries stand for omitted flags and are skipped
    pub arguments: Vec<Option<String>>,
    /// Additional environment variables
    pub environment: Vec<(String, String)>,
    /// Lines written to stdin, each followed by a newline
    pub input: Vec<String>,
    /// Maximum run time
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(Some(argument.into()));
        self
    }

    pub fn args<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.arguments.extend(arguments);
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((name.into(), value.into()));
        self
    }

    pub fn input(mut self, line: impl Into<String>) -> Self {
        self.input.push(line.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments with omitted flags removed
    pub fn effective_arguments(&self) -> Vec<&str> {
        self.arguments.iter().flatten().map(String::as_str).collect()
    }
}

/// Output of a finished invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    /// Stderr with informational banners removed
    pub stderr: String,
    pub exit_code: i32,
}

/// Run an invocation to completion
pub fn run(invocation: &Invocation) -> Result<ProcessOutput> {
    let executable = invocation.executable.to_string_lossy().to_string();
    let arguments = invocation.effective_arguments();

    // Arguments may carry secrets, only the first one is logged.
    debug!(
        "running {} {} ({} arguments)",
        executable,
        arguments.first().copied().unwrap_or_default(),
        arguments.len()
    );

    let mut command = Command::new(&invocation.executable);
    command
        .args(&arguments)
        .envs(invocation.environment.iter().map(|(k, v)| (k, v)))
        .stdin(if invocation.input.is_empty() {
            Stdio::null()
        } else {
            Stdio::piped()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        executable: executable.clone(),
        source,
    })?;

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    if let Some(mut stdin) = child.stdin.take() {
        for line in &invocation.input {
            if let Err(e) = writeln!(stdin, "{}", line) {
                // The process may exit before reading its input.
                debug!("could not write to stdin of {}: {}", executable, e);
                break;
            }
        }
    }

    let deadline = invocation.timeout.map(|timeout| Instant::now() + timeout);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                stop(&mut child);
                return Err(e.into());
            }
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            stop(&mut child);
            return Err(timed_out(invocation, executable));
        }

        thread::sleep(POLL_INTERVAL);
    };

    // Processes started in the background by the child may keep the pipes
    // open after it exits, so the readers are bounded by the same deadline.
    let (stdout, stderr) = match (
        receive(stdout_reader, deadline),
        receive(stderr_reader, deadline),
    ) {
        (Some(stdout), Some(stderr)) => (stdout, strip_ignored_stderr(&stderr)),
        _ => return Err(timed_out(invocation, executable)),
    };
    let exit_code = status.code();

    debug!("{} finished with exit code {:?}", executable, exit_code);

    if !stderr.is_empty() {
        return Err(Error::tool(stderr, exit_code));
    }

    match exit_code {
        Some(code) if NON_FATAL_EXIT_CODES.contains(&code) => Ok(ProcessOutput {
            stdout,
            stderr,
            exit_code: code,
        }),
        Some(code) => Err(Error::tool(
            format!("\"{}\" exited with code {}", executable, code),
            Some(code),
        )),
        None => Err(Error::tool(
            format!("\"{}\" was terminated by a signal", executable),
            None,
        )),
    }
}

/// Remove informational banners from stderr and trim the remainder
pub fn strip_ignored_stderr(stderr: &str) -> String {
    let mut result = stderr.to_string();
    for pattern in IGNORED_STDERR_PATTERNS {
        if let Ok(re) = regex::Regex::new(pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }
    result.trim().to_string()
}

/// Kill the child and reap it so no zombie is left behind
fn stop(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("could not kill process {}: {}", child.id(), e);
    }
    let _ = child.wait();
}

fn timed_out(invocation: &Invocation, executable: String) -> Error {
    Error::Timeout {
        executable,
        timeout: invocation.timeout.unwrap_or_default(),
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = sender.send(String::from_utf8_lossy(&buf).to_string());
    });
    receiver
}

/// Output collected by a reader, `None` if the deadline passed first
fn receive(reader: Option<Receiver<String>>, deadline: Option<Instant>) -> Option<String> {
    let Some(reader) = reader else {
        return Some(String::new());
    };
    match deadline {
        Some(deadline) => {
            match reader.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(output) => Some(output),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(String::new()),
            }
        }
        None => Some(reader.recv().unwrap_or_default()),
    }
}
