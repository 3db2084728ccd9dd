//! Launching the wrapped program.
use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::logging::COMMAND_TARGET;

/// A program together with the exact arguments it will receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, passed element for element without shell quoting.
    pub args: Vec<String>,
}

impl Invocation {
    /// Bundle `program` with its arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Render the invocation as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

/// Runs an [`Invocation`] to completion.
#[cfg_attr(test, mockall::automock)]
pub trait Launcher {
    /// Run the program and wait for it.
    ///
    /// Returns the exit code, or `None` if the child was terminated by a
    /// signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    fn launch(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Launches programs as child processes sharing this process's standard
/// streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        tracing::info!(target: COMMAND_TARGET, "Running command: {invocation}");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        tracing::debug!("{} exited with {status}", invocation.program);
        Ok(status.code())
    }
}
