// Shared helpers for integration tests.
//
// Provides a launcher that records invocations instead of spawning processes
// and a shorthand for building parameter maps.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io;
use std::sync::Mutex;

use drone_plugin_helper::env::Vars;
use drone_plugin_helper::exec::{Invocation, Launcher};

/// Build a [`Vars`] map from display-form keys.
pub fn vars(entries: &[(&str, &str)]) -> Vars {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// A [`Launcher`] that remembers every invocation and reports a fixed exit
/// code.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    code: i32,
    seen: Mutex<Vec<Invocation>>,
}

impl RecordingLauncher {
    /// A launcher whose programs all exit with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self {
            code,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Invocations launched so far, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Launcher for &RecordingLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(invocation.clone());
        Ok(Some(self.code))
    }
}
