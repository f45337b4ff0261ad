// SPDX-License-Identifier: MIT OR Apache-2.0
//! Execution specification types.

use std::path::PathBuf;

/// What to run: argument vector, optional environment override, optional
/// working directory.
///
/// The first element of `argv` is the program; the rest are its arguments.
/// The vector is taken as-is — no shell parsing or escaping happens at any
/// point.
#[derive(Debug, Clone)]
pub struct ExecSpec {
    /// Program and arguments. Must be non-empty.
    pub argv: Vec<String>,
    /// Optional environment override as `"KEY=VALUE"` entries.
    ///
    /// `None` inherits the caller's environment. `Some` **replaces** it
    /// entirely (never merges); in particular `Some(vec![])` gives the
    /// child a fully empty environment. Use
    /// [`ferry_env::current_env_strings`] as a starting point when an
    /// inherit-then-override behavior is wanted.
    pub envp: Option<Vec<String>>,
    /// Optional working directory for the child.
    pub cwd: Option<PathBuf>,
}

impl ExecSpec {
    /// Create a spec from an argument vector, inheriting the caller's
    /// environment and working directory.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            envp: None,
            cwd: None,
        }
    }

    /// Replace the child's entire environment with the given entries.
    #[must_use]
    pub fn with_env(mut self, envp: Vec<String>) -> Self {
        self.envp = Some(envp);
        self
    }

    /// Set the child's working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}
