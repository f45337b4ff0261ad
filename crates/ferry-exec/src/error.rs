// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for child-process execution.

use thiserror::Error;

/// Errors from launching and waiting on a child process.
///
/// A nonzero exit status is not an error; it is returned as an ordinary
/// value for the caller to interpret. Read failures inside a stream sink
/// never surface here either — the drain task logs and swallows them.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The argument vector was empty; there is no program to run.
    #[error("empty argument vector")]
    EmptyArgv,

    /// An environment override entry had no `=` separator.
    #[error("malformed environment entry (expected KEY=VALUE): {0:?}")]
    InvalidEnvEntry(String),

    /// The child process could not be created. Raised before any sink is
    /// attached.
    #[error("failed to launch child process: {0}")]
    Launch(#[source] std::io::Error),

    /// Waiting for the child failed with something other than a spurious
    /// interruption (those are retried, never surfaced).
    #[error("failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    /// The invocation was cancelled via its [`CancelToken`](crate::CancelToken)
    /// and the child was killed.
    #[error("execution cancelled")]
    Cancelled,
}
