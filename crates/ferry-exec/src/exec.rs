// SPDX-License-Identifier: MIT OR Apache-2.0
//! Child-process launch, output dispatch, and wait-for-exit.

use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::error::ExecError;
use crate::sink::{NullSink, StreamSink};
use crate::spec::ExecSpec;

/// Run a program with default discarding sinks on both output streams.
///
/// The child inherits the caller's environment. Its output is consumed and
/// thrown away, which keeps the child from blocking on a full pipe buffer.
/// Returns the exit code; a nonzero code is a result, not an error.
pub async fn exec<I, S>(argv: I) -> Result<i32, ExecError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    exec_with_sinks(argv, NullSink, NullSink).await
}

/// Run a program with caller-supplied sinks for stdout and stderr,
/// inheriting the caller's environment.
pub async fn exec_with_sinks<I, S>(
    argv: I,
    out_sink: impl StreamSink,
    err_sink: impl StreamSink,
) -> Result<i32, ExecError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    exec_spec(
        ExecSpec::new(argv),
        Some(Box::new(out_sink)),
        Some(Box::new(err_sink)),
    )
    .await
}

/// Run a program described by an [`ExecSpec`], dispatching its stdout and
/// stderr to the given sinks, and block until it exits.
///
/// Both sinks are attached before the wait begins. Passing `None` for a
/// sink leaves that pipe unread — the child may then stall on buffer
/// backpressure, at the caller's own risk; use [`NullSink`] when the output
/// is simply unwanted.
///
/// The wait swallows spurious interruptions and retries; only a true child
/// exit produces a result. There is no cancellation path here — see
/// [`exec_cancellable`] for the explicit opt-in.
pub async fn exec_spec(
    spec: ExecSpec,
    out_sink: Option<Box<dyn StreamSink>>,
    err_sink: Option<Box<dyn StreamSink>>,
) -> Result<i32, ExecError> {
    let mut child = launch(&spec, out_sink, err_sink)?;
    wait_for_exit(&mut child).await
}

/// Like [`exec_spec`], but the wait can be aborted through `cancel`.
///
/// On cancellation the child is killed and reaped, and
/// [`ExecError::Cancelled`] is returned. A token cancelled before the call
/// still launches nothing: it is checked first.
pub async fn exec_cancellable(
    spec: ExecSpec,
    out_sink: Option<Box<dyn StreamSink>>,
    err_sink: Option<Box<dyn StreamSink>>,
    cancel: &CancelToken,
) -> Result<i32, ExecError> {
    if cancel.is_cancelled() {
        return Err(ExecError::Cancelled);
    }

    let mut child = launch(&spec, out_sink, err_sink)?;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(target: "ferry_exec", "cancelled, killing child");
                let _ = child.kill().await;
                return Err(ExecError::Cancelled);
            }
            result = child.wait() => match result {
                Ok(status) => return Ok(exit_code(status)),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(ExecError::Wait(err)),
            },
        }
    }
}

/// Spawn the child and attach the sinks, in that order; a spawn failure is
/// reported before any sink is touched.
fn launch(
    spec: &ExecSpec,
    out_sink: Option<Box<dyn StreamSink>>,
    err_sink: Option<Box<dyn StreamSink>>,
) -> Result<Child, ExecError> {
    let (program, args) = spec.argv.split_first().ok_or(ExecError::EmptyArgv)?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(envp) = &spec.envp {
        // A full replacement, never a merge. An empty list means an empty
        // child environment.
        cmd.env_clear();
        for entry in envp {
            let (key, value) = ferry_env::split_entry(entry)
                .ok_or_else(|| ExecError::InvalidEnvEntry(entry.clone()))?;
            cmd.env(key, value);
        }
    }

    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }

    let mut child = cmd.spawn().map_err(ExecError::Launch)?;
    debug!(target: "ferry_exec", program = %program, pid = ?child.id(), "launched child");

    if let Some(sink) = out_sink
        && let Some(stdout) = child.stdout.take()
    {
        attach(sink, Box::new(stdout), "stdout");
    }
    if let Some(sink) = err_sink
        && let Some(stderr) = child.stderr.take()
    {
        attach(sink, Box::new(stderr), "stderr");
    }

    Ok(child)
}

/// Start a sink's drain task. Drain failures have no synchronous channel
/// back to the caller; they are logged and dropped here.
fn attach(sink: Box<dyn StreamSink>, stream: crate::sink::ByteStream, label: &'static str) {
    tokio::spawn(async move {
        if let Err(err) = sink.consume(stream).await {
            warn!(target: "ferry_exec", stream = label, "output drain failed: {err}");
        }
    });
}

/// Block until the child exits, retrying a spuriously interrupted wait.
async fn wait_for_exit(child: &mut Child) -> Result<i32, ExecError> {
    loop {
        match child.wait().await {
            Ok(status) => {
                let code = exit_code(status);
                debug!(target: "ferry_exec", code, "child exited");
                return Ok(code);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(ExecError::Wait(err)),
        }
    }
}

/// Map an [`std::process::ExitStatus`] to the integer the caller sees.
///
/// Normal exits report their code. On Unix a signal death maps to
/// `128 + signal`, the shell convention. Anything else (no code, no
/// signal) collapses to `-1`.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(-1)
}
