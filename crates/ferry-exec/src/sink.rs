// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stream sinks: asynchronous consumers for a child's output streams.
//!
//! A sink's whole contract is "this stream will not back up". Each sink is
//! bound to exactly one stream of one invocation and consumed on its own
//! task, started before the launcher begins waiting for the child.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

/// A child output stream as handed to a sink.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Asynchronous consumer for one child output stream.
///
/// `consume` runs on a spawned task and must read the stream to
/// end-of-stream (or until it fails). Returning an `Err` terminates the
/// drain early: the launcher logs it at `warn` and otherwise ignores it,
/// since the caller has no synchronous channel to observe drain failures.
/// Sinks that need to report are expected to carry their own channel, as
/// [`CaptureSink`] does.
#[async_trait]
pub trait StreamSink: Send + 'static {
    /// Read `stream` to exhaustion, handling bytes per the sink's policy.
    async fn consume(self: Box<Self>, stream: ByteStream) -> io::Result<()>;
}

/// The default sink: reads the stream to end-of-stream and discards every
/// byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl StreamSink for NullSink {
    async fn consume(self: Box<Self>, mut stream: ByteStream) -> io::Result<()> {
        tokio::io::copy(&mut stream, &mut tokio::io::sink()).await?;
        Ok(())
    }
}

/// Forwards non-empty lines of child output through `tracing`.
///
/// A stdout binding logs at `info`, a stderr binding at `warn`, both under
/// the `ferry_exec.child` target. Lines must be valid UTF-8; an invalid
/// sequence ends the drain with an error.
#[derive(Debug, Clone, Copy)]
pub struct LineLogSink {
    label: &'static str,
    warn: bool,
}

impl LineLogSink {
    /// Sink for a child's stdout, logging lines at `info`.
    pub fn stdout() -> Self {
        Self {
            label: "stdout",
            warn: false,
        }
    }

    /// Sink for a child's stderr, logging lines at `warn`.
    pub fn stderr() -> Self {
        Self {
            label: "stderr",
            warn: true,
        }
    }
}

#[async_trait]
impl StreamSink for LineLogSink {
    async fn consume(self: Box<Self>, stream: ByteStream) -> io::Result<()> {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let text = line.trim_end();
            if text.is_empty() {
                continue;
            }
            if self.warn {
                warn!(target: "ferry_exec.child", stream = self.label, "{text}");
            } else {
                info!(target: "ferry_exec.child", stream = self.label, "{text}");
            }
        }
    }
}

/// Accumulates every byte of the stream for later inspection.
///
/// The launcher returns as soon as the child exits, without waiting for
/// drain tasks; callers that need "all output received" use the paired
/// [`CaptureHandle`] as the completion primitive.
#[derive(Debug)]
pub struct CaptureSink {
    buf: Arc<Mutex<Vec<u8>>>,
    done: watch::Sender<bool>,
}

/// Completion handle for a [`CaptureSink`].
#[derive(Debug)]
pub struct CaptureHandle {
    buf: Arc<Mutex<Vec<u8>>>,
    done: watch::Receiver<bool>,
}

impl CaptureSink {
    /// Create a sink and the handle that observes its completion.
    pub fn new() -> (Self, CaptureHandle) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = watch::channel(false);
        (
            Self {
                buf: Arc::clone(&buf),
                done: done_tx,
            },
            CaptureHandle { buf, done: done_rx },
        )
    }
}

#[async_trait]
impl StreamSink for CaptureSink {
    async fn consume(self: Box<Self>, mut stream: ByteStream) -> io::Result<()> {
        let mut chunk = [0u8; 8192];
        let result = loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break Ok(()),
                Ok(n) => {
                    let mut buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
                    buf.extend_from_slice(&chunk[..n]);
                }
                Err(err) => break Err(err),
            }
        };
        // Release the handle even on a failed drain; it gets whatever
        // arrived before the error.
        let _ = self.done.send(true);
        result
    }
}

impl CaptureHandle {
    /// Wait until the stream is fully drained, then return the captured
    /// bytes.
    ///
    /// Also resolves (with whatever was captured) if the sink is dropped
    /// without ever consuming a stream, e.g. when the launch itself failed.
    pub async fn wait(mut self) -> Vec<u8> {
        let _ = self.done.wait_for(|done| *done).await;
        let buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        buf.clone()
    }
}
