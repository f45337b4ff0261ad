// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod error;
pub mod exec;
pub mod sink;
pub mod spec;

pub use cancel::CancelToken;
pub use error::ExecError;
pub use exec::{exec, exec_cancellable, exec_spec, exec_with_sinks};
pub use sink::{ByteStream, CaptureHandle, CaptureSink, LineLogSink, NullSink, StreamSink};
pub use spec::ExecSpec;
