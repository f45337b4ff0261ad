// SPDX-License-Identifier: MIT OR Apache-2.0
//! Unit tests for the sink implementations, fed from in-memory streams.

use std::io::Cursor;
use std::time::Duration;

use ferry_exec::{ByteStream, CaptureSink, LineLogSink, NullSink, StreamSink};
use tokio::time::timeout;

fn stream(bytes: Vec<u8>) -> ByteStream {
    Box::new(Cursor::new(bytes))
}

#[tokio::test]
async fn null_sink_drains_to_eof() {
    Box::new(NullSink)
        .consume(stream(vec![0u8; 100_000]))
        .await
        .unwrap();
}

#[tokio::test]
async fn capture_sink_captures_everything() {
    let (sink, handle) = CaptureSink::new();
    Box::new(sink)
        .consume(stream(b"hello world".to_vec()))
        .await
        .unwrap();
    assert_eq!(handle.wait().await, b"hello world".to_vec());
}

#[tokio::test]
async fn capture_sink_handles_empty_stream() {
    let (sink, handle) = CaptureSink::new();
    Box::new(sink).consume(stream(Vec::new())).await.unwrap();
    assert!(handle.wait().await.is_empty());
}

#[tokio::test]
async fn capture_handle_resolves_when_sink_dropped_unconsumed() {
    let (sink, handle) = CaptureSink::new();
    drop(sink);

    let bytes = timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("handle should not hang on a dropped sink");
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn capture_handle_waits_for_slow_drain() {
    let (sink, handle) = CaptureSink::new();

    let (read_half, mut write_half) = tokio::io::duplex(16);
    tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        for chunk in [b"abc".as_slice(), b"def", b"ghi"] {
            write_half.write_all(chunk).await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        // Dropping the writer ends the stream.
    });
    tokio::spawn(async move {
        let _ = Box::new(sink).consume(Box::new(read_half)).await;
    });

    let bytes = timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("drain should finish");
    assert_eq!(bytes, b"abcdefghi".to_vec());
}

#[tokio::test]
async fn line_log_sink_consumes_lines() {
    Box::new(LineLogSink::stdout())
        .consume(stream(b"first line\n\nsecond line\nno trailing newline".to_vec()))
        .await
        .unwrap();

    Box::new(LineLogSink::stderr())
        .consume(stream(b"warning output\n".to_vec()))
        .await
        .unwrap();
}

#[tokio::test]
async fn line_log_sink_fails_on_invalid_utf8() {
    let result = Box::new(LineLogSink::stdout())
        .consume(stream(vec![0xff, 0xfe, b'\n']))
        .await;
    assert!(result.is_err());
}
