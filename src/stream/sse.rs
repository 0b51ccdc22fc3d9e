//! Server-sent event framing.
//!
//! Bytes are split into lines (`\n`, optional `\r`), `:` lines are comments,
//! `data:` lines accumulate, and a blank line ends one event whose payload
//! is the data lines joined with `\n`. Other fields (`event:`, `id:`,
//! `retry:`) are not used by this client and are skipped.

use std::collections::VecDeque;
use std::fmt::Display;

use futures::{Stream, StreamExt};
use tracing::warn;

use crate::error::StreamError;

/// Incremental SSE decoder fed with arbitrary chunk boundaries.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every event payload it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            match String::from_utf8(line) {
                Ok(line) => {
                    if let Some(event) = self.process_line(&line) {
                        events.push(event);
                    }
                }
                Err(e) => warn!(error = %e, "skipping non-UTF-8 SSE line"),
            }
        }
        events
    }

    /// Flush whatever is buffered once the byte stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            let line = line.trim_end_matches('\r');
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(data) = extract_sse_data(line) {
            self.data_lines.push(data.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(payload)
    }
}

/// Value of a `data:` field line, with the single optional leading space removed.
fn extract_sse_data(line: &str) -> Option<&str> {
    let value = line.strip_prefix("data")?;
    if value.is_empty() {
        return Some("");
    }
    let value = value.strip_prefix(':')?;
    Some(value.strip_prefix(' ').unwrap_or(value))
}

struct DecodeState<S> {
    bytes: S,
    decoder: SseDecoder,
    ready: VecDeque<String>,
    done: bool,
}

/// Turn a chunked byte stream into a stream of event payloads.
///
/// A transport error is yielded once as `StreamError::Transport`, after
/// which the stream ends.
pub fn data_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, StreamError>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = DecodeState {
        bytes,
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(payload) = state.ready.pop_front() {
                return Some((Ok(payload), state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.ready.extend(events);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(StreamError::Transport(e.to_string())), state));
                }
                None => {
                    state.done = true;
                    state.ready.extend(state.decoder.finish());
                }
            }
        }
    })
}
