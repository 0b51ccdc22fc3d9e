//! Live event stream: SSE framing, envelope decoding, and the relay task
//! that forwards decoded events to the control loop in arrival order.

pub mod envelope;
pub mod sse;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::StreamError;
use crate::event::AppEvent;

pub use envelope::{decode, Envelope, StreamEvent};
pub use sse::{data_stream, SseDecoder};

/// Payload stream as produced by [`crate::api::RemoteSource::open_events`].
pub type PayloadStream = BoxStream<'static, Result<String, StreamError>>;

/// Message from a relay task, stamped with the connection that produced it.
#[derive(Debug, Clone)]
pub struct StreamMessage {
    pub connection: u64,
    pub kind: StreamMessageKind,
}

#[derive(Debug, Clone)]
pub enum StreamMessageKind {
    Event(StreamEvent),
    /// Terminal: sent exactly once when the stream fails or ends
    Closed(StreamError),
}

/// Owning handle to a running relay; dropping it stops the relay.
#[derive(Debug)]
pub struct StreamHandle {
    connection: u64,
    task: JoinHandle<()>,
}

impl StreamHandle {
    pub fn connection(&self) -> u64 {
        self.connection
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn close(self) {
        drop(self);
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn preview(payload: &str) -> &str {
    match payload.char_indices().nth(200) {
        Some((end, _)) => &payload[..end],
        None => payload,
    }
}

/// Spawn the relay for one connection.
///
/// Malformed payloads are logged and skipped. A transport error or the end
/// of the stream produces one `Closed` message, after which the task exits.
pub fn spawn_relay(
    mut payloads: PayloadStream,
    connection: u64,
    tx: UnboundedSender<AppEvent>,
) -> StreamHandle {
    let task = tokio::spawn(async move {
        info!(connection, "event stream relay started");
        let closed = loop {
            match payloads.next().await {
                Some(Ok(payload)) => {
                    debug!(connection, payload = preview(&payload), "SSE payload");
                    match decode(&payload) {
                        Ok(Some(event)) => {
                            let message = StreamMessage {
                                connection,
                                kind: StreamMessageKind::Event(event),
                            };
                            if tx.send(AppEvent::Stream(message)).is_err() {
                                debug!(connection, "event receiver dropped, relay exiting");
                                return;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!(connection, error = %e, "skipping malformed event"),
                    }
                }
                Some(Err(e)) => break e,
                None => break StreamError::Ended,
            }
        };

        warn!(connection, error = %closed, "event stream closed");
        let message = StreamMessage {
            connection,
            kind: StreamMessageKind::Closed(closed),
        };
        let _ = tx.send(AppEvent::Stream(message));
    });

    StreamHandle { connection, task }
}
