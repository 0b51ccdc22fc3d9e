use crate::error::ApiError;
use crate::model::{RawMessage, SessionId};
use crate::stream::StreamMessage;

/// All events that can occur in the application.
/// Sourced from the live stream relay and background history loads;
/// keyboard input is read directly by the event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Decoded live event or terminal close from the stream relay
    Stream(StreamMessage),

    /// Message history fetched for a node selection
    HistoryLoaded {
        epoch: u64,
        node_id: SessionId,
        result: Result<Vec<RawMessage>, ApiError>,
    },
}
