use tracing::debug;

use crate::app::orchestrator::Orchestrator;
use crate::app::scroll::TranscriptScroll;
use crate::event::AppEvent;
use crate::model::SessionId;

/// Transcript scroll request from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMove {
    Up(usize),
    Down(usize),
    Top,
    Bottom,
}

/// Server-facing action produced by key handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    SelectSession(SessionId),
    SelectNode(SessionId),
    /// Select the child session spawned by a task part
    OpenTask(SessionId),
    SendPrompt,
    Abort,
    Scroll(ScrollMove),
}

/// Run one command against the orchestrator.
///
/// Node selections from the tree or a task part fetch their history in the
/// background so the loop keeps drawing; the result comes back on `events`.
pub async fn execute(orchestrator: &mut Orchestrator<TranscriptScroll>, command: Command) {
    debug!(?command, "executing command");
    match command {
        Command::Connect => orchestrator.connect().await,
        Command::Disconnect => orchestrator.disconnect(),
        Command::SelectSession(id) => orchestrator.select_session(id).await,
        Command::SelectNode(id) | Command::OpenTask(id) => {
            orchestrator.select_node_in_background(id)
        }
        Command::SendPrompt => orchestrator.send_prompt().await,
        Command::Abort => orchestrator.abort_session().await,
        Command::Scroll(movement) => {
            let scroll = orchestrator.surface_mut();
            match movement {
                ScrollMove::Up(rows) => scroll.scroll_by(-(rows as isize)),
                ScrollMove::Down(rows) => scroll.scroll_by(rows as isize),
                ScrollMove::Top => scroll.top(),
                ScrollMove::Bottom => scroll.bottom(),
            }
        }
    }
}

/// Route an event from the channel to the orchestrator.
pub fn apply_app_event(orchestrator: &mut Orchestrator<TranscriptScroll>, event: AppEvent) {
    match event {
        AppEvent::Stream(message) => orchestrator.handle_stream_message(message),
        AppEvent::HistoryLoaded {
            epoch,
            node_id,
            result,
        } => {
            orchestrator.finish_select_node(epoch, node_id, result);
        }
    }
}
