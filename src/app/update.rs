use tracing::debug;

use crate::app::scroll::ScrollSurface;
use crate::app::state::SessionContext;
use crate::error::TreeError;
use crate::model::{SessionId, SessionRecord, SessionStatus};
use crate::reconcile::{apply_message_update, apply_part_update};
use crate::stream::StreamEvent;
use crate::tree;

/// Dispatch one decoded live event to the reconciler or the tree.
///
/// Runs to completion before the next event is looked at. Part updates ask
/// the surface to follow the bottom, but only when it already sits there.
///
/// # Errors
/// Tree misses (`NoTree`, `NodeNotFound`, `DuplicateNode`) are returned to
/// the caller; the context is left as it was for the failing step.
pub fn apply_stream_event<S: ScrollSurface + ?Sized>(
    ctx: &mut SessionContext,
    surface: &mut S,
    event: StreamEvent,
) -> Result<(), TreeError> {
    match event {
        StreamEvent::PartUpdated(event) => {
            let outcome =
                apply_part_update(&mut ctx.transcript, ctx.selected_node.as_ref(), &event);
            debug!(part_id = %event.part.id, applied = outcome.is_applied(), "part update");
            surface.scroll_to_bottom(false);
            Ok(())
        }
        StreamEvent::MessageUpdated(event) => {
            let outcome =
                apply_message_update(&mut ctx.transcript, ctx.selected_node.as_ref(), &event);
            debug!(message_id = %event.info.id, applied = outcome.is_applied(), "message update");
            Ok(())
        }
        StreamEvent::SessionCreated(record) => session_created(ctx, record),
        StreamEvent::SessionUpdated(record) => session_updated(ctx, record),
        StreamEvent::SessionStatus { session_id, status } => {
            session_status(ctx, &session_id, status)
        }
    }
}

/// Append to the flat list, and graft into the tree when the parent is there.
fn session_created(ctx: &mut SessionContext, record: SessionRecord) -> Result<(), TreeError> {
    ctx.sessions.push(record.clone());

    let Some(active) = ctx.tree.as_mut() else {
        return Ok(());
    };
    let Some(parent_id) = record.effective_parent_id() else {
        return Ok(());
    };
    if !tree::contains(active, parent_id) {
        debug!(session_id = %record.id, parent_id = %parent_id, "new session outside the active tree");
        return Ok(());
    }
    tree::insert(active, &record)?;
    ctx.tree_version += 1;
    Ok(())
}

fn session_updated(ctx: &mut SessionContext, record: SessionRecord) -> Result<(), TreeError> {
    if let Some(existing) = ctx.sessions.iter_mut().find(|s| s.id == record.id) {
        existing.title = record.title.clone();
    }

    let active = ctx.tree.as_mut().ok_or(TreeError::NoTree)?;
    tree::update_title(active, &record.id, record.title)?;
    ctx.tree_version += 1;
    Ok(())
}

fn session_status(
    ctx: &mut SessionContext,
    session_id: &SessionId,
    status: SessionStatus,
) -> Result<(), TreeError> {
    if let Some(existing) = ctx.sessions.iter_mut().find(|s| s.id == *session_id) {
        existing.status = Some(status.clone());
    }

    let active = ctx.tree.as_mut().ok_or(TreeError::NoTree)?;
    tree::update_status(active, session_id, status)?;
    ctx.tree_version += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scroll::TranscriptScroll;
    use crate::model::{MessageInfo, MessageUpdatedEvent, PartPayload, PartUpdatedEvent};

    fn context_with_tree() -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.sessions = vec![
            SessionRecord::new("root"),
            SessionRecord::new("a").with_parent("root").with_created(10),
        ];
        ctx.tree = tree::build(&ctx.sessions);
        ctx.selected_node = Some("a".into());
        ctx
    }

    fn part_event(session: &str, delta: Option<&str>) -> StreamEvent {
        StreamEvent::PartUpdated(PartUpdatedEvent {
            part: PartPayload::new("p1", "m1", session).with_field("type", "text"),
            delta: delta.map(str::to_string),
        })
    }

    /// Records every request so tests can assert on them.
    #[derive(Default)]
    struct RecordingSurface {
        bottom_requests: Vec<bool>,
    }

    impl ScrollSurface for RecordingSurface {
        fn scroll_position(&self) -> usize {
            0
        }

        fn restore_position(&mut self, _offset: usize) {}

        fn scroll_to_bottom(&mut self, force: bool) {
            self.bottom_requests.push(force);
        }
    }

    #[test]
    fn part_update_requests_unforced_follow() {
        let mut ctx = context_with_tree();
        let mut surface = RecordingSurface::default();
        apply_stream_event(&mut ctx, &mut surface, part_event("a", Some("Hi"))).unwrap();

        assert_eq!(ctx.transcript.messages[0].parts[0].content(), Some("Hi"));
        assert_eq!(surface.bottom_requests, vec![false]);
    }

    #[test]
    fn part_update_for_other_session_still_asks_to_follow() {
        let mut ctx = context_with_tree();
        let mut surface = RecordingSurface::default();
        apply_stream_event(&mut ctx, &mut surface, part_event("root", Some("x"))).unwrap();

        assert!(ctx.transcript.is_empty());
        assert_eq!(surface.bottom_requests.len(), 1);
    }

    #[test]
    fn message_update_sets_role() {
        let mut ctx = context_with_tree();
        let mut surface = TranscriptScroll::new();
        let event = StreamEvent::MessageUpdated(MessageUpdatedEvent {
            info: MessageInfo {
                id: "m1".into(),
                session_id: "a".into(),
                role: Some("user".into()),
            },
        });
        apply_stream_event(&mut ctx, &mut surface, event).unwrap();
        assert_eq!(ctx.transcript.messages[0].role, crate::model::Role::User);
    }

    #[test]
    fn session_created_grafts_when_parent_present() {
        let mut ctx = context_with_tree();
        let mut surface = TranscriptScroll::new();
        let before = ctx.tree_version;
        let record = SessionRecord::new("b").with_parent("a").with_created(20);
        apply_stream_event(&mut ctx, &mut surface, StreamEvent::SessionCreated(record)).unwrap();

        assert_eq!(ctx.sessions.len(), 3);
        let tree = ctx.tree.as_ref().unwrap();
        assert!(tree::contains(tree, &"b".into()));
        assert!(ctx.tree_version > before);
    }

    #[test]
    fn session_created_outside_tree_only_lists() {
        let mut ctx = context_with_tree();
        let mut surface = TranscriptScroll::new();
        let record = SessionRecord::new("x").with_parent("elsewhere");
        apply_stream_event(&mut ctx, &mut surface, StreamEvent::SessionCreated(record)).unwrap();

        assert_eq!(ctx.sessions.len(), 3);
        assert!(!tree::contains(ctx.tree.as_ref().unwrap(), &"x".into()));
    }

    #[test]
    fn session_updated_without_tree_is_reported() {
        let mut ctx = SessionContext::new();
        let mut surface = TranscriptScroll::new();
        let result = apply_stream_event(
            &mut ctx,
            &mut surface,
            StreamEvent::SessionUpdated(SessionRecord::new("a").with_title("New")),
        );
        assert_eq!(result, Err(TreeError::NoTree));
    }

    #[test]
    fn session_status_on_unknown_node_is_reported() {
        let mut ctx = context_with_tree();
        let mut surface = TranscriptScroll::new();
        let result = apply_stream_event(
            &mut ctx,
            &mut surface,
            StreamEvent::SessionStatus {
                session_id: "ghost".into(),
                status: SessionStatus::Busy,
            },
        );
        assert_eq!(result, Err(TreeError::NodeNotFound("ghost".into())));
    }

    #[test]
    fn session_status_updates_tree_and_list() {
        let mut ctx = context_with_tree();
        let mut surface = TranscriptScroll::new();
        apply_stream_event(
            &mut ctx,
            &mut surface,
            StreamEvent::SessionStatus {
                session_id: "a".into(),
                status: SessionStatus::Busy,
            },
        )
        .unwrap();

        let node = tree::find_by_id(ctx.tree.as_ref().unwrap(), &"a".into()).unwrap();
        assert_eq!(node.status, SessionStatus::Busy);
        assert_eq!(ctx.sessions[1].status, Some(SessionStatus::Busy));
    }
}
