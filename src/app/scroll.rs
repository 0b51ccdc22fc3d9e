/// Transcript rows from the bottom that still count as "at the bottom".
pub const NEAR_BOTTOM_ROWS: usize = 3;

/// The presentation surface the orchestrator reads and moves.
///
/// Restores and bottom-scrolls are requests: they take effect after the
/// next draw, once the new content has been laid out.
pub trait ScrollSurface {
    fn scroll_position(&self) -> usize;

    fn restore_position(&mut self, offset: usize);

    /// Follow the bottom. Without `force`, only when already near it.
    fn scroll_to_bottom(&mut self, force: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingScroll {
    Restore(usize),
    Bottom,
}

/// Scroll state of the transcript pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptScroll {
    offset: usize,
    content_height: usize,
    viewport_height: usize,
    pending: Option<PendingScroll>,
}

impl TranscriptScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn is_near_bottom(&self) -> bool {
        self.max_offset().saturating_sub(self.offset) < NEAR_BOTTOM_ROWS
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the layout of the frame just drawn and apply any deferred request.
    pub fn after_draw(&mut self, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = match self.pending.take() {
            Some(PendingScroll::Restore(offset)) => offset,
            Some(PendingScroll::Bottom) => self.max_offset(),
            None => self.offset,
        }
        .min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.pending = None;
        let next = self.offset.saturating_add_signed(delta);
        self.offset = next.min(self.max_offset());
    }

    pub fn top(&mut self) {
        self.pending = None;
        self.offset = 0;
    }

    pub fn bottom(&mut self) {
        self.pending = Some(PendingScroll::Bottom);
    }
}

impl ScrollSurface for TranscriptScroll {
    fn scroll_position(&self) -> usize {
        self.offset
    }

    fn restore_position(&mut self, offset: usize) {
        self.pending = Some(PendingScroll::Restore(offset));
    }

    fn scroll_to_bottom(&mut self, force: bool) {
        if force || self.is_near_bottom() {
            self.pending = Some(PendingScroll::Bottom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(offset: usize, content: usize, viewport: usize) -> TranscriptScroll {
        let mut scroll = TranscriptScroll::new();
        scroll.after_draw(content, viewport);
        scroll.scroll_by(offset as isize);
        scroll
    }

    #[test]
    fn restore_waits_for_next_draw() {
        let mut scroll = scrolled(0, 100, 10);
        scroll.restore_position(42);
        assert_eq!(scroll.scroll_position(), 0);

        scroll.after_draw(100, 10);
        assert_eq!(scroll.scroll_position(), 42);
        assert!(!scroll.has_pending());
    }

    #[test]
    fn restore_clamps_to_content() {
        let mut scroll = scrolled(0, 100, 10);
        scroll.restore_position(500);
        scroll.after_draw(30, 10);
        assert_eq!(scroll.scroll_position(), 20);
    }

    #[test]
    fn unforced_bottom_only_when_near_bottom() {
        let mut far = scrolled(10, 100, 10);
        far.scroll_to_bottom(false);
        far.after_draw(120, 10);
        assert_eq!(far.scroll_position(), 10);

        let mut near = scrolled(89, 100, 10);
        near.scroll_to_bottom(false);
        near.after_draw(120, 10);
        assert_eq!(near.scroll_position(), 110);
    }

    #[test]
    fn forced_bottom_always_follows() {
        let mut scroll = scrolled(0, 100, 10);
        scroll.scroll_to_bottom(true);
        scroll.after_draw(100, 10);
        assert_eq!(scroll.scroll_position(), 90);
    }

    #[test]
    fn latest_request_wins() {
        let mut scroll = scrolled(0, 100, 10);
        scroll.restore_position(5);
        scroll.scroll_to_bottom(true);
        scroll.after_draw(100, 10);
        assert_eq!(scroll.scroll_position(), 90);
    }

    #[test]
    fn manual_scroll_cancels_pending_and_saturates() {
        let mut scroll = scrolled(3, 100, 10);
        scroll.restore_position(50);
        scroll.scroll_by(-10);
        scroll.after_draw(100, 10);
        assert_eq!(scroll.scroll_position(), 0);
    }
}
