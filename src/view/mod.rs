use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{ConnectionState, Overlay, SessionContext, TranscriptScroll, UiState};
use crate::model::Theme;

pub mod components;
pub mod session_tree;
pub mod transcript;

pub use session_tree::render_session_tree;
pub use transcript::render_transcript;

/// Layout of the transcript pane in the frame just drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderMetrics {
    pub content_height: usize,
    pub viewport_height: usize,
}

/// Main view dispatcher.
///
/// Header, body, prompt bar and footer, with pickers and help on top.
///
/// # Returns
/// Transcript metrics when the transcript pane was drawn, `None` otherwise.
pub fn render(
    frame: &mut Frame,
    ctx: &SessionContext,
    ui: &UiState,
    scroll: &TranscriptScroll,
    streaming: bool,
) -> Option<RenderMetrics> {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Panels
            Constraint::Length(3), // Prompt
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    components::render_header(frame, layout[0], ctx, streaming);

    let metrics = if ctx.show_main_panels() {
        Some(render_panels(frame, layout[1], ctx, ui, scroll))
    } else {
        render_empty_state(frame, layout[1], ctx);
        None
    };

    components::render_prompt_bar(frame, layout[2], ctx, ui);
    components::render_footer(frame, layout[3], ctx, ui);

    match ui.overlay {
        Some(Overlay::Help) => components::render_help_overlay(frame),
        Some(Overlay::Sessions | Overlay::Models) => components::render_picker(frame, ctx, ui),
        None => {}
    }

    metrics
}

fn render_panels(
    frame: &mut Frame,
    area: Rect,
    ctx: &SessionContext,
    ui: &UiState,
    scroll: &TranscriptScroll,
) -> RenderMetrics {
    let (tree_pct, transcript_pct) = (35, 65);
    let constraints = if ctx.panels_swapped {
        [
            Constraint::Percentage(transcript_pct),
            Constraint::Percentage(tree_pct),
        ]
    } else {
        [
            Constraint::Percentage(tree_pct),
            Constraint::Percentage(transcript_pct),
        ]
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let (tree_area, transcript_area) = if ctx.panels_swapped {
        (columns[1], columns[0])
    } else {
        (columns[0], columns[1])
    };

    render_session_tree(frame, tree_area, ctx, ui);
    render_transcript(frame, transcript_area, ctx, ui, scroll)
}

fn render_empty_state(frame: &mut Frame, area: Rect, ctx: &SessionContext) {
    let message = match ctx.connection {
        ConnectionState::Disconnected => "Not connected. Press c to connect.",
        ConnectionState::Connecting => "Connecting...",
        ConnectionState::Connected => "Press s to pick a session.",
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(Theme::MUTED_TEXT),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::PANEL_BORDER)),
    );
    frame.render_widget(paragraph, area);
}

/// Flatten a buffer into newline-separated rows, for assertions in tests.
pub fn buffer_text(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
                .collect::<String>()
        })
        .collect::<Vec<String>>()
        .join("\n")
}
