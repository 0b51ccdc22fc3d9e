use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{PanelFocus, SessionContext, TranscriptScroll, UiState};
use crate::model::{Part, PartKind, Role, Theme};
use crate::presentation::{
    is_clickable_task_part, part_body, part_class, role_label, should_show_part,
};
use crate::view::RenderMetrics;

/// Render the transcript of the selected node.
///
/// # Returns
/// Content and viewport heights of the frame just drawn, for the scroll state.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    ctx: &SessionContext,
    ui: &UiState,
    scroll: &TranscriptScroll,
) -> RenderMetrics {
    let focused = ui.focus == PanelFocus::Transcript;
    let border = if focused {
        Theme::ACTIVE_BORDER
    } else {
        Theme::PANEL_BORDER
    };
    let title = match &ctx.selected_node {
        Some(id) => format!(" Transcript · {id} "),
        None => " Transcript ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let viewport_height = area.height.saturating_sub(2) as usize;
    let lines = build_transcript_lines(ctx, ui, inner_width);
    let content_height = lines.len();

    let offset = scroll
        .offset()
        .min(content_height.saturating_sub(viewport_height));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);

    RenderMetrics {
        content_height,
        viewport_height,
    }
}

/// Hard-wrap `text` to `width` columns, keeping explicit line breaks.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.trim_end_matches('\r').chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}

fn role_style(role: Role) -> Style {
    let color = match role {
        Role::User => Theme::ROLE_USER,
        Role::Assistant => Theme::ROLE_ASSISTANT,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn part_style(part: &Part) -> Style {
    let style = Style::default().fg(Theme::part_color(part.kind()));
    match part.kind() {
        PartKind::Reasoning => style.add_modifier(Modifier::ITALIC),
        _ => style,
    }
}

/// Label shown before non-text parts
fn part_label(part: &Part) -> Option<String> {
    match part.kind() {
        PartKind::Text => None,
        _ => Some(part_class(part).trim_start_matches("part-").to_string()),
    }
}

/// Pure function: wrapped transcript lines for the given width.
///
/// Clickable task parts are counted in display order so the `n`/`N`
/// cursor highlights the same part that Enter opens.
pub fn build_transcript_lines(
    ctx: &SessionContext,
    ui: &UiState,
    width: usize,
) -> Vec<Line<'static>> {
    if ctx.selected_node.is_none() {
        return vec![Line::from(Span::styled(
            "Select a node in the session tree",
            Style::default().fg(Theme::MUTED_TEXT),
        ))];
    }
    if ctx.transcript.is_empty() {
        return vec![Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Theme::MUTED_TEXT),
        ))];
    }

    let mut lines = Vec::new();
    let mut task_index = 0;
    for message in &ctx.transcript.messages {
        lines.push(Line::from(Span::styled(
            role_label(message.role),
            role_style(message.role),
        )));

        for part in message
            .parts
            .iter()
            .filter(|p| should_show_part(p, ctx.show_thinking))
        {
            let Some(body) = part_body(part) else {
                continue;
            };

            let mut style = part_style(part);
            if is_clickable_task_part(part) {
                if ui.task_cursor == Some(task_index) {
                    style = style.bg(Theme::SELECTION_BG).add_modifier(Modifier::BOLD);
                }
                task_index += 1;
            }

            let text = match part_label(part) {
                Some(label) => format!("[{label}] {body}"),
                None => body,
            };
            let status = part
                .state()
                .and_then(|s| s.get("status"))
                .and_then(|s| s.as_str())
                .map(|s| format!(" ({s})"));
            let text = match status {
                Some(status) => format!("{text}{status}"),
                None => text,
            };

            lines.extend(
                wrap_text(&text, width.saturating_sub(2))
                    .into_iter()
                    .map(|chunk| Line::from(Span::styled(format!("  {chunk}"), style))),
            );
        }
        lines.push(Line::from(""));
    }
    lines
}
