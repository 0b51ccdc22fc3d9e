use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{ConnectionState, SessionContext};
use crate::model::Theme;
use crate::presentation::version_display;

/// Render header bar.
/// Shows: app name, server version, connection state, loaded session.
pub fn render_header(frame: &mut Frame, area: Rect, ctx: &SessionContext, streaming: bool) {
    let header = Paragraph::new(build_header_text(ctx, streaming)).style(
        Style::default()
            .fg(Theme::TEXT)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(header, area);
}

/// Pure function: build header text from the session context.
pub fn build_header_text(ctx: &SessionContext, streaming: bool) -> Line<'static> {
    let mut spans = vec![Span::styled("canopy", Style::default().fg(Theme::ACCENT))];

    if let Some(version) = &ctx.version {
        spans.push(Span::styled(
            format!(" {}", version_display(version)),
            Style::default().fg(Theme::MUTED_TEXT),
        ));
    }

    let (label, color) = match ctx.connection {
        ConnectionState::Connected => ("connected", Theme::SUCCESS),
        ConnectionState::Connecting => ("connecting...", Theme::WARNING),
        ConnectionState::Disconnected => ("disconnected", Theme::ERROR),
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled("● ", Style::default().fg(color)));
    spans.push(Span::styled(label, Style::default().fg(color)));

    if ctx.is_connected() && !streaming {
        spans.push(Span::styled(
            "  (no live stream)",
            Style::default().fg(Theme::WARNING),
        ));
    }

    if let Some(id) = &ctx.selected_session {
        let title = ctx
            .sessions
            .iter()
            .find(|s| s.id == *id)
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|| id.to_string());
        spans.push(Span::styled("  │ ", Style::default().fg(Theme::SEPARATOR)));
        spans.push(Span::styled(title, Style::default().fg(Theme::TEXT)));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionRecord;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn disconnected_header() {
        let ctx = SessionContext::new();
        let line = build_header_text(&ctx, false);
        assert!(text(&line).contains("disconnected"));
        assert!(!text(&line).contains("no live stream"));
    }

    #[test]
    fn connected_header_shows_version_and_session() {
        let mut ctx = SessionContext::new();
        ctx.connection = ConnectionState::Connected;
        ctx.version = Some("0.9.1".into());
        ctx.sessions = vec![SessionRecord::new("s1").with_title("Refactor")];
        ctx.selected_session = Some("s1".into());

        let rendered = text(&build_header_text(&ctx, true));
        assert!(rendered.contains("v0.9.1"));
        assert!(rendered.contains("connected"));
        assert!(rendered.contains("Refactor"));
    }

    #[test]
    fn lost_stream_is_flagged() {
        let mut ctx = SessionContext::new();
        ctx.connection = ConnectionState::Connected;
        assert!(text(&build_header_text(&ctx, false)).contains("no live stream"));
    }
}
