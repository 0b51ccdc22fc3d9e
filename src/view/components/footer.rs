use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, Overlay, SessionContext, UiState};
use crate::model::Theme;

/// Render footer status bar with keybinding hints, or the current error.
pub fn render_footer(frame: &mut Frame, area: Rect, ctx: &SessionContext, ui: &UiState) {
    let footer = match &ctx.error {
        Some(error) => Paragraph::new(Line::from(vec![
            Span::styled("error: ", Style::default().fg(Theme::ERROR).add_modifier(Modifier::BOLD)),
            Span::styled(error.clone(), Style::default().fg(Theme::ERROR)),
        ]))
        .style(Style::default().bg(Theme::FOOTER_BG)),
        None => Paragraph::new(build_footer_text(ui)).style(
            Style::default()
                .fg(Theme::TEXT)
                .bg(Theme::FOOTER_BG)
                .add_modifier(Modifier::DIM),
        ),
    };

    frame.render_widget(footer, area);
}

fn hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str) {
    spans.push(Span::styled(key, Style::default().fg(Theme::INFO)));
    spans.push(Span::raw(label));
}

/// Pure function: build footer text for the current input mode.
pub fn build_footer_text(ui: &UiState) -> Line<'static> {
    let mut spans = Vec::new();

    if let Some(Overlay::Sessions | Overlay::Models) = ui.overlay {
        hint(&mut spans, "type", ":filter ");
        hint(&mut spans, "↑/↓", ":move ");
        hint(&mut spans, "Enter", ":choose ");
        hint(&mut spans, "Esc", ":close");
        return Line::from(spans);
    }

    match ui.mode {
        InputMode::Prompt => {
            hint(&mut spans, "Enter", ":send ");
            hint(&mut spans, "Esc", ":done");
        }
        InputMode::Normal => {
            hint(&mut spans, "q", ":quit ");
            hint(&mut spans, "c/d", ":connect/disconnect ");
            hint(&mut spans, "s", ":sessions ");
            hint(&mut spans, "j/k", ":move ");
            hint(&mut spans, "Enter", ":select ");
            hint(&mut spans, "i", ":prompt ");
            hint(&mut spans, "a", ":abort ");
            hint(&mut spans, "?", ":help");
        }
    }

    Line::from(spans)
}
