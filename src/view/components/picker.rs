use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use crate::app::{Overlay, SessionContext, UiState};
use crate::model::Theme;
use crate::presentation::model_helpers::is_model_selected;
use crate::presentation::session_display;

use super::popup::centered_rect;

/// Render the session or model picker popup, whichever is open.
pub fn render_picker(frame: &mut Frame, ctx: &SessionContext, ui: &UiState) {
    let (title, filter, items) = match ui.overlay {
        Some(Overlay::Sessions) => (" Sessions ", &ctx.session_filter, session_items(ctx)),
        Some(Overlay::Models) => (" Models ", &ctx.model_filter, model_items(ctx)),
        _ => return,
    };

    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::ACTIVE_BORDER))
        .title(title)
        .title_bottom(Line::from(vec![
            Span::styled(" / ", Style::default().fg(Theme::INFO)),
            Span::styled(format!("{filter} "), Style::default().fg(Theme::TEXT)),
        ]))
        .style(Style::default().bg(Theme::BACKGROUND));

    let empty = items.is_empty();
    let list = if empty {
        List::new(vec![ListItem::new(Span::styled(
            "No matches",
            Style::default().fg(Theme::MUTED_TEXT),
        ))])
    } else {
        List::new(items)
    }
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Theme::SELECTION_BG)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if !empty {
        state.select(Some(ui.picker_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn session_items(ctx: &SessionContext) -> Vec<ListItem<'static>> {
    ctx.filtered_sessions()
        .into_iter()
        .map(|session| {
            let selected = ctx.selected_session.as_ref() == Some(&session.id);
            let marker = if selected { "● " } else { "  " };
            let created = match session.time.created_at() {
                Some(at) if session.time.created > 0 => at.format("%Y-%m-%d %H:%M ").to_string(),
                _ => String::new(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Theme::ACCENT)),
                Span::styled(created, Style::default().fg(Theme::MUTED_TEXT)),
                Span::styled(
                    session_display(session).to_string(),
                    Style::default().fg(Theme::TEXT),
                ),
            ]))
        })
        .collect()
}

fn model_items(ctx: &SessionContext) -> Vec<ListItem<'static>> {
    let selected = ctx.prompt.model.as_deref();
    let default_marker = if selected.is_none() { "● " } else { "  " };
    let mut items = vec![ListItem::new(Line::from(vec![
        Span::styled(default_marker, Style::default().fg(Theme::ACCENT)),
        Span::styled("Default model", Style::default().fg(Theme::MUTED_TEXT)),
    ]))];

    items.extend(ctx.filtered_models().into_iter().map(|model| {
        let marker = if is_model_selected(&model, selected) {
            "● "
        } else {
            "  "
        };
        ListItem::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(Theme::ACCENT)),
            Span::styled(model.name, Style::default().fg(Theme::TEXT)),
            Span::styled(format!("  {}", model.id), Style::default().fg(Theme::MUTED_TEXT)),
        ]))
    }));
    items
}
