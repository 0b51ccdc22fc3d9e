use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{InputMode, SessionContext, UiState};
use crate::model::Theme;
use crate::presentation::{
    agent_button_text, has_variants, model_button_text, thinking_button_text, ui_helpers,
    variant_button_text,
};

/// Render the prompt input with the agent / model / variant selection in its title.
pub fn render_prompt_bar(frame: &mut Frame, area: Rect, ctx: &SessionContext, ui: &UiState) {
    let editing = ui.mode == InputMode::Prompt;
    let border = if editing {
        Theme::ACTIVE_BORDER
    } else {
        Theme::PANEL_BORDER
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Prompt ")
        .title_bottom(build_selection_line(ctx));

    let body = if ui_helpers::is_prompt_disabled(ctx.selected_node.is_some()) {
        Line::from(Span::styled(
            "Select a session node to send a prompt",
            Style::default().fg(Theme::MUTED_TEXT),
        ))
    } else if editing {
        Line::from(vec![
            Span::styled(ctx.prompt_input.clone(), Style::default().fg(Theme::TEXT)),
            Span::styled("▏", Style::default().fg(Theme::ACCENT)),
        ])
    } else if ctx.prompt_input.is_empty() {
        Line::from(Span::styled(
            "press i to write a prompt",
            Style::default().fg(Theme::MUTED_TEXT),
        ))
    } else {
        Line::from(Span::styled(
            ctx.prompt_input.clone(),
            Style::default().fg(Theme::TEXT),
        ))
    };

    frame.render_widget(Paragraph::new(body).block(block), area);
}

/// `[agent] [model] [variant] [thinking]` buttons.
pub fn build_selection_line(ctx: &SessionContext) -> Line<'static> {
    let button = |label: &str, active: bool| {
        let style = if active {
            Style::default().fg(Theme::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::MUTED_TEXT)
        };
        Span::styled(format!(" [{label}]"), style)
    };

    let mut spans = vec![
        button(
            agent_button_text(ctx.prompt.agent.as_deref()),
            ctx.prompt.agent.is_some(),
        ),
        button(
            model_button_text(ctx.prompt.model.as_deref()),
            ctx.prompt.model.is_some(),
        ),
    ];
    if has_variants(ctx.current_model_variants()) {
        spans.push(button(
            variant_button_text(ctx.prompt.variant.as_deref()),
            ctx.prompt.variant.is_some(),
        ));
    }
    spans.push(button(thinking_button_text(ctx.show_thinking), ctx.show_thinking));
    spans.push(Span::raw(" "));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn selection_line_uses_fallback_labels() {
        let ctx = SessionContext::new();
        let rendered = text(&build_selection_line(&ctx));
        assert!(rendered.contains("[Agent]"));
        assert!(rendered.contains("[Default model]"));
        assert!(rendered.contains("[Show Thinking]"));
        assert!(!rendered.contains("[Variant]"));
    }

    #[test]
    fn disabled_prompt_shows_hint() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let ctx = SessionContext::new();
        let ui = UiState::new();

        terminal
            .draw(|frame| render_prompt_bar(frame, frame.area(), &ctx, &ui))
            .unwrap();

        let rendered = crate::view::buffer_text(terminal.backend().buffer());
        assert!(rendered.contains("Select a session node"));
    }

    #[test]
    fn editing_prompt_shows_input() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut ctx = SessionContext::new();
        ctx.selected_node = Some("s".into());
        ctx.prompt_input = "fix the build".into();
        let mut ui = UiState::new();
        ui.mode = InputMode::Prompt;

        terminal
            .draw(|frame| render_prompt_bar(frame, frame.area(), &ctx, &ui))
            .unwrap();

        let rendered = crate::view::buffer_text(terminal.backend().buffer());
        assert!(rendered.contains("fix the build"));
    }
}
