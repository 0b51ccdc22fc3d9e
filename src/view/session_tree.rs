use std::collections::HashSet;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{PanelFocus, SessionContext, UiState};
use crate::model::{SessionId, Theme};
use crate::presentation::tree_prefix;
use crate::tree::{self, TreeNode};

/// Render the session tree panel.
pub fn render_session_tree(frame: &mut Frame, area: Rect, ctx: &SessionContext, ui: &UiState) {
    let focused = ui.focus == PanelFocus::Tree;
    let border = if focused {
        Theme::ACTIVE_BORDER
    } else {
        Theme::PANEL_BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Sessions ");

    let lines = build_tree_lines(ctx, ui);

    // Keep the cursor row on screen
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = (ui.tree_cursor + 1).saturating_sub(visible);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

/// Ids of children spawned close enough together to count as parallel.
fn parallel_ids(root: &TreeNode) -> HashSet<SessionId> {
    let mut ids = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for group in tree::detect_parallel_groups(&node.children) {
            if group.len() > 1 {
                ids.extend(group);
            }
        }
        stack.extend(node.children.iter());
    }
    ids
}

/// Pure function: one line per tree row, with box-drawing prefixes.
pub fn build_tree_lines(ctx: &SessionContext, ui: &UiState) -> Vec<Line<'static>> {
    let Some(root) = ctx.tree.as_ref() else {
        return vec![Line::from(Span::styled(
            "No session loaded",
            Style::default().fg(Theme::MUTED_TEXT),
        ))];
    };
    let parallel = parallel_ids(root);
    let focused = ui.focus == PanelFocus::Tree;

    tree::rows(root)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let node = row.node;
            let selected = ctx.selected_node.as_ref() == Some(&node.id);
            let mut title_style = Style::default().fg(Theme::TEXT);
            if selected {
                title_style = title_style.fg(Theme::ACCENT).add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![
                Span::styled(
                    tree_prefix(row.depth, row.is_last, &row.ancestor_continues),
                    Style::default().fg(Theme::SEPARATOR),
                ),
                Span::styled(
                    "● ",
                    Style::default().fg(Theme::session_status_color(&node.status)),
                ),
                Span::styled(node.display_title().to_string(), title_style),
            ];
            if parallel.contains(&node.id) {
                spans.push(Span::styled(" ∥", Style::default().fg(Theme::ACCENT_PURPLE)));
            }

            let line = Line::from(spans);
            if focused && i == ui.tree_cursor {
                line.style(Style::default().bg(Theme::SELECTION_BG))
            } else {
                line
            }
        })
        .collect()
}
