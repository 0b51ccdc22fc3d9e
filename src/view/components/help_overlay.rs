use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::theme::Theme;

use super::popup::centered_rect;

/// Render the help overlay.
/// Displayed as centered popup; any key closes it.
pub fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(60, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text())
        .block(
            Block::default()
                .title(" Help - press any key to close ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::ACTIVE_BORDER)),
        )
        .alignment(Alignment::Left)
        .style(Style::default().bg(Theme::BACKGROUND).fg(Theme::TEXT));

    frame.render_widget(paragraph, popup_area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Theme::INFO)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Build help text with keybindings grouped by category.
fn build_help_text() -> Vec<Line<'static>> {
    vec![
        section("CONNECTION"),
        Line::from("  c           - Connect / reconnect"),
        Line::from("  d           - Disconnect"),
        Line::from(""),
        section("NAVIGATION"),
        Line::from("  s or /      - Pick a session"),
        Line::from("  Tab         - Switch tree / transcript focus"),
        Line::from("  j / k       - Move in tree, scroll transcript"),
        Line::from("  Enter       - Select node / open task"),
        Line::from("  n / N       - Next / previous task part"),
        Line::from("  g / G       - Transcript top / bottom"),
        Line::from("  Ctrl+d / u  - Page down / up"),
        Line::from(""),
        section("PROMPT"),
        Line::from("  i           - Write a prompt (Enter sends)"),
        Line::from("  A           - Cycle agent"),
        Line::from("  m           - Pick model"),
        Line::from("  v           - Cycle variant"),
        Line::from("  a           - Abort session"),
        Line::from(""),
        section("VIEW"),
        Line::from("  t           - Show / hide thinking"),
        Line::from("  w           - Swap panels"),
        Line::from("  q           - Quit application"),
    ]
}
