use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::command::{Command, ScrollMove};
use crate::app::state::{InputMode, Overlay, PanelFocus, SessionContext, UiState};
use crate::model::SessionId;
use crate::presentation::{cycle, should_show_part, task_session_id, ui_helpers};
use crate::tree;

/// Half-page jump size for Ctrl+D / Ctrl+U
const PAGE_JUMP: usize = 10;

/// Keyboard state transition.
///
/// Mutates only terminal state and the local parts of the context (prompt
/// input, filters, toggles, prompt selection). Anything that talks to the
/// server comes back as a [`Command`] for the caller to run.
pub fn handle_key(ui: &mut UiState, ctx: &mut SessionContext, key: KeyEvent) -> Option<Command> {
    // Overlays have priority
    if let Some(overlay) = ui.overlay {
        return match overlay {
            Overlay::Help => {
                ui.overlay = None;
                None
            }
            Overlay::Sessions => handle_session_picker_key(ui, ctx, key),
            Overlay::Models => handle_model_picker_key(ui, ctx, key),
        };
    }

    if ui.mode == InputMode::Prompt {
        return handle_prompt_key(ui, ctx, key);
    }

    match key.code {
        KeyCode::Char('q') => {
            ui.should_quit = true;
            None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            ui.should_quit = true;
            None
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Scroll(ScrollMove::Down(PAGE_JUMP)))
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Scroll(ScrollMove::Up(PAGE_JUMP)))
        }
        KeyCode::Char('c') => Some(Command::Connect),
        KeyCode::Char('d') => Some(Command::Disconnect),
        KeyCode::Char('s') | KeyCode::Char('/') => {
            open_overlay(ui, Overlay::Sessions);
            None
        }
        KeyCode::Char('m') => {
            open_overlay(ui, Overlay::Models);
            None
        }
        KeyCode::Char('?') => {
            ui.overlay = Some(Overlay::Help);
            None
        }
        KeyCode::Char('A') => {
            let names: Vec<String> = ctx.agents.iter().map(|a| a.name.clone()).collect();
            ctx.prompt.agent = cycle(&names, ctx.prompt.agent.as_deref()).map(str::to_string);
            None
        }
        KeyCode::Char('v') => {
            let next = cycle(ctx.current_model_variants(), ctx.prompt.variant.as_deref())
                .map(str::to_string);
            ctx.prompt.variant = next;
            None
        }
        KeyCode::Char('t') => {
            ctx.show_thinking = !ctx.show_thinking;
            ui.task_cursor = None;
            None
        }
        KeyCode::Char('w') => {
            ctx.panels_swapped = !ctx.panels_swapped;
            None
        }
        KeyCode::Char('a') => Some(Command::Abort),
        KeyCode::Char('i') => {
            if !ui_helpers::is_prompt_disabled(ctx.selected_node.is_some()) {
                ui.mode = InputMode::Prompt;
            }
            None
        }
        KeyCode::Tab => {
            ui.focus = match ui.focus {
                PanelFocus::Tree => PanelFocus::Transcript,
                PanelFocus::Transcript => PanelFocus::Tree,
            };
            None
        }
        KeyCode::Char('j') | KeyCode::Down => move_down(ui, ctx),
        KeyCode::Char('k') | KeyCode::Up => move_up(ui, ctx),
        KeyCode::Char('g') | KeyCode::Home => Some(Command::Scroll(ScrollMove::Top)),
        KeyCode::Char('G') | KeyCode::End => Some(Command::Scroll(ScrollMove::Bottom)),
        KeyCode::Char('n') => {
            step_task_cursor(ui, ctx, true);
            None
        }
        KeyCode::Char('N') => {
            step_task_cursor(ui, ctx, false);
            None
        }
        KeyCode::Enter => activate(ui, ctx),
        KeyCode::Esc => {
            ui.task_cursor = None;
            None
        }
        _ => None,
    }
}

fn open_overlay(ui: &mut UiState, overlay: Overlay) {
    ui.overlay = Some(overlay);
    ui.picker_cursor = 0;
}

/// Prompt editing: characters go to the input, Enter sends, Esc leaves.
fn handle_prompt_key(ui: &mut UiState, ctx: &mut SessionContext, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            ui.mode = InputMode::Normal;
            None
        }
        KeyCode::Enter => {
            if ui_helpers::is_send_disabled(ctx.selected_node.is_some(), &ctx.prompt_input) {
                None
            } else {
                Some(Command::SendPrompt)
            }
        }
        KeyCode::Backspace => {
            ctx.prompt_input.pop();
            None
        }
        KeyCode::Char(c) => {
            ctx.prompt_input.push(c);
            None
        }
        _ => None,
    }
}

/// Session picker: typing filters, Enter loads the highlighted root session.
fn handle_session_picker_key(
    ui: &mut UiState,
    ctx: &mut SessionContext,
    key: KeyEvent,
) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            ui.overlay = None;
            None
        }
        KeyCode::Down => {
            let count = ctx.filtered_sessions().len();
            if ui.picker_cursor + 1 < count {
                ui.picker_cursor += 1;
            }
            None
        }
        KeyCode::Up => {
            ui.picker_cursor = ui.picker_cursor.saturating_sub(1);
            None
        }
        KeyCode::Enter => {
            let selected = ctx
                .filtered_sessions()
                .get(ui.picker_cursor)
                .map(|s| s.id.clone())?;
            ui.overlay = None;
            ui.tree_cursor = 0;
            ui.task_cursor = None;
            Some(Command::SelectSession(selected))
        }
        KeyCode::Backspace => {
            ctx.session_filter.pop();
            ui.picker_cursor = 0;
            None
        }
        KeyCode::Char(c) => {
            ctx.session_filter.push(c);
            ui.picker_cursor = 0;
            None
        }
        _ => None,
    }
}

/// Model picker: entry 0 is the server default, the rest are the filtered models.
fn handle_model_picker_key(
    ui: &mut UiState,
    ctx: &mut SessionContext,
    key: KeyEvent,
) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            ui.overlay = None;
        }
        KeyCode::Down => {
            let count = ctx.filtered_models().len() + 1;
            if ui.picker_cursor + 1 < count {
                ui.picker_cursor += 1;
            }
        }
        KeyCode::Up => {
            ui.picker_cursor = ui.picker_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            let model = match ui.picker_cursor {
                0 => None,
                i => ctx.filtered_models().get(i - 1).map(|m| m.id.clone()),
            };
            ctx.prompt.model = model;
            let keep_variant = ctx
                .prompt
                .variant
                .as_ref()
                .is_some_and(|v| ctx.current_model_variants().contains(v));
            if !keep_variant {
                ctx.prompt.variant = None;
            }
            ui.overlay = None;
        }
        KeyCode::Backspace => {
            ctx.model_filter.pop();
            ui.picker_cursor = 0;
        }
        KeyCode::Char(c) => {
            ctx.model_filter.push(c);
            ui.picker_cursor = 0;
        }
        _ => {}
    }
    None
}

fn tree_row_ids(ctx: &SessionContext) -> Vec<SessionId> {
    ctx.tree
        .as_ref()
        .map(|t| tree::rows(t).into_iter().map(|r| r.node.id.clone()).collect())
        .unwrap_or_default()
}

/// Child sessions reachable from task parts currently visible in the transcript.
pub fn task_targets(ctx: &SessionContext) -> Vec<SessionId> {
    ctx.transcript
        .messages
        .iter()
        .flat_map(|m| m.parts.iter())
        .filter(|p| should_show_part(p, ctx.show_thinking))
        .filter_map(task_session_id)
        .collect()
}

fn move_down(ui: &mut UiState, ctx: &SessionContext) -> Option<Command> {
    match ui.focus {
        PanelFocus::Tree => {
            let count = tree_row_ids(ctx).len();
            if ui.tree_cursor + 1 < count {
                ui.tree_cursor += 1;
            }
            None
        }
        PanelFocus::Transcript => Some(Command::Scroll(ScrollMove::Down(1))),
    }
}

fn move_up(ui: &mut UiState, ctx: &SessionContext) -> Option<Command> {
    match ui.focus {
        PanelFocus::Tree => {
            let count = tree_row_ids(ctx).len();
            ui.tree_cursor = ui.tree_cursor.saturating_sub(1).min(count.saturating_sub(1));
            None
        }
        PanelFocus::Transcript => Some(Command::Scroll(ScrollMove::Up(1))),
    }
}

fn step_task_cursor(ui: &mut UiState, ctx: &SessionContext, forward: bool) {
    let count = task_targets(ctx).len();
    if count == 0 {
        ui.task_cursor = None;
        return;
    }
    ui.task_cursor = Some(match (ui.task_cursor, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1) % count,
        (Some(i), false) => (i + count - 1) % count,
    });
}

/// Enter: select the highlighted tree row, or open the highlighted task.
fn activate(ui: &mut UiState, ctx: &SessionContext) -> Option<Command> {
    match ui.focus {
        PanelFocus::Tree => {
            let id = tree_row_ids(ctx).into_iter().nth(ui.tree_cursor)?;
            ui.task_cursor = None;
            Some(Command::SelectNode(id))
        }
        PanelFocus::Transcript => {
            let target = task_targets(ctx).into_iter().nth(ui.task_cursor?)?;
            ui.task_cursor = None;
            Some(Command::OpenTask(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionRecord;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctx_with_tree() -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.sessions = vec![
            SessionRecord::new("root").with_title("Root"),
            SessionRecord::new("a").with_parent("root").with_created(1),
            SessionRecord::new("b").with_parent("root").with_created(2),
        ];
        ctx.tree = tree::build(&ctx.sessions);
        ctx
    }

    #[test]
    fn quit_key_sets_should_quit() {
        let mut ui = UiState::new();
        let mut ctx = SessionContext::new();
        assert!(handle_key(&mut ui, &mut ctx, key(KeyCode::Char('q'))).is_none());
        assert!(ui.should_quit);
    }

    #[test]
    fn enter_on_tree_row_selects_node() {
        let mut ui = UiState::new();
        let mut ctx = ctx_with_tree();
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('j')));
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('j')));
        let command = handle_key(&mut ui, &mut ctx, key(KeyCode::Enter));
        assert_eq!(command, Some(Command::SelectNode("b".into())));
    }

    #[test]
    fn tree_cursor_stops_at_last_row() {
        let mut ui = UiState::new();
        let mut ctx = ctx_with_tree();
        for _ in 0..10 {
            handle_key(&mut ui, &mut ctx, key(KeyCode::Down));
        }
        assert_eq!(ui.tree_cursor, 2);
    }

    #[test]
    fn prompt_mode_requires_selected_node() {
        let mut ui = UiState::new();
        let mut ctx = ctx_with_tree();
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('i')));
        assert_eq!(ui.mode, InputMode::Normal);

        ctx.selected_node = Some("root".into());
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('i')));
        assert_eq!(ui.mode, InputMode::Prompt);
    }

    #[test]
    fn typing_then_enter_sends() {
        let mut ui = UiState::new();
        let mut ctx = ctx_with_tree();
        ctx.selected_node = Some("root".into());
        ui.mode = InputMode::Prompt;

        assert!(handle_key(&mut ui, &mut ctx, key(KeyCode::Enter)).is_none());
        for c in "hi!".chars() {
            handle_key(&mut ui, &mut ctx, key(KeyCode::Char(c)));
        }
        handle_key(&mut ui, &mut ctx, key(KeyCode::Backspace));
        assert_eq!(ctx.prompt_input, "hi");
        assert_eq!(
            handle_key(&mut ui, &mut ctx, key(KeyCode::Enter)),
            Some(Command::SendPrompt)
        );
    }

    #[test]
    fn prompt_mode_swallows_command_keys() {
        let mut ui = UiState::new();
        let mut ctx = SessionContext::new();
        ctx.selected_node = Some("root".into());
        ui.mode = InputMode::Prompt;
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('q')));
        assert!(!ui.should_quit);
        assert_eq!(ctx.prompt_input, "q");
    }

    #[test]
    fn session_picker_filters_and_selects() {
        let mut ui = UiState::new();
        let mut ctx = SessionContext::new();
        ctx.sessions = vec![
            SessionRecord::new("s1").with_title("Alpha"),
            SessionRecord::new("s2").with_title("Beta"),
        ];
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('s')));
        assert_eq!(ui.overlay, Some(Overlay::Sessions));

        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('b')));
        assert_eq!(ctx.session_filter, "b");
        let command = handle_key(&mut ui, &mut ctx, key(KeyCode::Enter));
        assert_eq!(command, Some(Command::SelectSession("s2".into())));
        assert!(ui.overlay.is_none());
    }

    #[test]
    fn toggles_flip_context_flags() {
        let mut ui = UiState::new();
        let mut ctx = SessionContext::new();
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('t')));
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('w')));
        assert!(ctx.show_thinking);
        assert!(ctx.panels_swapped);
    }

    #[test]
    fn help_overlay_closes_on_any_key() {
        let mut ui = UiState::new();
        let mut ctx = SessionContext::new();
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('?')));
        assert_eq!(ui.overlay, Some(Overlay::Help));
        handle_key(&mut ui, &mut ctx, key(KeyCode::Char('q')));
        assert!(ui.overlay.is_none());
        assert!(!ui.should_quit);
    }
}
