use serde_json::Value;

use super::tool_display::tool_display;
use crate::model::{Part, PartKind, SessionId};

/// Reasoning parts are hidden unless thinking is shown; everything else is visible.
pub fn should_show_part(part: &Part, show_thinking: bool) -> bool {
    match part.kind() {
        PartKind::Reasoning => show_thinking,
        _ => true,
    }
}

/// Child session spawned by a `task` tool call, once the server reports it.
pub fn task_session_id(part: &Part) -> Option<SessionId> {
    if part.tool() != Some("task") {
        return None;
    }
    part.state()
        .and_then(|state| state.get("metadata"))
        .and_then(|metadata| metadata.get("sessionId"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(SessionId::new)
}

pub fn is_clickable_task_part(part: &Part) -> bool {
    task_session_id(part).is_some()
}

pub fn agent_display(part: &Part) -> String {
    match part.str_field("name").filter(|n| !n.is_empty()) {
        Some(name) => format!("Skill: {name}"),
        None => "Skill".to_string(),
    }
}

pub fn reasoning_display(part: &Part) -> &str {
    part.text().unwrap_or("")
}

pub fn file_display(part: &Part) -> &str {
    part.str_field("filename")
        .filter(|f| !f.is_empty())
        .or_else(|| part.str_field("url").filter(|u| !u.is_empty()))
        .unwrap_or("File")
}

pub fn subtask_display(part: &Part) -> String {
    let Some(description) = part.str_field("description").filter(|d| !d.is_empty()) else {
        return "Subtask".to_string();
    };
    match part.str_field("agent").filter(|a| !a.is_empty()) {
        Some(agent) => format!("Subtask [{agent}]: {description}"),
        None => format!("Subtask: {description}"),
    }
}

pub fn retry_display(part: &Part) -> String {
    match part.field("attempt").and_then(Value::as_u64) {
        Some(attempt) => format!("Retry attempt {attempt}"),
        None => "Retry attempt".to_string(),
    }
}

pub fn patch_display(part: &Part) -> String {
    let count = part
        .field("files")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    format!("Patch: {count} files")
}

/// Style class of a part, `part-{type}`.
pub fn part_class(part: &Part) -> String {
    format!("part-{}", part.type_tag().unwrap_or(PartKind::Text.as_str()))
}

/// Renderable content of a part, by kind.
///
/// Returns `None` for kinds that have nothing to show beyond a marker
/// (`step-start`, `snapshot`, ...).
pub fn part_body(part: &Part) -> Option<String> {
    let body = match part.kind() {
        PartKind::Text => part.content().or_else(|| part.text()).unwrap_or("").to_string(),
        PartKind::Reasoning => reasoning_display(part).to_string(),
        PartKind::Tool => tool_display(part),
        PartKind::ToolInvocation => part
            .str_field("formatted")
            .map(str::to_string)
            .unwrap_or_else(|| tool_display(part)),
        PartKind::File => file_display(part).to_string(),
        PartKind::Agent => agent_display(part),
        PartKind::Subtask => subtask_display(part),
        PartKind::Retry => retry_display(part),
        PartKind::Patch => patch_display(part),
        PartKind::Compaction => "Compacted".to_string(),
        PartKind::StepStart | PartKind::StepFinish | PartKind::Snapshot => return None,
        PartKind::Unknown => part.content().unwrap_or("").to_string(),
    };
    Some(body)
}
