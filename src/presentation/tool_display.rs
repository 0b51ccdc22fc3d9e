use serde_json::{Map, Value};

use crate::model::Part;

/// Render a scalar the way it reads inline: strings bare, everything else as JSON.
fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn params(input: &Map<String, Value>) -> String {
    input
        .iter()
        .map(|(key, value)| format!("{key}={}", inline_value(value)))
        .collect::<Vec<_>>()
        .join(",")
}

fn task_display(part: &Part) -> String {
    let input = part.state().and_then(|state| state.get("input"));
    let description = input
        .and_then(|input| input.get("description"))
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty());
    let Some(description) = description else {
        return "Task".to_string();
    };
    match input
        .and_then(|input| input.get("subagent_type"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        Some(subagent) => format!("Task [{subagent}]: {description}"),
        None => format!("Task: {description}"),
    }
}

/// One-line label for a tool part.
///
/// `task` calls show their description and subagent; legacy parts show
/// their pre-rendered `formatted` string; anything else shows the tool
/// name with its input as `key=value` pairs when there is one.
pub fn tool_display(part: &Part) -> String {
    let tool = part.tool().unwrap_or("");
    if tool == "task" {
        return task_display(part);
    }
    if let Some(formatted) = part.str_field("formatted").filter(|f| !f.is_empty()) {
        return formatted.to_string();
    }
    match part
        .state()
        .and_then(|state| state.get("input"))
        .and_then(Value::as_object)
    {
        Some(input) => format!("{tool} [{}]", params(input)),
        None => tool.to_string(),
    }
}
