use crate::model::{Role, SessionRecord};

/// Top-level sessions: neither parent spelling is set.
pub fn root_sessions(sessions: &[SessionRecord]) -> Vec<&SessionRecord> {
    sessions.iter().filter(|s| s.is_root()).collect()
}

/// Case-insensitive substring match on title or id. Empty query keeps all.
pub fn filter_sessions<'a>(sessions: &[&'a SessionRecord], query: &str) -> Vec<&'a SessionRecord> {
    if query.is_empty() {
        return sessions.to_vec();
    }
    let query = query.to_lowercase();
    sessions
        .iter()
        .copied()
        .filter(|s| {
            s.title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&query))
                || s.id.as_str().to_lowercase().contains(&query)
        })
        .collect()
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "Prompt",
        Role::Assistant => "Assistant",
    }
}

pub fn session_display(session: &SessionRecord) -> &str {
    session.display_name()
}

pub fn version_display(version: &str) -> String {
    format!("v{version}")
}
