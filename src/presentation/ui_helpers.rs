pub fn thinking_button_text(show_thinking: bool) -> &'static str {
    if show_thinking {
        "Hide Thinking"
    } else {
        "Show Thinking"
    }
}

/// Box-drawing prefix for a tree row.
///
/// `ancestor_continues[i]` tells whether the ancestor at depth `i + 1` has a
/// later sibling, which keeps its vertical rule running.
pub fn tree_prefix(depth: usize, is_last: bool, ancestor_continues: &[bool]) -> String {
    if depth == 0 {
        return String::new();
    }
    let mut prefix = String::new();
    for i in 0..depth - 1 {
        let continues = ancestor_continues.get(i).copied().unwrap_or(false);
        prefix.push_str(if continues { "│  " } else { "   " });
    }
    prefix.push_str(if is_last { "└─ " } else { "├─ " });
    prefix
}

pub fn is_prompt_disabled(has_selected_node: bool) -> bool {
    !has_selected_node
}

pub fn is_send_disabled(has_selected_node: bool, prompt_input: &str) -> bool {
    !has_selected_node || prompt_input.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_prefix() {
        assert_eq!(tree_prefix(0, false, &[]), "");
    }

    #[test]
    fn first_level_branches() {
        assert_eq!(tree_prefix(1, false, &[]), "├─ ");
        assert_eq!(tree_prefix(1, true, &[]), "└─ ");
    }

    #[test]
    fn deeper_levels_follow_ancestors() {
        assert_eq!(tree_prefix(2, false, &[true]), "│  ├─ ");
        assert_eq!(tree_prefix(2, true, &[false]), "   └─ ");
        assert_eq!(tree_prefix(3, true, &[true, false]), "│     └─ ");
    }

    #[test]
    fn button_and_disabled_states() {
        assert_eq!(thinking_button_text(true), "Hide Thinking");
        assert_eq!(thinking_button_text(false), "Show Thinking");
        assert!(is_prompt_disabled(false));
        assert!(is_send_disabled(true, ""));
        assert!(!is_send_disabled(true, "go"));
    }
}
