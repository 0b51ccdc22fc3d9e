//! Display strings and selection helpers consumed by the views.

pub mod model_helpers;
pub mod part_display;
pub mod session_helpers;
pub mod tool_display;
pub mod ui_helpers;

pub use model_helpers::{
    agent_button_text, cycle, filter_models, has_variants, model_button_text, model_variants,
    variant_button_text,
};
pub use part_display::{
    is_clickable_task_part, part_body, part_class, should_show_part, task_session_id,
};
pub use session_helpers::{filter_sessions, role_label, root_sessions, session_display, version_display};
pub use tool_display::tool_display;
pub use ui_helpers::{thinking_button_text, tree_prefix};
