pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod picker;
pub mod popup;
pub mod prompt_bar;

pub use footer::render_footer;
pub use header::render_header;
pub use help_overlay::render_help_overlay;
pub use picker::render_picker;
pub use popup::centered_rect;
pub use prompt_bar::render_prompt_bar;
