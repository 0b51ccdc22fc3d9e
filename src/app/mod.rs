pub mod command;
pub mod navigation;
pub mod orchestrator;
pub mod scroll;
pub mod state;
pub mod update;

pub use command::{apply_app_event, execute, Command, ScrollMove};
pub use navigation::{handle_key, task_targets};
pub use orchestrator::{NodeLoad, Orchestrator};
pub use scroll::{ScrollSurface, TranscriptScroll};
pub use state::{
    ConnectionState, InputMode, Overlay, PanelFocus, PromptSelection, SessionContext, UiState,
};
pub use update::apply_stream_event;
