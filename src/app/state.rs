use std::collections::HashMap;

use crate::api::PromptOptions;
use crate::model::{AgentInfo, ModelOption, ProviderCatalog, SessionId, SessionRecord};
use crate::presentation::{filter_models, filter_sessions, model_variants, root_sessions};
use crate::reconcile::Transcript;
use crate::tree::TreeNode;

/// Connection lifecycle: `Disconnected -> Connecting -> Connected -> Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Agent / model / variant chosen for the next prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSelection {
    pub agent: Option<String>,
    /// `provider/model`
    pub model: Option<String>,
    pub variant: Option<String>,
}

/// Everything the orchestrator owns about the remote session: connection,
/// loaded sessions, the active tree, the selected node's transcript and the
/// per-node scroll ledger.
///
/// Passed explicitly to every operation; there is no global view state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub connection: ConnectionState,

    /// Single user-visible error slot; every failed operation lands here
    pub error: Option<String>,

    /// Server version from the health check
    pub version: Option<String>,

    /// Flat list of every session the server reported
    pub sessions: Vec<SessionRecord>,

    pub agents: Vec<AgentInfo>,

    pub providers: Option<ProviderCatalog>,

    /// Root session whose tree is loaded
    pub selected_session: Option<SessionId>,

    pub tree: Option<TreeNode>,

    /// Bumped on every structural or field change of `tree`
    pub tree_version: u64,

    /// Node whose transcript is shown
    pub selected_node: Option<SessionId>,

    pub transcript: Transcript,

    /// Last scroll offset of every node that was left
    pub scroll_ledger: HashMap<SessionId, usize>,

    pub prompt_input: String,

    pub prompt: PromptSelection,

    pub show_thinking: bool,

    pub panels_swapped: bool,

    pub session_filter: String,

    pub model_filter: String,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.connection == ConnectionState::Connecting
    }

    pub fn root_sessions(&self) -> Vec<&SessionRecord> {
        root_sessions(&self.sessions)
    }

    /// Root sessions matching the session picker filter.
    pub fn filtered_sessions(&self) -> Vec<&SessionRecord> {
        filter_sessions(&self.root_sessions(), &self.session_filter)
    }

    pub fn filtered_models(&self) -> Vec<ModelOption> {
        filter_models(self.providers.as_ref(), &self.model_filter)
    }

    pub fn current_model_variants(&self) -> &[String] {
        match self.prompt.model.as_deref() {
            Some(model) => model_variants(self.providers.as_ref(), model),
            None => &[],
        }
    }

    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            agent: self.prompt.agent.clone(),
            model: self.prompt.model.clone(),
            variant: self.prompt.variant.clone(),
        }
    }

    /// Full teardown after a disconnect.
    ///
    /// Prompt selection, toggles, filters and the scroll ledger survive so a
    /// reconnect picks up where the user left off.
    pub fn reset(&mut self) {
        self.connection = ConnectionState::Disconnected;
        self.version = None;
        self.sessions.clear();
        self.selected_session = None;
        self.tree = None;
        self.tree_version += 1;
        self.selected_node = None;
        self.transcript.clear();
    }

    /// Main panels are shown once connected with a tree loaded.
    pub fn show_main_panels(&self) -> bool {
        self.is_connected() && self.tree.is_some()
    }

    pub fn show_empty_state(&self) -> bool {
        self.is_connected() && self.tree.is_none()
    }
}

/// Panel focus for the two-panel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelFocus {
    #[default]
    Tree,
    Transcript,
}

/// Where typed characters go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the prompt
    Prompt,
}

/// Popup pickers over the main layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Sessions,
    Models,
    Help,
}

/// Terminal-only state: focus, cursors and overlays.
#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: PanelFocus,

    pub mode: InputMode,

    pub overlay: Option<Overlay>,

    /// Highlighted entry in the open picker
    pub picker_cursor: usize,

    /// Highlighted row of the session tree
    pub tree_cursor: usize,

    /// Highlighted clickable task part in the transcript
    pub task_cursor: Option<usize>,

    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            focus: PanelFocus::Tree,
            mode: InputMode::Normal,
            overlay: None,
            picker_cursor: 0,
            tree_cursor: 0,
            task_cursor: None,
            should_quit: false,
        }
    }
}
