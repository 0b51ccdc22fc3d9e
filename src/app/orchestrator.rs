//! Session orchestrator: owns the client handle, the live stream and the
//! [`SessionContext`], and runs every user-facing operation against them.
//!
//! No public operation returns an error. Failures are logged and folded into
//! `SessionContext::error`, which the views display.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::api::{Connector, RemoteSource};
use crate::app::scroll::ScrollSurface;
use crate::app::state::{ConnectionState, SessionContext};
use crate::app::update::apply_stream_event;
use crate::error::{ApiError, ClientError};
use crate::event::AppEvent;
use crate::model::{Part, RawMessage, SessionId, SessionRecord};
use crate::presentation::task_session_id;
use crate::reconcile::normalize_history;
use crate::stream::{spawn_relay, StreamHandle, StreamMessage, StreamMessageKind};
use crate::tree;

/// A pending history fetch for a node selection.
///
/// Produced by [`Orchestrator::begin_select_node`]; the result is handed
/// back to [`Orchestrator::finish_select_node`] together with its epoch.
pub struct NodeLoad {
    epoch: u64,
    node_id: SessionId,
    api: Arc<dyn RemoteSource>,
}

impl NodeLoad {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn node_id(&self) -> &SessionId {
        &self.node_id
    }

    /// Run the fetch and wrap the result for the event loop.
    pub async fn fetch(self) -> AppEvent {
        let result = self.api.fetch_messages(&self.node_id).await;
        AppEvent::HistoryLoaded {
            epoch: self.epoch,
            node_id: self.node_id,
            result,
        }
    }
}

pub struct Orchestrator<S: ScrollSurface> {
    connector: Box<dyn Connector>,
    api: Option<Arc<dyn RemoteSource>>,
    ctx: SessionContext,
    surface: S,
    events: UnboundedSender<AppEvent>,
    stream: Option<StreamHandle>,
    /// Stamp of the most recent stream; relay messages with another stamp are stale
    connection_id: u64,
    /// Stamp of the most recent node selection
    node_epoch: u64,
}

impl<S: ScrollSurface> Orchestrator<S> {
    pub fn new(
        connector: impl Connector + 'static,
        surface: S,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            connector: Box::new(connector),
            api: None,
            ctx: SessionContext::new(),
            surface,
            events,
            stream: None,
            connection_id: 0,
            node_epoch: 0,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.ctx
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| !s.is_finished())
    }

    pub fn node_epoch(&self) -> u64 {
        self.node_epoch
    }

    fn api(&self) -> Result<Arc<dyn RemoteSource>, ClientError> {
        self.api.clone().ok_or(ClientError::NotConnected)
    }

    fn report(&mut self, error: ClientError) {
        warn!(error = %error, "operation failed");
        self.ctx.error = Some(error.to_string());
    }

    fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            debug!(connection = stream.connection(), "closing event stream");
            stream.close();
        }
    }

    // ========================================================================
    // CONNECTION
    // ========================================================================

    /// Health, sessions, optional catalogs, then the live stream.
    ///
    /// On failure the connection falls back to `Disconnected` with the error
    /// reported; values already assigned (such as the version) are kept.
    pub async fn connect(&mut self) {
        self.close_stream();
        self.ctx.connection = ConnectionState::Connecting;
        self.ctx.error = None;

        match self.try_connect().await {
            Ok(()) => {
                self.ctx.connection = ConnectionState::Connected;
                info!(
                    version = self.ctx.version.as_deref().unwrap_or("unknown"),
                    sessions = self.ctx.sessions.len(),
                    "connected"
                );
            }
            Err(e) => {
                self.close_stream();
                self.api = None;
                self.ctx.connection = ConnectionState::Disconnected;
                self.report(e);
            }
        }
    }

    async fn try_connect(&mut self) -> Result<(), ClientError> {
        let api = self.connector.connect()?;
        self.api = Some(Arc::clone(&api));

        let health = api.fetch_health().await?;
        self.ctx.version = health.version;
        self.ctx.sessions = api.fetch_sessions().await?;

        let capabilities = api.capabilities();
        if capabilities.agents {
            self.ctx.agents = api.fetch_agents().await?;
            if self.ctx.prompt.agent.is_none() {
                self.ctx.prompt.agent = self.ctx.agents.first().map(|a| a.name.clone());
            }
        }
        if capabilities.providers {
            self.ctx.providers = Some(api.fetch_providers().await?);
        }
        if capabilities.config {
            let config = api.fetch_config().await?;
            if !capabilities.agents {
                self.ctx.agents = config.agent_names();
            }
            if self.ctx.prompt.model.is_none() {
                self.ctx.prompt.model = config.model.filter(|m| !m.is_empty());
            }
            if self.ctx.prompt.variant.is_none() {
                self.ctx.prompt.variant = config.variant.filter(|v| !v.is_empty());
            }
        }
        if self.ctx.prompt.model.is_none() {
            self.ctx.prompt.model = self
                .ctx
                .providers
                .as_ref()
                .and_then(|p| p.default_model())
                .map(str::to_string);
        }

        let payloads = api.open_events().await?;
        self.connection_id += 1;
        self.stream = Some(spawn_relay(
            payloads,
            self.connection_id,
            self.events.clone(),
        ));
        Ok(())
    }

    /// Close the stream, drop the client, and clear everything fetched.
    pub fn disconnect(&mut self) {
        self.close_stream();
        self.api = None;
        self.node_epoch += 1;
        self.ctx.reset();
        info!("disconnected");
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Load the full tree under `id` and select its root.
    ///
    /// An id absent from the loaded session list is reported and leaves the
    /// current tree in place.
    pub async fn select_session(&mut self, id: SessionId) {
        self.ctx.error = None;
        if let Err(e) = self.try_select_session(id).await {
            self.report(e);
        }
    }

    async fn try_select_session(&mut self, id: SessionId) -> Result<(), ClientError> {
        let api = self.api()?;
        let mut root = self
            .ctx
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ClientError::SessionNotFound(id.clone()))?;
        // The selected record roots the tree even when it has a parent itself.
        root.parent_id = None;
        root.legacy_parent_id = None;

        let descendants = load_descendants(api.as_ref(), &id).await?;
        let mut records = Vec::with_capacity(descendants.len() + 1);
        records.push(root);
        records.extend(descendants);

        self.ctx.selected_session = Some(id.clone());
        self.ctx.tree = tree::build(&records);
        self.ctx.tree_version += 1;
        debug!(session_id = %id, sessions = records.len(), "session tree built");

        // A remembered position for the root, applied by select_node, takes precedence.
        self.surface.scroll_to_bottom(true);
        self.select_node(id).await;
        Ok(())
    }

    /// Sequential node selection: begin, fetch, finish.
    pub async fn select_node(&mut self, id: SessionId) {
        let Some(load) = self.begin_select_node(id) else {
            return;
        };
        if let AppEvent::HistoryLoaded {
            epoch,
            node_id,
            result,
        } = load.fetch().await
        {
            self.finish_select_node(epoch, node_id, result);
        }
    }

    /// Switch the selection to `id` and hand back the history fetch to run.
    ///
    /// Records the scroll offset of the node being left and clears the
    /// transcript. Returns `None` (with the error reported) when not connected.
    pub fn begin_select_node(&mut self, id: SessionId) -> Option<NodeLoad> {
        let api = match self.api() {
            Ok(api) => api,
            Err(e) => {
                self.report(e);
                return None;
            }
        };

        if let Some(previous) = self.ctx.selected_node.take() {
            let offset = self.surface.scroll_position();
            debug!(session_id = %previous, offset, "remembering scroll position");
            self.ctx.scroll_ledger.insert(previous, offset);
        }
        self.ctx.selected_node = Some(id.clone());
        self.ctx.transcript.clear();
        self.node_epoch += 1;

        Some(NodeLoad {
            epoch: self.node_epoch,
            node_id: id,
            api,
        })
    }

    /// Start a node selection whose history arrives later as
    /// [`AppEvent::HistoryLoaded`] on the event channel.
    pub fn select_node_in_background(&mut self, id: SessionId) {
        let Some(load) = self.begin_select_node(id) else {
            return;
        };
        let tx = self.events.clone();
        tokio::spawn(async move {
            let _ = tx.send(load.fetch().await);
        });
    }

    /// Apply a fetched history if it still belongs to the current selection.
    ///
    /// # Returns
    /// `true` when the result was current (applied or reported), `false`
    /// when a newer selection superseded it and it was dropped.
    pub fn finish_select_node(
        &mut self,
        epoch: u64,
        node_id: SessionId,
        result: Result<Vec<RawMessage>, ApiError>,
    ) -> bool {
        if epoch != self.node_epoch || self.ctx.selected_node.as_ref() != Some(&node_id) {
            debug!(session_id = %node_id, epoch, current = self.node_epoch, "dropping stale history");
            return false;
        }

        match result {
            Ok(raw) => {
                self.ctx.transcript.replace(normalize_history(raw));
                debug!(session_id = %node_id, messages = self.ctx.transcript.len(), "history loaded");
                if let Some(&offset) = self.ctx.scroll_ledger.get(&node_id) {
                    self.surface.restore_position(offset);
                }
            }
            Err(e) => self.report(e.into()),
        }
        true
    }

    /// Select the child session a task tool part spawned, if it has one.
    pub async fn handle_task_click(&mut self, part: &Part) {
        if let Some(id) = task_session_id(part) {
            self.select_node(id).await;
        }
    }

    // ========================================================================
    // PROMPT
    // ========================================================================

    /// Submit the pending input to the selected node.
    ///
    /// No-op without a selected node or with empty input. The input is
    /// cleared whether or not the request succeeds.
    pub async fn send_prompt(&mut self) {
        let Some(node_id) = self.ctx.selected_node.clone() else {
            return;
        };
        if self.ctx.prompt_input.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.ctx.prompt_input);
        let options = self.ctx.prompt_options();

        let result = match self.api() {
            Ok(api) => api
                .send_message(&node_id, &text, &options)
                .await
                .map_err(ClientError::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!(session_id = %node_id, "prompt sent"),
            Err(e) => self.report(e),
        }
    }

    /// Ask the server to stop the selected root session.
    pub async fn abort_session(&mut self) {
        let Some(session_id) = self.ctx.selected_session.clone() else {
            return;
        };
        let result = match self.api() {
            Ok(api) => api.abort_session(&session_id).await.map_err(ClientError::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!(session_id = %session_id, "abort requested"),
            Err(e) => self.report(e),
        }
    }

    // ========================================================================
    // LIVE EVENTS
    // ========================================================================

    /// Apply one relay message in arrival order.
    ///
    /// Messages from a superseded stream are dropped. Tree misses are logged,
    /// not reported: the server announces sessions outside the active tree.
    pub fn handle_stream_message(&mut self, message: StreamMessage) {
        let current = self.stream.as_ref().map(StreamHandle::connection);
        if current != Some(message.connection) {
            debug!(connection = message.connection, "dropping message from stale stream");
            return;
        }

        match message.kind {
            StreamMessageKind::Event(event) => {
                let event_type = event.event_type();
                if let Err(e) = apply_stream_event(&mut self.ctx, &mut self.surface, event) {
                    warn!(event_type, error = %e, "live event did not apply to the session tree");
                }
            }
            StreamMessageKind::Closed(e) => {
                self.stream = None;
                self.ctx.error = Some(format!("SSE connection lost: {e}"));
            }
        }
    }
}

/// Every descendant of `root`, fetched level by level without recursion.
///
/// Ids already seen are skipped so a cyclic answer cannot loop forever.
async fn load_descendants(
    api: &dyn RemoteSource,
    root: &SessionId,
) -> Result<Vec<SessionRecord>, ApiError> {
    let mut seen = HashSet::from([root.clone()]);
    let mut descendants = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(id) = pending.pop() {
        let children = api.fetch_session_children(&id).await?;
        for child in children {
            if seen.insert(child.id.clone()) {
                pending.push(child.id.clone());
                descendants.push(child);
            }
        }
    }
    Ok(descendants)
}
