pub mod ids;
pub mod message;
pub mod provider;
pub mod serde_utils;
pub mod session;
pub mod theme;

pub use ids::{MessageId, PartId, SessionId};
pub use message::{
    Fields, Message, MessageInfo, MessageUpdatedEvent, Part, PartKind, PartPayload,
    PartUpdatedEvent, RawMessage, Role,
};
pub use provider::{AgentInfo, Health, ModelInfo, ModelOption, Provider, ProviderCatalog, RemoteConfig};
pub use session::{SessionRecord, SessionStatus, SessionTime};
pub use theme::Theme;
