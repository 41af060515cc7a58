//! Chat widget core: conversation state machine, action catalog, backend client.
//!
//! DESIGN
//! ======
//! The state machine in [`conversation`] is sans-IO: `submit` hands back a
//! [`conversation::Query`] and `apply` consumes it together with the backend
//! outcome. [`session::ChatSession`] is the thin async driver that pairs the
//! two with a [`api::ChatBackend`] and forwards [`event::ViewEvent`]s to
//! whatever presentation layer is listening.
//!
//! Nothing here renders. The host decides how messages, the busy indicator,
//! and surfaced actions are drawn.

pub mod action;
pub mod api;
pub mod config;
pub mod conversation;
pub mod event;
pub mod message;
pub mod session;

pub use action::{ActionDetails, ActionKind, resolve};
pub use api::{ApiError, ChatBackend, HttpBackend, QueryResponse};
pub use config::{ChatConfig, ConfigError};
pub use conversation::{ConversationState, Query, Status, SubmitRejected};
pub use event::ViewEvent;
pub use message::{Message, Sender};
pub use session::ChatSession;
