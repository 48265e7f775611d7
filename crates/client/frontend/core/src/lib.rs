//! Cross-frontend primitives for presenting the naming client.
//!
//! Houses message logging, event handling, and view-model types that the
//! terminal UI and any future graphical client can reuse.
pub mod config;
pub mod event;
pub mod format;
pub mod frontend;
pub mod message;
pub mod view_model;

pub use config::{FrontendConfig, MessageConfig};
pub use event::{EventConsumer, EventImpact, SessionConsumer};
pub use frontend::Frontend;
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use view_model::{PendingTransaction, ViewModel};
