//! Conversation context: history, persona, and prompt assembly.

pub mod store;

pub use store::{ContextStore, tool_context_note};
