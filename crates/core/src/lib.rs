//! # Voyager Core
//!
//! Domain types, traits, and error definitions for the Voyager travel
//! assistant. This crate defines the model every other crate builds on:
//! conversation turns, the generation backend trait, the closed tool set,
//! routing decisions, and the per-turn trace log.
//!
//! ## Design Philosophy
//!
//! External collaborators (the LLM backend, data lookups, trace sinks) are
//! described here as traits or plain data. Implementations live in their
//! respective crates, so the orchestration core can be tested against
//! scripted stand-ins.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod routing;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use event::{JsonFileExporter, TraceEntry, TraceEvent, TraceExporter, TraceLog};
pub use message::{Role, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ResponseFormat, StreamChunk};
pub use routing::{Route, RoutingDecision};
pub use tool::{
    AttractionList, LookupStatus, ToolInvocation, ToolKind, ToolOutput, WeatherReport,
};
