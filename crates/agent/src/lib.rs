//! Turn orchestration — the heart of Voyager.
//!
//! Every user message runs through a **route → look up → generate → verify**
//! pipeline:
//!
//! 1. **Classify** the message into a lookup (weather, attractions) or none
//! 2. **Dispatch** the lookup and format its result as a transient note
//! 3. **Assemble** persona + reasoning directive + note + windowed history
//! 4. **Generate** a streamed draft, forwarding fragments to an output sink
//! 5. **Verify** the draft and commit the verified text to history
//!
//! One `TurnOrchestrator` owns one conversation. Turns are sequential.

pub mod classifier;
pub mod context;
pub mod orchestrator;
pub mod prompts;
pub mod stream_event;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::{IntentClassifier, parse_decision};
pub use context::ContextStore;
pub use orchestrator::{
    OrchestratorSettings, TurnError, TurnOrchestrator, TurnOutcome, TurnPhase, load_persona,
};
pub use stream_event::{NullSink, OutputSink, TurnEvent};
pub use verifier::{VerificationOutcome, Verifier};
