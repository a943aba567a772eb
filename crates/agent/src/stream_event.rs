//! Turn-level streaming events and the sink that receives them.
//!
//! The orchestrator pushes `TurnEvent`s to an `OutputSink` in the order
//! they happen. Chunks arrive while generation is still running, so a
//! caller can display text before the turn commits.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use voyager_core::tool::{LookupStatus, ToolInvocation, ToolKind};

use crate::orchestrator::TurnPhase;

/// Events emitted while a turn runs.
///
/// - `phase`        — the turn moved to a new state
/// - `tool_call`    — a lookup is being dispatched
/// - `tool_result`  — the lookup finished and was formatted
/// - `chunk`        — partial text from generation
/// - `verified`     — the verification pass finished
/// - `error`        — the turn failed; no assistant turn was committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    Phase { phase: TurnPhase },

    ToolCall { invocation: ToolInvocation },

    ToolResult {
        tool: ToolKind,
        status: LookupStatus,
        context: String,
    },

    Chunk { content: String },

    Verified { outcome: String, text: String },

    Error { message: String },
}

impl TurnEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Phase { .. } => "phase",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Chunk { .. } => "chunk",
            Self::Verified { .. } => "verified",
            Self::Error { .. } => "error",
        }
    }
}

/// Order-preserving consumer of turn events. No backpressure.
pub trait OutputSink: Send {
    fn emit(&mut self, event: TurnEvent);
}

impl OutputSink for Vec<TurnEvent> {
    fn emit(&mut self, event: TurnEvent) {
        self.push(event);
    }
}

impl OutputSink for mpsc::UnboundedSender<TurnEvent> {
    fn emit(&mut self, event: TurnEvent) {
        // A closed receiver just means nobody is watching any more
        let _ = self.send(event);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _event: TurnEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_serialization() {
        let event = TurnEvent::Chunk {
            content: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"chunk""#));
        assert!(json.contains(r#""content":"Hello""#));
    }

    #[test]
    fn tool_result_serialization() {
        let event = TurnEvent::ToolResult {
            tool: ToolKind::Weather,
            status: LookupStatus::Mock,
            context: "Weather in Tokyo: 22°C, partly cloudy.".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_result");
        assert_eq!(json["tool"], "weather");
        assert_eq!(json["status"], "mock");
    }

    #[test]
    fn phase_event_type() {
        let event = TurnEvent::Phase {
            phase: TurnPhase::Generating,
        };
        assert_eq!(event.event_type(), "phase");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "generating");
    }

    #[test]
    fn vec_sink_preserves_order() {
        let mut sink: Vec<TurnEvent> = Vec::new();
        for piece in ["a", "b", "c"] {
            sink.emit(TurnEvent::Chunk {
                content: piece.into(),
            });
        }
        let text: String = sink
            .iter()
            .filter_map(|e| match e {
                TurnEvent::Chunk { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "abc");
    }

    #[tokio::test]
    async fn channel_sink_survives_closed_receiver() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        tx.emit(TurnEvent::Error {
            message: "boom".into(),
        });
        assert_eq!(rx.recv().await.unwrap().event_type(), "error");

        drop(rx);
        tx.emit(TurnEvent::Chunk {
            content: "ignored".into(),
        });
    }
}
