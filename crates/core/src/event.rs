//! Turn trace log — an ordered record of everything a conversation did.
//!
//! The orchestrator appends one `TraceEvent` per step. At the end of a
//! conversation the log can be handed to a `TraceExporter`; the bundled
//! `JsonFileExporter` writes it out as pretty-printed JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::message::Turn;
use crate::routing::RoutingDecision;
use crate::tool::{ToolInvocation, ToolOutput};

/// All events recorded during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Raw user text as received
    UserInput { text: String },

    /// The classifier's decision (after fail-open downgrade)
    RouterDecision { decision: RoutingDecision },

    /// A lookup is about to run
    ToolCall { invocation: ToolInvocation },

    /// The lookup's structured result
    ToolRawOutput { output: ToolOutput },

    /// The formatted fragment injected as transient context
    ToolFormattedContext { text: String },

    /// The assembled prompt sent for generation
    PromptToLlm { messages: Vec<Turn> },

    /// Generation drained; the full draft
    DraftComplete { text: String, fragments: usize },

    /// Verification result
    VerificationOutput { outcome: String, text: String },

    /// The text committed as the assistant turn
    AssistantFinal { text: String },

    /// A turn ended without committing an assistant turn
    TurnFailed { stage: String, error: String },
}

impl TraceEvent {
    /// Short event name, for logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserInput { .. } => "user_input",
            Self::RouterDecision { .. } => "router_decision",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolRawOutput { .. } => "tool_raw_output",
            Self::ToolFormattedContext { .. } => "tool_formatted_context",
            Self::PromptToLlm { .. } => "prompt_to_llm",
            Self::DraftComplete { .. } => "draft_complete",
            Self::VerificationOutput { .. } => "verification_output",
            Self::AssistantFinal { .. } => "assistant_final",
            Self::TurnFailed { .. } => "turn_failed",
        }
    }
}

/// A timestamped trace event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: TraceEvent,
}

/// Append-only event log for one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    /// Conversation identifier
    pub conversation_id: String,

    /// When the conversation started
    pub started_at: DateTime<Utc>,

    /// Events in recording order
    pub entries: Vec<TraceEntry>,
}

impl TraceLog {
    /// Start a new, empty log with a fresh conversation id.
    pub fn new() -> Self {
        Self {
            conversation_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Record one event.
    pub fn record(&mut self, event: TraceEvent) {
        debug!(event = event.event_type(), "trace");
        self.entries.push(TraceEntry {
            timestamp: Utc::now(),
            event,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination for a finished trace log.
pub trait TraceExporter: Send + Sync {
    fn export(&self, log: &TraceLog) -> Result<()>;
}

/// Writes each log as `trace_<timestamp>_<conversation>.json` in a directory.
pub struct JsonFileExporter {
    dir: PathBuf,
}

impl JsonFileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a given log.
    pub fn file_name(log: &TraceLog) -> String {
        format!(
            "trace_{}_{}.json",
            log.started_at.format("%Y-%m-%d_%H-%M-%S"),
            log.conversation_id
        )
    }

    /// Write the log and return the path written.
    pub fn write(&self, log: &TraceLog) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(log));
        let json = serde_json::to_string_pretty(log)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), events = log.len(), "Trace exported");
        Ok(path)
    }
}

impl TraceExporter for JsonFileExporter {
    fn export(&self, log: &TraceLog) -> Result<()> {
        self.write(log).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Route;

    #[test]
    fn log_preserves_order() {
        let mut log = TraceLog::new();
        log.record(TraceEvent::UserInput { text: "hi".into() });
        log.record(TraceEvent::RouterDecision {
            decision: RoutingDecision::none(),
        });
        log.record(TraceEvent::AssistantFinal { text: "hello".into() });

        let names: Vec<_> = log.entries().iter().map(|e| e.event.event_type()).collect();
        assert_eq!(names, vec!["user_input", "router_decision", "assistant_final"]);
    }

    #[test]
    fn entry_serializes_flat() {
        let mut log = TraceLog::new();
        log.record(TraceEvent::RouterDecision {
            decision: RoutingDecision::new(Route::Weather, Some("Tokyo".into())),
        });
        let json = serde_json::to_value(&log.entries()[0]).unwrap();
        assert_eq!(json["event"], "router_decision");
        assert_eq!(json["decision"]["tool"], "weather");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn json_exporter_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = JsonFileExporter::new(tmp.path().join("traces"));

        let mut log = TraceLog::new();
        log.record(TraceEvent::UserInput { text: "Is it raining?".into() });

        let path = exporter.write(&log).unwrap();
        assert!(path.exists());

        let parsed: TraceLog =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.conversation_id, log.conversation_id);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].event, log.entries[0].event);
    }
}
