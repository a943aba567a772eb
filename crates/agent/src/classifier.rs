//! Intent classifier — one JSON-mode backend call per turn.
//!
//! Classification fails open: a backend error or any reply that is not a
//! well-formed decision yields `RoutingDecision::none()`, so the turn can
//! always continue as plain conversation.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use voyager_core::message::Turn;
use voyager_core::provider::{Provider, ProviderRequest};
use voyager_core::routing::{Route, RoutingDecision};

use crate::prompts::ROUTER_PROMPT;

pub struct IntentClassifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Decide which lookup, if any, this message needs. Never fails.
    pub async fn classify(&self, text: &str) -> RoutingDecision {
        let request = ProviderRequest::new(
            self.model.clone(),
            vec![Turn::system(ROUTER_PROMPT), Turn::user(text)],
            self.temperature,
        )
        .json();

        match self.provider.complete(request).await {
            Ok(response) => match parse_decision(&response.content) {
                Some(decision) => {
                    debug!(tool = ?decision.tool, argument = ?decision.argument, "Routed");
                    decision
                }
                None => {
                    warn!("Classifier reply was not a valid decision, continuing without a tool");
                    debug!(reply = %response.content, "Rejected classifier reply");
                    RoutingDecision::none()
                }
            },
            Err(e) => {
                warn!(error = %e, "Classifier call failed, continuing without a tool");
                RoutingDecision::none()
            }
        }
    }
}

/// Parse a classifier reply.
///
/// Accepts `{"tool": ..., "location": ...}` (or `"argument"`). Returns `None`
/// for malformed JSON, a missing or non-string `tool`, or a tool outside the
/// closed set. A no-tool decision never carries an argument.
pub fn parse_decision(reply: &str) -> Option<RoutingDecision> {
    let value: Value = serde_json::from_str(extract_object(reply)?).ok()?;
    let object = value.as_object()?;

    let route = Route::parse(object.get("tool")?.as_str()?)?;
    if route == Route::None {
        return Some(RoutingDecision::none());
    }

    let argument = object
        .get("location")
        .and_then(Value::as_str)
        .or_else(|| object.get("argument").and_then(Value::as_str))
        .map(str::to_string);

    Some(RoutingDecision::new(route, argument))
}

/// The outermost `{...}` span, tolerating code fences or stray prose.
fn extract_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}
