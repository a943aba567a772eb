//! Routing decisions produced by the intent classifier.

use serde::{Deserialize, Serialize};

use crate::tool::{ToolInvocation, ToolKind};

/// The router's choice: one tool from the closed set, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Plain conversation, no lookup
    #[default]
    None,
    Weather,
    Attractions,
}

impl Route {
    /// Parse a router label. `"chat"` is accepted as a synonym for `"none"`.
    /// Anything outside the closed set yields `None` (the Option, not the route).
    pub fn parse(label: &str) -> Option<Route> {
        match label.trim().to_ascii_lowercase().as_str() {
            "none" | "chat" => Some(Route::None),
            "weather" => Some(Route::Weather),
            "attractions" => Some(Route::Attractions),
            _ => None,
        }
    }

    /// The tool this route names, if any.
    pub fn tool(&self) -> Option<ToolKind> {
        match self {
            Route::None => None,
            Route::Weather => Some(ToolKind::Weather),
            Route::Attractions => Some(ToolKind::Attractions),
        }
    }
}

impl From<ToolKind> for Route {
    fn from(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Weather => Route::Weather,
            ToolKind::Attractions => Route::Attractions,
        }
    }
}

/// Which tool to run this turn, and with what location.
///
/// Lives for a single turn only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub tool: Route,
    #[serde(default)]
    pub argument: Option<String>,
}

impl RoutingDecision {
    /// The fail-open default: no tool, no argument.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a decision, normalizing a blank argument to `None`.
    pub fn new(tool: Route, argument: Option<String>) -> Self {
        let argument = argument
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Self { tool, argument }
    }

    /// The invocation to dispatch, if the decision names a tool *and* a
    /// non-empty argument. A tool without an argument is treated as none.
    pub fn invocation(&self) -> Option<ToolInvocation> {
        let kind = self.tool.tool()?;
        let city = self.argument.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
        Some(kind.invoke(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_closed_set_and_chat_alias() {
        assert_eq!(Route::parse("weather"), Some(Route::Weather));
        assert_eq!(Route::parse(" Attractions "), Some(Route::Attractions));
        assert_eq!(Route::parse("chat"), Some(Route::None));
        assert_eq!(Route::parse("none"), Some(Route::None));
        assert_eq!(Route::parse("flights"), None);
        assert_eq!(Route::parse(""), None);
    }

    #[test]
    fn tool_without_argument_has_no_invocation() {
        let decision = RoutingDecision::new(Route::Weather, None);
        assert!(decision.invocation().is_none());

        let decision = RoutingDecision::new(Route::Weather, Some("   ".into()));
        assert_eq!(decision.argument, None);
        assert!(decision.invocation().is_none());
    }

    #[test]
    fn none_route_ignores_argument() {
        let decision = RoutingDecision::new(Route::None, Some("Paris".into()));
        assert!(decision.invocation().is_none());
    }

    #[test]
    fn tool_with_argument_dispatches() {
        let decision = RoutingDecision::new(Route::Weather, Some(" Tokyo ".into()));
        assert_eq!(
            decision.invocation(),
            Some(ToolInvocation::Weather { city: "Tokyo".into() })
        );
    }

    #[test]
    fn default_decision_serializes_as_none() {
        let json = serde_json::to_string(&RoutingDecision::none()).unwrap();
        assert_eq!(json, r#"{"tool":"none","argument":null}"#);
    }
}
