//! Conversation turn types.
//!
//! A `Turn` is the unit that flows through the whole system: the context
//! store keeps them, the assembler projects them, and providers consume
//! them as chat messages.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, directives, tool context)
    System,
    /// The end user
    User,
    /// The travel assistant
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message.
///
/// Turns are values: once pushed into history they are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Turn {
    /// Create a turn with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Rough token estimate (4 chars ≈ 1 token, plus 4 tokens of framing).
    pub fn estimated_tokens(&self) -> usize {
        4 + self.content.len().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = Turn::user("Hello, Voyager!");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "Hello, Voyager!");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn turn_token_estimate() {
        // 20 chars ≈ 5 tokens + 4 framing
        assert_eq!(Turn::user("12345678901234567890").estimated_tokens(), 9);
        assert_eq!(Turn::system("").estimated_tokens(), 4);
    }
}
