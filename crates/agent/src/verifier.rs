//! Verification pass — a second look at the draft before it is committed.
//!
//! Fails closed: if the review call errors or comes back empty, the
//! outcome carries the fixed inability message, never the unchecked draft.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use voyager_core::message::Turn;
use voyager_core::provider::{Provider, ProviderRequest};

use crate::prompts::{INABILITY_MESSAGE, VERIFICATION_PROMPT};

/// How verification ended. Every variant carries the text to commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "text", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The reviewer returned the draft unchanged
    Passed(String),
    /// The reviewer returned a corrected answer
    Rewritten(String),
    /// The review could not run; carries the inability message
    FailedClosed(String),
}

impl VerificationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Passed(t) | Self::Rewritten(t) | Self::FailedClosed(t) => t,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed(_) => "passed",
            Self::Rewritten(_) => "rewritten",
            Self::FailedClosed(_) => "failed_closed",
        }
    }
}

pub struct Verifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl Verifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Review `draft` with one non-streamed call.
    pub async fn verify(&self, draft: &str) -> VerificationOutcome {
        let request = ProviderRequest::new(
            self.model.clone(),
            vec![Turn::system(VERIFICATION_PROMPT), Turn::user(draft)],
            self.temperature,
        );

        let reviewed = match self.provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(error = %e, "Verification call failed, withholding draft");
                return VerificationOutcome::FailedClosed(INABILITY_MESSAGE.into());
            }
        };

        let reviewed = reviewed.trim();
        if reviewed.is_empty() {
            warn!("Verification returned nothing, withholding draft");
            return VerificationOutcome::FailedClosed(INABILITY_MESSAGE.into());
        }

        if reviewed == draft.trim() {
            debug!("Draft passed verification");
            VerificationOutcome::Passed(reviewed.to_string())
        } else {
            debug!(draft_len = draft.len(), final_len = reviewed.len(), "Draft rewritten");
            VerificationOutcome::Rewritten(reviewed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;

    #[tokio::test]
    async fn unchanged_draft_passes() {
        let provider = Arc::new(ScriptedProvider::new().reply("  Tokyo is 22°C today.\n"));
        let verifier = Verifier::new(provider.clone(), "m");

        let outcome = verifier.verify("Tokyo is 22°C today.").await;
        assert_eq!(outcome, VerificationOutcome::Passed("Tokyo is 22°C today.".into()));

        let request = &provider.requests()[0];
        assert!(!request.stream);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.messages[1], Turn::user("Tokyo is 22°C today."));
    }

    #[tokio::test]
    async fn changed_text_is_rewrite() {
        let provider = Arc::new(ScriptedProvider::new().reply("Paris is lovely in spring."));
        let outcome = Verifier::new(provider, "m")
            .verify("Paris has 40 million museums.")
            .await;
        assert_eq!(outcome.as_str(), "rewritten");
        assert_eq!(outcome.text(), "Paris is lovely in spring.");
    }

    #[tokio::test]
    async fn backend_error_fails_closed() {
        let provider = Arc::new(ScriptedProvider::new().fail("timeout"));
        let outcome = Verifier::new(provider, "m").verify("unchecked draft").await;
        assert_eq!(outcome, VerificationOutcome::FailedClosed(INABILITY_MESSAGE.into()));
        assert_ne!(outcome.text(), "unchecked draft");
    }

    #[tokio::test]
    async fn empty_review_fails_closed() {
        let provider = Arc::new(ScriptedProvider::new().reply("   "));
        let outcome = Verifier::new(provider, "m").verify("draft").await;
        assert_eq!(outcome.as_str(), "failed_closed");
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(VerificationOutcome::Passed("ok".into())).unwrap();
        assert_eq!(json["outcome"], "passed");
        assert_eq!(json["text"], "ok");
    }
}
