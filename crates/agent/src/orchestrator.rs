//! The turn orchestrator — one conversation, one turn at a time.
//!
//! Each turn walks a fixed sequence of phases:
//!
//! 1. **Received** — user text is appended to the context store
//! 2. **Routed** — the classifier picks a lookup (or none)
//! 3. **Dispatched** or **Skipped** — the lookup runs and is formatted
//! 4. **Assembled** — persona, directive, transient tool note, history
//! 5. **Generating** — streamed call; fragments go to the sink as they arrive
//! 6. **Verifying** — one review call on the full draft
//! 7. **Committed** — the verified text becomes the assistant turn
//!
//! Nothing is appended for the assistant before verification completes, so
//! an interrupted stream leaves history exactly as it was after Received.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use voyager_config::AppConfig;
use voyager_core::error::ProviderError;
use voyager_core::event::{TraceEvent, TraceExporter, TraceLog};
use voyager_core::message::Turn;
use voyager_core::provider::{Provider, ProviderRequest};
use voyager_core::routing::RoutingDecision;
use voyager_tools::{ToolRegistry, format_output};

use crate::classifier::IntentClassifier;
use crate::context::ContextStore;
use crate::prompts::{GENERATION_APOLOGY, PERSONA, REASONING_DIRECTIVE};
use crate::stream_event::{OutputSink, TurnEvent};
use crate::verifier::{VerificationOutcome, Verifier};

/// Turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Received,
    Routed,
    Dispatched,
    Skipped,
    Assembled,
    Generating,
    Verifying,
    Committed,
}

/// A turn that ended without committing an assistant turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("generation failed: {0}")]
    Generation(#[from] ProviderError),

    #[error("generation produced an empty draft")]
    EmptyDraft,
}

impl TurnError {
    /// What to show the user instead of the raw error.
    pub fn user_message(&self) -> &'static str {
        GENERATION_APOLOGY
    }
}

/// Everything a completed turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The committed assistant text
    pub reply: String,
    pub decision: RoutingDecision,
    /// Formatted lookup fragment, if a lookup ran
    pub tool_context: Option<String>,
    /// Generation output before verification
    pub draft: String,
    pub verification: VerificationOutcome,
    /// Phases in the order they were entered
    pub phases: Vec<TurnPhase>,
}

/// Model and sampling settings for the three backend calls.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub model: String,
    pub classify_temperature: f32,
    pub response_temperature: f32,
    pub verify_temperature: f32,
    pub max_tokens: Option<u32>,
}

impl OrchestratorSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            classify_temperature: 0.0,
            response_temperature: 0.4,
            verify_temperature: 0.1,
            max_tokens: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            classify_temperature: config.generation.classify_temperature,
            response_temperature: config.generation.response_temperature,
            verify_temperature: config.generation.verify_temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Owns one conversation and runs its turns in sequence.
pub struct TurnOrchestrator {
    provider: Arc<dyn Provider>,
    settings: OrchestratorSettings,
    classifier: IntentClassifier,
    verifier: Verifier,
    tools: ToolRegistry,
    store: ContextStore,
    trace: TraceLog,
}

impl TurnOrchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: OrchestratorSettings,
        tools: ToolRegistry,
        store: ContextStore,
    ) -> Self {
        let classifier = IntentClassifier::new(provider.clone(), settings.model.clone())
            .with_temperature(settings.classify_temperature);
        let verifier = Verifier::new(provider.clone(), settings.model.clone())
            .with_temperature(settings.verify_temperature);

        Self {
            provider,
            settings,
            classifier,
            verifier,
            tools,
            store,
            trace: TraceLog::new(),
        }
    }

    /// Build a fresh conversation from config.
    ///
    /// Loads `conversation.persona_file` when set; otherwise the built-in
    /// persona is used.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        config: &AppConfig,
    ) -> voyager_core::Result<Self> {
        let window = NonZeroUsize::new(config.conversation.history_window).ok_or_else(|| {
            voyager_core::Error::Config {
                message: "conversation.history_window must be at least 1".into(),
            }
        })?;

        let persona = match &config.conversation.persona_file {
            Some(path) => load_persona(Path::new(path))?,
            None => PERSONA.to_string(),
        };

        Ok(Self::new(
            provider,
            OrchestratorSettings::from_config(config),
            ToolRegistry::from_config(&config.tools),
            ContextStore::new(persona, window),
        ))
    }

    /// Run one turn to completion.
    ///
    /// Classification and lookup failures degrade to a plain reply.
    /// Verification failures commit the inability message. Only generation
    /// failures return `Err`; the user turn stays in history and no
    /// assistant turn is added.
    pub async fn run_turn(
        &mut self,
        text: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<TurnOutcome, TurnError> {
        let mut phases = Vec::with_capacity(7);

        // ── Received ──
        self.trace.record(TraceEvent::UserInput { text: text.into() });
        self.store.add_user(text);
        enter(&mut phases, sink, TurnPhase::Received);

        // ── Routed ──
        let decision = self.classifier.classify(text).await;
        self.trace.record(TraceEvent::RouterDecision {
            decision: decision.clone(),
        });
        enter(&mut phases, sink, TurnPhase::Routed);

        // ── Dispatched | Skipped ──
        let invocation = decision
            .invocation()
            .filter(|inv| self.tools.supports(inv.kind()));

        let tool_context = match invocation {
            Some(invocation) => {
                enter(&mut phases, sink, TurnPhase::Dispatched);
                info!(tool = %invocation.kind(), city = invocation.city(), "Dispatching lookup");
                self.trace.record(TraceEvent::ToolCall {
                    invocation: invocation.clone(),
                });
                sink.emit(TurnEvent::ToolCall {
                    invocation: invocation.clone(),
                });

                match self.tools.dispatch(&invocation).await {
                    Some(output) => {
                        let context = format_output(&output);
                        sink.emit(TurnEvent::ToolResult {
                            tool: output.kind(),
                            status: output.status(),
                            context: context.clone(),
                        });
                        self.trace.record(TraceEvent::ToolRawOutput { output });
                        self.trace.record(TraceEvent::ToolFormattedContext {
                            text: context.clone(),
                        });
                        Some(context)
                    }
                    None => None,
                }
            }
            None => {
                debug!(tool = ?decision.tool, "No lookup for this turn");
                enter(&mut phases, sink, TurnPhase::Skipped);
                None
            }
        };

        // ── Assembled ──
        let prompt = self
            .store
            .assemble(REASONING_DIRECTIVE, tool_context.as_deref());
        debug!(
            turns = prompt.len(),
            est_tokens = prompt.iter().map(Turn::estimated_tokens).sum::<usize>(),
            "Prompt assembled"
        );
        self.trace.record(TraceEvent::PromptToLlm {
            messages: prompt.clone(),
        });
        enter(&mut phases, sink, TurnPhase::Assembled);

        // ── Generating ──
        enter(&mut phases, sink, TurnPhase::Generating);
        let draft = match self.generate(prompt, sink).await {
            Ok((draft, fragments)) => {
                self.trace.record(TraceEvent::DraftComplete {
                    text: draft.clone(),
                    fragments,
                });
                draft
            }
            Err(e) => {
                warn!(error = %e, "Generation failed, nothing committed");
                self.trace.record(TraceEvent::TurnFailed {
                    stage: "generating".into(),
                    error: e.to_string(),
                });
                sink.emit(TurnEvent::Error {
                    message: e.user_message().into(),
                });
                return Err(e);
            }
        };

        // ── Verifying ──
        enter(&mut phases, sink, TurnPhase::Verifying);
        let verification = self.verifier.verify(&draft).await;
        self.trace.record(TraceEvent::VerificationOutput {
            outcome: verification.as_str().into(),
            text: verification.text().into(),
        });
        sink.emit(TurnEvent::Verified {
            outcome: verification.as_str().into(),
            text: verification.text().into(),
        });

        // ── Committed ──
        let reply = verification.text().to_string();
        self.store.add_assistant(reply.clone());
        self.trace.record(TraceEvent::AssistantFinal {
            text: reply.clone(),
        });
        enter(&mut phases, sink, TurnPhase::Committed);

        info!(
            tool = ?decision.tool,
            verification = verification.as_str(),
            history = self.store.history().len(),
            "Turn committed"
        );

        Ok(TurnOutcome {
            reply,
            decision,
            tool_context,
            draft,
            verification,
            phases,
        })
    }

    /// Drain the generation stream into a draft, forwarding each fragment.
    async fn generate(
        &self,
        prompt: Vec<Turn>,
        sink: &mut dyn OutputSink,
    ) -> Result<(String, usize), TurnError> {
        let request = ProviderRequest::new(
            self.settings.model.clone(),
            prompt,
            self.settings.response_temperature,
        )
        .streaming()
        .with_max_tokens(self.settings.max_tokens);

        let mut stream_rx = self.provider.stream(request).await?;
        let mut draft = String::new();
        let mut fragments = 0usize;
        let mut finished = false;

        while let Some(chunk) = stream_rx.recv().await {
            let chunk = chunk?;
            if let Some(content) = chunk.content
                && !content.is_empty()
            {
                draft.push_str(&content);
                fragments += 1;
                sink.emit(TurnEvent::Chunk { content });
            }
            if chunk.done {
                finished = true;
                break;
            }
        }

        // A channel closed before the final chunk means a partial draft
        if !finished {
            return Err(ProviderError::StreamInterrupted(
                "stream closed before completion".into(),
            )
            .into());
        }

        if draft.trim().is_empty() {
            return Err(TurnError::EmptyDraft);
        }

        debug!(fragments, chars = draft.len(), "Draft complete");
        Ok((draft, fragments))
    }

    // ── Conversation state ──

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn history(&self) -> &[Turn] {
        self.store.history()
    }

    /// Replace the persona for all later turns.
    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.store.set_persona(persona);
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    /// Hand the event log to an exporter.
    pub fn export_trace(&self, exporter: &dyn TraceExporter) -> voyager_core::Result<()> {
        exporter.export(&self.trace)
    }
}

fn enter(phases: &mut Vec<TurnPhase>, sink: &mut dyn OutputSink, phase: TurnPhase) {
    debug!(?phase, "Turn phase");
    phases.push(phase);
    sink.emit(TurnEvent::Phase { phase });
}

/// Read a persona file. Blank files are rejected.
pub fn load_persona(path: &Path) -> voyager_core::Result<String> {
    let persona = std::fs::read_to_string(path)?;
    let persona = persona.trim();
    if persona.is_empty() {
        return Err(voyager_core::Error::Config {
            message: format!("persona file {} is empty", path.display()),
        });
    }
    Ok(persona.to_string())
}
