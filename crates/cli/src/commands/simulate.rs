//! `voyager simulate` — Replay scripted conversations and save a report.
//!
//! Each conversation gets a fresh orchestrator, so no history leaks
//! between them. With `--analyze` the report is also sent to the model
//! for a markdown review.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use voyager_agent::prompts::{EVALUATOR_PROMPT, EVALUATOR_TEMPERATURE, GENERATION_APOLOGY};
use voyager_agent::{NullSink, TurnOrchestrator};
use voyager_config::AppConfig;
use voyager_core::event::JsonFileExporter;
use voyager_core::message::Turn;
use voyager_core::provider::{Provider, ProviderRequest};
use voyager_core::routing::Route;

/// Travel queries, ambiguous travel-like inputs, then off-topic redirects.
pub const CONVERSATIONS: &[&[&str]] = &[
    &[
        "Hi",
        "I want to go somewhere warm in March",
        "What should I pack?",
        "Any good food there?",
    ],
    &[
        "I'm visiting Tokyo next week",
        "What's the weather like?",
        "What are some attractions nearby?",
    ],
    &[
        "Planning a weekend trip to Paris",
        "Where should I stay?",
        "Any hidden gems I shouldn't miss?",
    ],
    &[
        "I want to relax",
        "Which destinations are best for beaches?",
        "How expensive is it?",
    ],
    &[
        "Give me ideas for a 3-day family trip in Italy",
        "Activities for kids?",
        "Where to base?",
    ],
    &[
        "I want pizza",
        "Where can I get good pizza while traveling?",
        "Anything else to do nearby?",
    ],
    &[
        "I'm bored",
        "What can I do in my area when traveling?",
        "Any recommended attractions?",
    ],
    &[
        "I'm cold",
        "Where is warm this time of year?",
        "Packing suggestions?",
    ],
    &[
        "Tell me a joke",
        "Okay but focus on travel",
        "Suggest a fun destination",
    ],
    &[
        "My cat is cute",
        "Anyway, back to travel... What's a good destination for nature lovers?",
    ],
];

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub timestamp: String,
    pub model: String,
    pub runs: Vec<ConversationRun>,
}

#[derive(Debug, Serialize)]
pub struct ConversationRun {
    pub id: usize,
    pub turns: Vec<TurnRecord>,
}

#[derive(Debug, Serialize)]
pub struct TurnRecord {
    pub user: String,
    pub assistant: String,
    pub tool: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_context: Option<String>,
    /// `passed`, `rewritten`, `failed_closed`, or `generation_failed`
    pub verification: String,
}

pub async fn run(out: PathBuf, analyze: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = voyager_providers::build_from_config(&config)?;

    println!("🧪 Running {} conversation simulations\n", CONVERSATIONS.len());
    let report = simulate(provider.clone(), &config, CONVERSATIONS).await?;

    std::fs::create_dir_all(&out)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let report_path = out.join(format!("simulation_{stamp}.json"));
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    println!("\n✅ Results saved to: {}", report_path.display());

    if analyze {
        println!("\n📊 Asking the model to review the conversations...");
        let review = analyze_report(provider.as_ref(), &config.model, &report).await?;
        let review_path = out.join(format!("simulation_analysis_{stamp}.md"));
        std::fs::write(&review_path, &review)?;
        println!("✅ Analysis saved to: {}", review_path.display());
    }

    Ok(())
}

/// Run every conversation on its own orchestrator.
pub async fn simulate(
    provider: Arc<dyn Provider>,
    config: &AppConfig,
    conversations: &[&[&str]],
) -> Result<SimulationReport, Box<dyn std::error::Error>> {
    let mut runs = Vec::with_capacity(conversations.len());

    for (i, conversation) in conversations.iter().enumerate() {
        println!("--- Conversation {} ---", i + 1);
        let mut orchestrator = TurnOrchestrator::from_config(provider.clone(), config)?;
        let mut turns = Vec::with_capacity(conversation.len());

        for &user in conversation.iter() {
            println!("  User: {user}");
            let record = match orchestrator.run_turn(user, &mut NullSink).await {
                Ok(outcome) => TurnRecord {
                    user: user.into(),
                    assistant: outcome.reply,
                    tool: outcome.decision.tool,
                    tool_context: outcome.tool_context,
                    verification: outcome.verification.as_str().into(),
                },
                Err(e) => {
                    tracing::warn!(conversation = i + 1, error = %e, "Simulated turn failed");
                    TurnRecord {
                        user: user.into(),
                        assistant: GENERATION_APOLOGY.into(),
                        tool: Route::None,
                        tool_context: None,
                        verification: "generation_failed".into(),
                    }
                }
            };
            println!("  Assistant: {}", record.assistant);
            turns.push(record);
        }

        if config.trace.enabled {
            JsonFileExporter::new(config.trace_dir()).write(orchestrator.trace())?;
        }

        runs.push(ConversationRun { id: i + 1, turns });
    }

    Ok(SimulationReport {
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        model: config.model.clone(),
        runs,
    })
}

/// Ask the model for a markdown review of the report.
pub async fn analyze_report(
    provider: &dyn Provider,
    model: &str,
    report: &SimulationReport,
) -> Result<String, Box<dyn std::error::Error>> {
    let request = ProviderRequest::new(
        model,
        vec![
            Turn::system(EVALUATOR_PROMPT),
            Turn::user(serde_json::to_string_pretty(report)?),
        ],
        EVALUATOR_TEMPERATURE,
    );
    let response = provider.complete(request).await?;
    Ok(response.content)
}
