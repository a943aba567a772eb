//! `voyager chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use voyager_agent::{OutputSink, TurnEvent, TurnOrchestrator, VerificationOutcome};
use voyager_config::AppConfig;
use voyager_core::event::JsonFileExporter;
use voyager_core::provider::Provider;

/// Prints fragments as they stream in.
struct TerminalSink;

impl OutputSink for TerminalSink {
    fn emit(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::ToolCall { invocation } => {
                eprintln!("  🔎 Looking up {} for {}...", invocation.kind(), invocation.city());
            }
            TurnEvent::Chunk { content } => {
                print!("{content}");
                let _ = std::io::stdout().flush();
            }
            _ => {}
        }
    }
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Fail early with setup help when no provider is usable
    let provider = match voyager_providers::build_from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            eprintln!("  Set one of these environment variables:");
            eprintln!("    GROQ_API_KEY=gsk_...        (recommended)");
            eprintln!("    VOYAGER_API_KEY=...         (any configured provider)");
            eprintln!();
            eprintln!("  Or add it to your config file:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            return Err("No usable provider. See above for setup instructions.".into());
        }
    };

    let mut orchestrator = TurnOrchestrator::from_config(provider.clone(), &config)?;

    match message {
        Some(msg) => {
            run_one(&mut orchestrator, &msg).await;
        }
        None => interactive(&mut orchestrator, &config, provider).await?,
    }

    if config.trace.enabled {
        let exporter = JsonFileExporter::new(config.trace_dir());
        let path = exporter.write(orchestrator.trace())?;
        eprintln!("  Trace saved to {}", path.display());
    }

    Ok(())
}

async fn interactive(
    orchestrator: &mut TurnOrchestrator,
    config: &AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tools: Vec<_> = orchestrator
        .tools()
        .kinds()
        .iter()
        .map(|k| k.name())
        .collect();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Voyager — Travel Assistant Chat       ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", provider.name());
    println!("  Model:     {}", config.model);
    println!("  Tools:     {}", tools.join(", "));
    println!("  Window:    {} exchanges", orchestrator.store().window());
    println!();
    println!("  Type your message and press Enter.");
    println!("  /persona <text> replaces the persona, /history shows the conversation.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if let Some(persona) = input.strip_prefix("/persona") {
            let persona = persona.trim();
            if persona.is_empty() {
                println!("  Current persona:\n{}\n", orchestrator.store().persona());
            } else {
                orchestrator.set_persona(persona);
                println!("  ✅ Persona updated.\n");
            }
            continue;
        }
        if input == "/history" {
            for turn in orchestrator.history() {
                println!("  [{}] {}", turn.role, turn.content);
            }
            println!();
            continue;
        }

        run_one(orchestrator, input).await;
    }

    println!();
    println!("  Safe travels! 🧳");
    println!();
    Ok(())
}

/// Run one turn and print the result. Failures show the apology text only.
async fn run_one(orchestrator: &mut TurnOrchestrator, input: &str) {
    println!();
    print!("  Assistant > ");
    let _ = std::io::stdout().flush();

    match orchestrator.run_turn(input, &mut TerminalSink).await {
        Ok(outcome) => {
            println!();
            // The streamed draft was replaced during review
            match &outcome.verification {
                VerificationOutcome::Passed(_) => {}
                VerificationOutcome::Rewritten(text) | VerificationOutcome::FailedClosed(text) => {
                    println!("\n  Assistant (reviewed) > {text}");
                }
            }
        }
        Err(e) => {
            println!();
            eprintln!("  {}", e.user_message());
        }
    }
    println!();
}
