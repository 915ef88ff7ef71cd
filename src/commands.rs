use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::path::Path;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::prompts::{ERROR_MESSAGE, NO_REPLY_MESSAGE};
use crate::repl::{self, Transcript};
use crate::session::{ChatSession, TurnOutcome};

/// Interactive chat on stdin/stdout
pub async fn start_chat(config: &Config) -> Result<()> {
    if !config.has_endpoint() {
        println!("⚠️  No endpoint configured. Run 'chatrelay config init' or set CHATRELAY_ENDPOINT_URL.");
    }

    let mut session = ChatSession::from_config(config, LlmClient::from_config(config));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut transcript = Transcript::interactive(io::stdout());

    repl::run_chat(&mut session, config, stdin, &mut transcript).await
}

/// Single question, single answer
pub async fn ask(config: &Config, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question cannot be empty");
    }

    let mut session = ChatSession::from_config(config, LlmClient::from_config(config));
    match session.submit(question).await {
        TurnOutcome::Replied(reply) => println!("{}", reply),
        TurnOutcome::NoReply => println!("{}", NO_REPLY_MESSAGE),
        TurnOutcome::Failed(e) => {
            eprintln!("{}", ERROR_MESSAGE);
            return Err(e).context("Completion request failed");
        }
        TurnOutcome::Ignored => {}
    }

    Ok(())
}

/// Print the effective configuration as TOML
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    print!("{}", content);
    io::stdout().flush()?;
    Ok(())
}

/// Write a default config file, optionally with an endpoint filled in
pub fn init_config(path: &Path, endpoint: Option<String>, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("❌ Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let config = Config {
        endpoint_url: endpoint,
        ..Config::default()
    };
    config.save_to(path)?;

    println!("✨ Wrote config to {}", path.display());
    if !config.has_endpoint() {
        println!("💡 Set endpoint_url to your deployed worker URL before chatting.");
    }
    Ok(())
}
