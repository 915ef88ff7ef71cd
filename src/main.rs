use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chatrelay::commands;
use chatrelay::config::{Config, ENDPOINT_ENV};

#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Chat with a hosted product advisor from the terminal", long_about = None)]
struct Cli {
    /// Completion worker URL (overrides config and environment)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Maximum number of user/assistant turns sent with each request
    #[arg(long, global = true)]
    max_history: Option<usize>,

    /// Your name, shown on your messages and given to the advisor
    #[arg(long, global = true)]
    name: Option<String>,

    /// Path to the config file (default: ~/.chatrelay/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (the default)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        /// The question to send
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli, path: &Path) -> Result<Config> {
    let mut config = match &cli.config {
        Some(_) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(std::env::var(ENDPOINT_ENV).ok());
            config
        }
        None => Config::load()?,
    };

    config.apply_overrides(cli.endpoint.clone(), cli.max_history, cli.name.clone())?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    match &cli.command {
        None | Some(Commands::Chat) => {
            let config = load_config(&cli, &config_path)?;
            commands::start_chat(&config).await
        }
        Some(Commands::Ask { question }) => {
            let config = load_config(&cli, &config_path)?;
            commands::ask(&config, &question.join(" ")).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                let config = load_config(&cli, &config_path)?;
                commands::show_config(&config)
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigAction::Init { force } => {
                commands::init_config(&config_path, cli.endpoint.clone(), *force)
            }
        },
    }
}
