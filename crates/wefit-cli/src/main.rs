//! wefit CLI — interactive chat, bot mode, onboarding, and status.
//!
//! Usage:
//!   wefit chat                 — Start an interactive chat session
//!   wefit bot                  — Start the bot (Telegram/Discord)
//!   wefit onboard              — Create a default configuration
//!   wefit status               — Show current configuration and health
//!   wefit --character ehis.json chat

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use wefit_core::agent::AgentDispatcher;
use wefit_core::bus::events::InboundMessage;
use wefit_core::character::Character;
use wefit_core::config::Config;
use wefit_core::gateway::AgentBridge;
use wefit_core::plugin::registry::{build_plugins, PluginDeps};
use wefit_core::provider::openai::OpenAiProvider;
use wefit_core::provider::ChatProvider;

#[cfg(feature = "discord")]
use wefit_core::gateway::channels::discord::DiscordTransport;
#[cfg(feature = "telegram")]
use wefit_core::gateway::channels::telegram::TelegramTransport;

#[derive(Parser)]
#[command(
    name = "wefit",
    version,
    about = "A plugin-driven health & fitness AI assistant",
    long_about = "wefit — a plugin-driven assistant written in Rust.\n\nNASA imagery, drug-interaction lookups, medical imaging, and fitness coaching behind one chat interface."
)]
struct Cli {
    /// Path to a character JSON file (persona + plugin/client selection)
    #[arg(short, long, global = true)]
    character: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Start the bot in background mode (Telegram/Discord)
    Bot,

    /// Create or reset the default configuration
    Onboard,

    /// Show configuration status and health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let character = load_character(cli.character.as_deref())?;

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat(character).await?,
        Some(Commands::Bot) => cmd_bot(character).await?,
        Some(Commands::Onboard) => cmd_onboard()?,
        Some(Commands::Status) => cmd_status(&character)?,
    }

    Ok(())
}

fn load_character(path: Option<&std::path::Path>) -> Result<Character> {
    match path {
        Some(p) => Character::load_from(p),
        None => Ok(Character::default()),
    }
}

// ── Shared Setup ────────────────────────────────────────────────────

fn validate_config(config: &Config) -> Result<()> {
    if let Err(errors) = config.validate() {
        eprintln!("\n  \x1b[31m❌ Configuration errors:\x1b[0m");
        for e in &errors {
            eprintln!("     • {}", e);
        }
        eprintln!();
        anyhow::bail!("Fix the above {} error(s) in config.json", errors.len());
    }
    Ok(())
}

/// Build a fully wired dispatcher: plugins from the character's list,
/// plus the LLM fallback when a provider is configured.
fn setup_dispatcher(config: &Config, character: Character) -> Result<AgentDispatcher> {
    let deps = PluginDeps::from_config(config, &character);
    let plugins = build_plugins(&character.plugins, &deps)?;

    let provider: Option<Box<dyn ChatProvider>> =
        config.providers.find_active().map(|(name, entry)| {
            let model = entry
                .model
                .as_deref()
                .unwrap_or(&config.agents.defaults.model);
            Box::new(OpenAiProvider::new(
                name,
                &entry.api_key,
                entry.api_base.as_deref(),
                model,
                config.agents.defaults.max_tokens,
                config.agents.defaults.temperature,
                reqwest::Client::new(),
            )) as Box<dyn ChatProvider>
        });

    Ok(AgentDispatcher::new(character, plugins, provider))
}

// ── Bot Command ─────────────────────────────────────────────────────

async fn cmd_bot(character: Character) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let telegram_selected = character.has_client("telegram");
    let discord_selected = character.has_client("discord");
    let dispatcher = setup_dispatcher(&config, character)?;

    let (bus, receivers) = wefit_core::bus::MessageBus::new(100);
    let bus_arc = Arc::new(bus);

    let mut tasks = Vec::new();
    let inbound_rx = receivers.inbound_rx;

    // 1. Start transports FIRST so they register their outbound
    //    subscribers before the dispatch loop begins processing.

    #[cfg(feature = "telegram")]
    {
        if telegram_selected {
            if let Some(ref tel_config) = config.channels.telegram {
                if tel_config.enabled && !tel_config.token.is_empty() {
                    let transport = TelegramTransport::new(
                        tel_config.token.clone(),
                        Arc::clone(&bus_arc),
                        tel_config.allow_from.clone(),
                    );
                    tasks.push(tokio::spawn(async move {
                        if let Err(e) = transport.run().await {
                            tracing::error!("Telegram transport failed: {}", e);
                        }
                    }));
                }
            }
        }
    }

    #[cfg(feature = "discord")]
    {
        if discord_selected {
            if let Some(ref disc_config) = config.channels.discord {
                if disc_config.enabled && !disc_config.token.is_empty() {
                    let transport = DiscordTransport::new(
                        disc_config.token.clone(),
                        Arc::clone(&bus_arc),
                        disc_config.allow_from.clone(),
                    );
                    tasks.push(tokio::spawn(async move {
                        if let Err(e) = transport.run().await {
                            tracing::error!("Discord transport failed: {}", e);
                        }
                    }));
                }
            }
        }
    }

    #[cfg(not(feature = "telegram"))]
    let _ = telegram_selected;
    #[cfg(not(feature = "discord"))]
    let _ = discord_selected;

    if tasks.is_empty() {
        println!("  ⚠️ No bot channels enabled. Check the character's clients and config.json.");
        return Ok(());
    }

    // 2. Outbound dispatcher — uses the shared subscriber map
    let subs = bus_arc.subscribers();
    tasks.push(tokio::spawn(async move {
        wefit_core::bus::dispatch_outbound(subs, receivers.outbound_rx).await;
    }));

    // 3. Agent bridge with CancellationToken for graceful shutdown
    let cancel = CancellationToken::new();
    let bridge = AgentBridge::new(Arc::clone(&bus_arc), dispatcher, cancel.clone());
    tasks.push(tokio::spawn(async move {
        if let Err(e) = bridge.run(inbound_rx).await {
            tracing::error!("Agent bridge failed: {}", e);
        }
    }));

    println!("  🤖 wefit bot mode starting...");
    println!(
        "  Active channels: Telegram: {}, Discord: {}",
        config
            .channels
            .telegram
            .as_ref()
            .map_or(false, |c| c.enabled),
        config
            .channels
            .discord
            .as_ref()
            .map_or(false, |c| c.enabled)
    );
    println!("  Press Ctrl+C for graceful shutdown.");
    println!("  ─────────────────────────────────────");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\n  ⏳ Shutting down gracefully...");
            cancel.cancel();
        }
        _ = async { futures::future::join_all(tasks).await } => {
            // All tasks finished on their own.
        }
    }

    println!("  ✅ Shutdown complete.");
    Ok(())
}

// ── Chat Command ────────────────────────────────────────────────────

async fn cmd_chat(character: Character) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let name = character.name.clone();
    let plugin_names = character.plugins.join(", ");
    let dispatcher = setup_dispatcher(&config, character)?;

    println!();
    println!("  🤖 wefit v{}", env!("CARGO_PKG_VERSION"));
    println!("  Character: {} | Plugins: {}", name, plugin_names);
    println!("  Actions registered: {}", dispatcher.action_count());
    println!();
    println!("  Type your message, or /quit to exit.");
    println!("  ─────────────────────────────────────");
    println!();

    let stdin = io::stdin();
    loop {
        print!("  \x1b[36m>\x1b[0m ");
        io::stdout().flush()?;

        let mut input = String::new();
        stdin.read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" | "/q" => {
                println!("  Goodbye! 👋");
                break;
            }
            _ => {}
        }

        println!();
        let outcome = dispatcher.process(&InboundMessage::cli(input)).await;
        if outcome.success {
            println!("  \x1b[32m{}\x1b[0m\n", outcome.text);
        } else {
            println!("  \x1b[33m{}\x1b[0m\n", outcome.text);
        }
    }

    Ok(())
}

// ── Onboard Command ─────────────────────────────────────────────────

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!();
    println!("  ✅ Configuration created at:");
    println!("     {}", path.display());
    println!();
    println!("  Next steps:");
    println!("  1. Edit the config file and add your API keys and backend URLs");
    println!("  2. Run `wefit chat` to start chatting");
    println!();
    Ok(())
}

// ── Status Command ──────────────────────────────────────────────────

fn cmd_status(character: &Character) -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load()?;

    println!();
    println!("  🤖 wefit status");
    println!("  ─────────────────────────────────────");

    if config_path.exists() {
        println!("  Config:     {}", config_path.display());
    } else {
        println!("  Config:     ❌ Not found (run `wefit onboard`)");
        return Ok(());
    }

    println!("  Character:  {}", character.name);
    println!("  Plugins:    {}", character.plugins.join(", "));
    println!("  Clients:    {}", character.clients.join(", "));

    match config.providers.find_active() {
        Some((name, _)) => println!("  Provider:   ✅ {} configured (LLM fallback)", name),
        None => println!("  Provider:   — none (static fallback replies)"),
    }

    println!("  Users API:       {}", config.backends.users_api_url);
    println!("  Treatments API:  {}", config.backends.treatments_api_url);
    println!(
        "  Telegram:   {}",
        config
            .channels
            .telegram
            .as_ref()
            .map_or("not configured".to_string(), |c| if c.enabled {
                "enabled".to_string()
            } else {
                "disabled".to_string()
            })
    );
    println!(
        "  Discord:    {}",
        config
            .channels
            .discord
            .as_ref()
            .map_or("not configured".to_string(), |c| if c.enabled {
                "enabled".to_string()
            } else {
                "disabled".to_string()
            })
    );

    println!();
    Ok(())
}
