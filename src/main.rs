use clap::{Parser, Subcommand};
use std::sync::Arc;

use music_club_bot::application::messaging::{MessageDispatcher, Outcome};
use music_club_bot::application::services::{replies, BackupService, CommandService, MembershipService};
use music_club_bot::domain::entities::ChatEvent;
use music_club_bot::domain::traits::{Bot, Store};
use music_club_bot::infrastructure::adapters::{event_from_line, ConsoleAdapter, TelegramAdapter};
use music_club_bot::application::errors::ConfigError;
use music_club_bot::infrastructure::config::{Adapter, Config, TelegramConfig};
use music_club_bot::infrastructure::database::Database;
use music_club_bot::infrastructure::storage::BackupStore;

/// Long-poll timeout for Telegram getUpdates
const POLL_TIMEOUT_SECS: i64 = 30;

#[derive(Parser)]
#[command(name = "music-club-bot")]
#[command(about = "Group chat assistant for a music club", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("music-club-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_env(config_path)?;

    if let Some(token) = token_override {
        config.adapters.telegram = Some(TelegramConfig {
            enabled: true,
            token: Some(token),
        });
    }

    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let config = match load_config(&config_path, token_override) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration in {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    let adapter = match config.adapter() {
        Ok(adapter) => adapter,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting {}", config.bot.name);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let config = Arc::new(config);
    rt.block_on(async {
        match adapter {
            Adapter::Telegram(token) => {
                let mut bot = TelegramAdapter::new(token);
                if let Err(e) = bot.fetch_bot_info().await {
                    tracing::error!("Failed to fetch bot info: {}", e);
                    return;
                }
                let bot = Arc::new(bot);
                let dispatcher = build_dispatcher(config.clone(), bot.clone());
                run_until_shutdown(&dispatcher, run_telegram_bot(&bot, &dispatcher, &config)).await;
            }
            Adapter::Console => {
                let bot = Arc::new(ConsoleAdapter::new());
                let dispatcher = build_dispatcher(config.clone(), bot.clone());
                run_until_shutdown(&dispatcher, run_console_bot(&bot, &dispatcher, &config)).await;
            }
        }
    });
}

/// Wire storage and services around the chosen transport
fn build_dispatcher(config: Arc<Config>, bot: Arc<dyn Bot>) -> MessageDispatcher {
    let db = match Database::new(&config.database.path) {
        Ok(db) => {
            tracing::info!("Database initialized at {}", config.database.path);
            db
        }
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn Store> = Arc::new(db);
    let backups = BackupService::new(
        store.clone(),
        config.backup.directory.as_ref().map(BackupStore::new),
    );
    let commands = CommandService::new(store, config.clone(), backups);
    let membership = MembershipService::new(bot.clone(), config.bot.name.clone());

    MessageDispatcher::new(&config, bot, commands, membership)
}

/// Run the event loop until it ends or Ctrl-C, then drop pending reminders
async fn run_until_shutdown(dispatcher: &MessageDispatcher, event_loop: impl std::future::Future<Output = ()>) {
    tokio::select! {
        _ = event_loop => {
            tracing::info!("Input closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down");
        }
    }

    dispatcher.membership().scheduler().shutdown();
}

async fn announce_start(bot: &dyn Bot, admin_chat: &str, bot_name: &str) {
    if let Err(e) = bot.send_message(admin_chat, &replies::started(bot_name)).await {
        tracing::warn!("Failed to send startup notice: {}", e);
    }
}

async fn handle_event(dispatcher: &MessageDispatcher, event: ChatEvent) {
    let kind = event.kind();
    match dispatcher.dispatch(event).await {
        Ok(Outcome::Ignored) => tracing::trace!("Ignored {}", kind),
        Ok(_) => {}
        Err(e) => tracing::error!("Failed to handle {}: {}", kind, e),
    }
}

async fn run_telegram_bot(bot: &Arc<TelegramAdapter>, dispatcher: &MessageDispatcher, config: &Config) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    announce_start(&**bot, &config.admin_phone(), &config.bot.name).await;

    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::debug!("Received {} updates", updates.len());
                }
                if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
                    offset = next;
                }
                for update in updates {
                    for event in update.into_events(&info.id) {
                        handle_event(dispatcher, event).await;
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: &Arc<ConsoleAdapter>, dispatcher: &MessageDispatcher, config: &Config) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    tracing::info!("Bot started: @{}", bot.bot_info().username);
    announce_start(&**bot, &config.admin_phone(), &config.bot.name).await;

    // Main loop (for console mode)
    while let Some(input) = bot.read_line("> ").await {
        if let Some(event) = event_from_line(&input, config) {
            handle_event(dispatcher, event).await;
        }
    }
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to render default config: {}", e);
            std::process::exit(1);
        }
    }
}
