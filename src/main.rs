#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application layers:
//! - Domain: Configuration, Types, Errors
//! - Infrastructure: Matrix, Console, SQLite, Clock
//! - Application: Classifier, Ledger, Formatter, Router, Logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crate::application::ledger::Ledger;
use crate::application::router::CommandRouter;
use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::errors::ConfigError;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::console::{CONSOLE_ROOM_ID, ConsoleService};
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "hafalan", version, about = "Weekly Qur'an memorization ledger for santri")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Clone)]
enum Mode {
    /// Serve caretakers over Matrix (default)
    Serve,
    /// Chat with the bot on stdin/stdout
    Console,
    /// Dump stored records as JSON
    Export {
        /// Only this student's records
        #[arg(long)]
        student: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = cli.command.clone().unwrap_or(Mode::Serve);

    // 1. Load Configuration
    // A missing file is tolerated offline; the Matrix service needs it.
    let loaded = match AppConfig::load(&cli.config) {
        Err(ConfigError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound && !matches!(mode, Mode::Serve) =>
        {
            Ok(AppConfig::default())
        }
        other => other,
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging, matches!(mode, Mode::Serve))?;

    if let Err(e) = loaded {
        tracing::error!("Fatal configuration error: {}", e);
        return Err(e).context("Failed to load configuration");
    }

    // 3. Storage & Ledger
    let db_path = Path::new(&config.storage.database_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = Arc::new(
        SqliteStore::open(db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?,
    );
    let ledger = Arc::new(Ledger::new(
        store,
        Arc::new(SystemClock),
        config.ledger.query_order,
    ));

    let state = Arc::new(Mutex::new(BotState::default()));
    let router = Arc::new(CommandRouter::new(&config.classifier, ledger.clone(), state));

    match mode {
        Mode::Serve => serve(&config, router).await,
        Mode::Console => console(router).await,
        Mode::Export { student } => export(&ledger, student.as_deref()),
    }
}

async fn serve(config: &AppConfig, router: Arc<CommandRouter>) -> Result<()> {
    let credentials = match config.matrix_credentials() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Fatal configuration error: {}", e);
            return Err(e).context("Matrix service is not configured");
        }
    };

    let client = Client::builder()
        .homeserver_url(&credentials.homeserver)
        .build()
        .await
        .context("Failed to build Matrix client")?;

    client
        .matrix_auth()
        .login_username(&credentials.username, &credentials.password)
        .initial_device_display_name("hafalan")
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("Logged in as {}", credentials.username);

    if let Some(name) = config.services.matrix.as_ref().and_then(|m| m.display_name.clone()) {
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    let config = Arc::new(config.clone());
    let invite_config = config.clone();

    // Event Loop
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();
        let config = config.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if original_msg.sender == room.own_user_id() {
                return;
            }
            if !config.allows_room(room.room_id().as_str()) {
                return;
            }

            if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                let body = &text_content.body;
                tracing::info!("Received message from {}: {}", original_msg.sender, body);

                let chat = MatrixService::new(room);
                if let Err(e) = router
                    .route(&chat, body, original_msg.sender.as_str())
                    .await
                {
                    tracing::error!("Failed to route message: {}", e);
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(move |ev: StrippedRoomMemberEvent, room: Room| {
        let config = invite_config.clone();
        async move {
            if ev.content.membership != MembershipState::Invite {
                return;
            }
            if !config.allows_room(room.room_id().as_str()) {
                tracing::info!("Ignoring invite for room {} outside the allow-list", room.room_id());
                return;
            }
            tracing::info!("Received invite for room {}", room.room_id());
            if let Err(e) = room.join().await {
                tracing::warn!("Failed to join room after invite: {}", e);
            }
        }
    });

    tracing::info!("Starting sync loop...");
    client
        .sync(SyncSettings::default())
        .await
        .context("Matrix sync loop failed")?;
    Ok(())
}

async fn console(router: Arc<CommandRouter>) -> Result<()> {
    let chat = ConsoleService::new();
    router.route(&chat, "/start", CONSOLE_ROOM_ID).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if let Err(e) = router.route(&chat, &line, CONSOLE_ROOM_ID).await {
            tracing::error!("Failed to route message: {}", e);
        }
    }
    Ok(())
}

fn export(ledger: &Ledger, student: Option<&str>) -> Result<()> {
    let records = ledger.export(student)?;
    let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
    println!("{json}");
    Ok(())
}
