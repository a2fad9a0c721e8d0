//! Bot layer - Discord-specific interface and command handlers
//!
//! This module exposes the core operations as Discord slash commands. It owns no business
//! rules of its own: every command parses its arguments, calls into `core`, and formats
//! the result.

/// Discord command implementations (splits, diaries, investments, account, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::Settings,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the loaded settings.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded from config.toml at startup
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}

/// Tells the user why a core operation was refused.
///
/// Domain failures (permissions, missing records, bad input, settled shares) become a
/// reply; anything else is passed back up to the framework error handler.
pub async fn reply_with_failure(
    ctx: poise::Context<'_, BotData, Error>,
    failure: Error,
) -> Result<()> {
    match failure {
        Error::PermissionDenied { .. }
        | Error::NotFound { .. }
        | Error::AmountMismatch { .. }
        | Error::InvalidStateTransition { .. }
        | Error::Validation { .. } => {
            ctx.say(format!("❌ {failure}")).await?;
            Ok(())
        }
        other => Err(other),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say("⚠️ Something went wrong while talking to the ledger. Please try again later.")
                .await
            {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework, registers all commands globally, and runs the client until
/// it shuts down.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::register(),
                commands::activity(),
                commands::invest(),
                commands::split(),
                commands::splits(),
                commands::settle(),
                commands::unsplit(),
                commands::balances(),
                commands::diary(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands globally");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
