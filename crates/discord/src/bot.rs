//! Bot lifecycle: client construction and the run loop.

use std::sync::Arc;

use {
    anyhow::{Result, bail},
    secrecy::ExposeSecret,
    serenity::all::{Client, GatewayIntents},
    tracing::info,
};

use robwatch_tracker::{Poller, PresenceTracker};

use crate::{commands::CommandRouter, config::DiscordConfig, handler::BotHandler};

/// Build the serenity client and run it until disconnect or ctrl-c.
pub async fn run_bot(
    config: &DiscordConfig,
    tracker: Arc<PresenceTracker>,
    poller: Arc<Poller>,
) -> Result<()> {
    let token = config.token.expose_secret();
    if token.is_empty() {
        bail!("discord bot token is required");
    }
    if config.channel_id == 0 {
        bail!("discord notification channel id is required");
    }

    let handler = BotHandler {
        router: CommandRouter::new(tracker, poller, config.command_prefix.clone()),
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received, disconnecting");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await?;
    Ok(())
}
