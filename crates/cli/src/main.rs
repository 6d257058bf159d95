//! robwatch: Roblox presence watcher for Discord.
//!
//! Polls the Roblox Presence API for a chat-managed watchlist of
//! accounts and posts a line to a Discord channel whenever one enters
//! or leaves a game.

use std::{sync::Arc, time::Duration};

use {
    anyhow::Result,
    clap::Parser,
    secrecy::Secret,
    tracing::info,
    tracing_subscriber::EnvFilter,
};

use {
    robwatch_discord::{DiscordConfig, notification_sink, run_bot},
    robwatch_roblox::RobloxClient,
    robwatch_tracker::{Poller, PresenceTracker},
};

#[derive(Debug, Parser)]
#[command(name = "robwatch", about = "Roblox presence watcher for Discord")]
struct Args {
    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: String,

    /// Channel that receives presence notifications.
    #[arg(long, env = "DISCORD_CHANNEL_ID")]
    discord_channel_id: u64,

    /// Seconds between poll cycles.
    #[arg(long, env = "CHECK_INTERVAL_SECS", default_value_t = 30)]
    check_interval_secs: u64,

    /// Maximum accounts per presence API call.
    #[arg(long, env = "PRESENCE_BATCH_SIZE", default_value_t = 50)]
    presence_batch_size: usize,

    /// Chat command prefix.
    #[arg(long, env = "COMMAND_PREFIX", default_value = "!")]
    command_prefix: String,

    /// Per-call timeout for Roblox API requests, in seconds.
    #[arg(long, env = "ROBLOX_TIMEOUT_SECS", default_value_t = 10)]
    roblox_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = DiscordConfig {
        token: Secret::new(args.discord_token),
        channel_id: args.discord_channel_id,
        command_prefix: args.command_prefix,
    };

    let roblox = RobloxClient::new(Duration::from_secs(args.roblox_timeout_secs))?;
    let sink = notification_sink(&config)?;
    let tracker = Arc::new(PresenceTracker::new(
        Arc::new(roblox),
        Arc::new(sink),
        args.presence_batch_size,
    ));
    let poller = Arc::new(Poller::new(
        Arc::clone(&tracker),
        Duration::from_secs(args.check_interval_secs),
    ));

    info!(
        interval_secs = args.check_interval_secs,
        batch_size = args.presence_batch_size,
        "starting robwatch"
    );
    run_bot(&config, tracker, poller).await
}
