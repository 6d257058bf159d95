//! Channel sink: posts tracker notifications to Discord.

use std::sync::Arc;

use {
    anyhow::{Result, bail},
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serenity::all::{ChannelId, Http},
};

use robwatch_tracker::NotifySink;

use crate::config::DiscordConfig;

/// Posts plain-text lines to one Discord channel over the REST API.
pub struct ChannelSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelSink {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

/// Sink for the configured notification channel.
///
/// Uses its own `Http` handle so notifications can be posted before the
/// gateway connection is up.
pub fn notification_sink(config: &DiscordConfig) -> Result<ChannelSink> {
    if config.channel_id == 0 {
        bail!("discord notification channel id is required");
    }
    Ok(ChannelSink::new(
        Arc::new(Http::new(config.token.expose_secret())),
        ChannelId::new(config.channel_id),
    ))
}

#[async_trait]
impl NotifySink for ChannelSink {
    async fn send_line(&self, text: &str) -> Result<()> {
        self.channel_id.say(&self.http, text).await?;
        Ok(())
    }
}
