//! Serenity event handler: turns channel messages into commands.

use {
    async_trait::async_trait,
    serenity::all::{Context, EventHandler, Message, Ready},
    tracing::{debug, info},
};

use crate::{
    commands::{Command, CommandRouter},
    sink::ChannelSink,
};

/// Gateway event handler for the watcher bot.
pub struct BotHandler {
    pub router: CommandRouter,
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "discord bot connected");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(cmd) = Command::parse(self.router.prefix(), &msg.content) else {
            return;
        };

        debug!(command = ?cmd, channel_id = %msg.channel_id, "dispatching command");
        // Replies go to the channel the command came from.
        let reply = ChannelSink::new(ctx.http.clone(), msg.channel_id);
        self.router.dispatch(cmd, &reply).await;
    }
}
