//! Discord layer for robwatch.
//!
//! Receives prefix commands via the serenity gateway, routes them to the
//! tracker/poller, and posts notification lines to the configured
//! channel through a `NotifySink` implementation.

pub mod bot;
pub mod commands;
pub mod config;
pub mod handler;
pub mod sink;

pub use {
    bot::run_bot,
    commands::{Command, CommandRouter},
    config::DiscordConfig,
    sink::{ChannelSink, notification_sink},
};
