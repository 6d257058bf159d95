//! Roblox API client for robwatch.
//!
//! Implements `PresenceProvider` over the Roblox Users and Presence
//! endpoints: username → id resolution and batched presence lookup.

pub mod client;
pub mod types;

pub use client::RobloxClient;
