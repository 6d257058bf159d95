//! Presence-tracking core for robwatch.
//!
//! Owns the watchlist of Roblox accounts, the online/offline transition
//! state machine, and the recurring poller. Remote lookups and chat
//! delivery are behind the [`PresenceProvider`] and [`NotifySink`] traits
//! so the concrete Roblox/Discord crates stay out of the core.

pub mod error;
pub mod poller;
pub mod provider;
pub mod sink;
pub mod tracker;
pub mod watchlist;

pub use {
    error::WatchError,
    poller::Poller,
    provider::PresenceProvider,
    sink::NotifySink,
    tracker::{PresenceTracker, Removal, TrackedStatus},
    watchlist::{TrackedUser, UserId, Watchlist},
};
