//! The presence tracker: poll cycles and the transition state machine.
//!
//! Each poll cycle partitions the watchlist into batches, fetches
//! presence for each batch, and applies the transition rule per observed
//! account. Two complementary latches per account make notification
//! delivery idempotent across cycles: "went online" fires once per play
//! session, "went offline" only after a confirmed prior online
//! observation.

use std::{collections::HashMap, sync::Arc};

use {tokio::sync::RwLock, tracing::warn};

use crate::{
    error::WatchError,
    provider::PresenceProvider,
    sink::NotifySink,
    watchlist::{TrackedUser, UserId, Watchlist},
};

/// Read-only snapshot of one tracked account, for the `status` command.
#[derive(Debug, Clone)]
pub struct TrackedStatus {
    pub user_id: UserId,
    pub username: String,
    pub last_in_game: Option<bool>,
    pub online_notified: bool,
    pub offline_notified: bool,
}

/// Outcome of a successful [`PresenceTracker::remove_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub user_id: UserId,
    /// True when this removal emptied the watchlist; the command layer
    /// stops the poller on that signal.
    pub watchlist_now_empty: bool,
}

/// Notification fired by one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Online,
    Offline,
}

/// Apply one observation to a record and report the transition, if any.
///
/// The two latches are complementary: whichever rule fires clears the
/// other latch, re-arming it for the opposite transition. The offline
/// rule additionally requires a prior `true` observation, so an account
/// first seen offline stays silent. `last_in_game` is recorded
/// unconditionally, after the rules.
fn apply_observation(user: &mut TrackedUser, in_game: bool) -> Option<Transition> {
    let fired = if in_game && !user.online_notified {
        user.online_notified = true;
        user.offline_notified = false;
        Some(Transition::Online)
    } else if !in_game
        && user.last_in_game == Some(true)
        && !user.offline_notified
    {
        user.offline_notified = true;
        user.online_notified = false;
        Some(Transition::Offline)
    } else {
        None
    };
    user.last_in_game = Some(in_game);
    fired
}

fn profile_url(user_id: UserId) -> String {
    format!("https://www.roblox.com/users/{user_id}/profile")
}

/// The presence-tracking core.
///
/// All watchlist state lives behind one `RwLock`; remote calls and sink
/// sends run with the lock released, so command handlers and the poller
/// serialize on mutation and a presence result for an account removed
/// mid-cycle is dropped at apply time.
pub struct PresenceTracker {
    provider: Arc<dyn PresenceProvider>,
    sink: Arc<dyn NotifySink>,
    watchlist: RwLock<Watchlist>,
    batch_size: usize,
}

impl PresenceTracker {
    pub fn new(
        provider: Arc<dyn PresenceProvider>,
        sink: Arc<dyn NotifySink>,
        batch_size: usize,
    ) -> Self {
        Self {
            provider,
            sink,
            watchlist: RwLock::new(Watchlist::new()),
            batch_size: batch_size.max(1),
        }
    }

    /// Resolve `username` and add it to the watchlist.
    pub async fn add_user(&self, username: &str) -> Result<UserId, WatchError> {
        let user_id = self
            .provider
            .resolve_user_id(username)
            .await
            .ok_or(WatchError::NotFound)?;

        let mut watchlist = self.watchlist.write().await;
        watchlist.insert(user_id, username)?;
        Ok(user_id)
    }

    /// Resolve `username` and remove it, with all derived state.
    pub async fn remove_user(&self, username: &str) -> Result<Removal, WatchError> {
        let user_id = self
            .provider
            .resolve_user_id(username)
            .await
            .ok_or(WatchError::NotFound)?;

        let mut watchlist = self.watchlist.write().await;
        if watchlist.remove(user_id).is_none() {
            return Err(WatchError::NotTracked);
        }
        Ok(Removal {
            user_id,
            watchlist_now_empty: watchlist.is_empty(),
        })
    }

    pub async fn is_empty(&self) -> bool {
        self.watchlist.read().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.watchlist.read().await.len()
    }

    /// Whether any tracked account has been observed at least once.
    pub async fn has_observations(&self) -> bool {
        self.watchlist.read().await.has_observations()
    }

    /// Snapshot of every tracked account's state.
    pub async fn snapshot(&self) -> Vec<TrackedStatus> {
        self.watchlist
            .read()
            .await
            .iter()
            .map(|(user_id, user)| TrackedStatus {
                user_id,
                username: user.username.clone(),
                last_in_game: user.last_in_game,
                online_notified: user.online_notified,
                offline_notified: user.offline_notified,
            })
            .collect()
    }

    /// Run one full poll cycle over the watchlist.
    ///
    /// With `report_all` set, a status-report line is emitted for every
    /// observed account in addition to any transition notifications.
    pub async fn poll_cycle(&self, report_all: bool) {
        let ids = self.watchlist.read().await.ids();
        if ids.is_empty() {
            return;
        }

        for chunk in ids.chunks(self.batch_size) {
            let presences = self.provider.fetch_presence(chunk).await;
            let lines = self.apply_chunk(chunk, &presences, report_all).await;
            for line in &lines {
                if let Err(e) = self.sink.send_line(line).await {
                    warn!(error = %e, "failed to deliver notification");
                }
            }
        }
    }

    /// Apply one batch's observations under the write lock, collecting
    /// the lines to send once the lock is released.
    async fn apply_chunk(
        &self,
        chunk: &[UserId],
        presences: &HashMap<UserId, bool>,
        report_all: bool,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        let mut watchlist = self.watchlist.write().await;

        for &user_id in chunk {
            // Absent from the response: no observation this cycle.
            let Some(&in_game) = presences.get(&user_id) else {
                continue;
            };
            // Removed while the fetch was in flight.
            let Some(user) = watchlist.get_mut(user_id) else {
                continue;
            };

            let username = user.username.clone();
            match apply_observation(user, in_game) {
                Some(Transition::Online) => {
                    lines.push(format!("{username} is now in game"));
                },
                Some(Transition::Offline) => {
                    lines.push(format!("{username} is no longer in game"));
                },
                None => {},
            }

            if report_all {
                let state = if in_game { "in game" } else { "not in game" };
                lines.push(format!(
                    "{username} is currently {state}, profile: {}",
                    profile_url(user_id)
                ));
            }
        }

        lines
    }
}
