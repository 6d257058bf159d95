//! The watchlist: one record per tracked account.
//!
//! A single map keyed by user id holds the display name, the last
//! observation, and both notification latches, so add/remove is atomic
//! across all per-account state.

use std::collections::HashMap;

use crate::error::WatchError;

/// Platform-assigned, stable numeric account id.
pub type UserId = u64;

/// Per-account tracking record.
#[derive(Debug, Clone)]
pub struct TrackedUser {
    pub username: String,
    /// Last observed in-game flag. `None` until the first observation.
    pub last_in_game: Option<bool>,
    /// Set once an online notification has been sent; cleared by the
    /// offline transition.
    pub online_notified: bool,
    /// Set once an offline notification has been sent; cleared by the
    /// online transition.
    pub offline_notified: bool,
}

impl TrackedUser {
    fn new(username: String) -> Self {
        Self {
            username,
            last_in_game: None,
            online_notified: false,
            offline_notified: false,
        }
    }
}

/// The set of tracked accounts.
#[derive(Debug, Default)]
pub struct Watchlist {
    users: HashMap<UserId, TrackedUser>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record for `user_id`.
    ///
    /// Rejects duplicates without mutating the existing record.
    pub fn insert(&mut self, user_id: UserId, username: &str) -> Result<(), WatchError> {
        if self.users.contains_key(&user_id) {
            return Err(WatchError::AlreadyTracked);
        }
        self.users.insert(user_id, TrackedUser::new(username.to_string()));
        Ok(())
    }

    /// Remove the whole record for `user_id`, if tracked.
    pub fn remove(&mut self, user_id: UserId) -> Option<TrackedUser> {
        self.users.remove(&user_id)
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Ids of all tracked accounts.
    pub fn ids(&self) -> Vec<UserId> {
        self.users.keys().copied().collect()
    }

    pub fn get(&self, user_id: UserId) -> Option<&TrackedUser> {
        self.users.get(&user_id)
    }

    pub fn get_mut(&mut self, user_id: UserId) -> Option<&mut TrackedUser> {
        self.users.get_mut(&user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, &TrackedUser)> {
        self.users.iter().map(|(&id, user)| (id, user))
    }

    /// Display name for `user_id`, falling back to the stringified id.
    pub fn display_name(&self, user_id: UserId) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| user_id.to_string())
    }

    /// Whether any tracked account has been observed at least once.
    pub fn has_observations(&self) -> bool {
        self.users.values().any(|u| u.last_in_game.is_some())
    }
}
