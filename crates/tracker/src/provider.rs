use std::collections::HashMap;

use async_trait::async_trait;

use crate::watchlist::UserId;

/// Remote presence lookups, implemented by the Roblox API client.
///
/// Both calls absorb their own failures: a failed resolution is `None`
/// and a failed presence fetch is an empty map, so one bad batch never
/// aborts a poll cycle for the other batches.
#[async_trait]
pub trait PresenceProvider: Send + Sync {
    /// Resolve a username to its platform user id.
    async fn resolve_user_id(&self, username: &str) -> Option<UserId>;

    /// Fetch the in-game flag for one batch of user ids.
    ///
    /// Ids absent from the returned map had no observation this call;
    /// callers must not read absence as "offline".
    async fn fetch_presence(&self, ids: &[UserId]) -> HashMap<UserId, bool>;
}
