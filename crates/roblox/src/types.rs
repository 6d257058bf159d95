//! Wire types for the Roblox Users and Presence APIs.

use serde::{Deserialize, Serialize};

use robwatch_tracker::UserId;

/// Production base URL for the Users API (username resolution).
pub const USERS_API_BASE: &str = "https://users.roblox.com";

/// Production base URL for the Presence API.
pub const PRESENCE_API_BASE: &str = "https://presence.roblox.com";

/// `userPresenceType` code for "in an experience". Every other code
/// (0 offline, 1 website, 3 studio) counts as not in game.
pub const PRESENCE_IN_GAME: i64 = 2;

/// Request body for `POST /v1/usernames/users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest<'a> {
    pub usernames: [&'a str; 1],
    pub exclude_banned_users: bool,
}

/// Response body for `POST /v1/usernames/users`.
#[derive(Debug, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub data: Vec<ResolvedUser>,
}

/// One match in a username lookup. Remaining response fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ResolvedUser {
    pub id: UserId,
}

/// Request body for `POST /v1/presence/users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRequest<'a> {
    pub user_ids: &'a [UserId],
}

/// Response body for `POST /v1/presence/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    #[serde(default)]
    pub user_presences: Vec<UserPresence>,
}

/// One account's presence entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresence {
    pub user_id: UserId,
    pub user_presence_type: i64,
}

impl UserPresence {
    /// Reduce the presence-type code to the in-game flag.
    pub fn in_game(&self) -> bool {
        self.user_presence_type == PRESENCE_IN_GAME
    }
}
