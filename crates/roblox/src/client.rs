//! The Roblox API client.
//!
//! Failures (transport errors, timeouts, non-success statuses) are
//! absorbed here and logged at `warn`: resolution degrades to `None`,
//! a presence batch degrades to an empty map. The tracker treats both
//! as "no data this call" and carries on.

use std::{collections::HashMap, time::Duration};

use {
    anyhow::{Result, bail},
    async_trait::async_trait,
    tracing::warn,
};

use robwatch_tracker::{PresenceProvider, UserId};

use crate::types::{
    PRESENCE_API_BASE, PresenceRequest, PresenceResponse, ResolveRequest, ResolveResponse,
    USERS_API_BASE,
};

/// Client for the Roblox Users and Presence APIs.
pub struct RobloxClient {
    http: reqwest::Client,
    users_base: String,
    presence_base: String,
}

impl RobloxClient {
    /// Client against the production endpoints with a per-call timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_urls(USERS_API_BASE, PRESENCE_API_BASE, timeout)
    }

    /// Client against custom base URLs (tests point this at a local
    /// mock server).
    pub fn with_base_urls(
        users_base: &str,
        presence_base: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            users_base: users_base.trim_end_matches('/').to_string(),
            presence_base: presence_base.trim_end_matches('/').to_string(),
        })
    }

    async fn try_resolve(&self, username: &str) -> Result<Option<UserId>> {
        let url = format!("{}/v1/usernames/users", self.users_base);
        let body = ResolveRequest {
            usernames: [username],
            exclude_banned_users: true,
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            bail!("username lookup returned {}", resp.status());
        }

        let parsed: ResolveResponse = resp.json().await?;
        Ok(parsed.data.first().map(|user| user.id))
    }

    async fn try_fetch(&self, ids: &[UserId]) -> Result<HashMap<UserId, bool>> {
        let url = format!("{}/v1/presence/users", self.presence_base);
        let body = PresenceRequest { user_ids: ids };

        let resp = self.http.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            bail!("presence lookup returned {}", resp.status());
        }

        let parsed: PresenceResponse = resp.json().await?;
        Ok(parsed
            .user_presences
            .iter()
            .map(|p| (p.user_id, p.in_game()))
            .collect())
    }
}

#[async_trait]
impl PresenceProvider for RobloxClient {
    async fn resolve_user_id(&self, username: &str) -> Option<UserId> {
        match self.try_resolve(username).await {
            Ok(found) => found,
            Err(e) => {
                warn!(username, error = %e, "username lookup failed");
                None
            },
        }
    }

    async fn fetch_presence(&self, ids: &[UserId]) -> HashMap<UserId, bool> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.try_fetch(ids).await {
            Ok(map) => map,
            Err(e) => {
                warn!(batch = ids.len(), error = %e, "presence lookup failed");
                HashMap::new()
            },
        }
    }
}
