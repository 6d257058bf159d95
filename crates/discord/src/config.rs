use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Configuration for the Discord bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token from the Discord Developer Portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Channel that receives presence notifications.
    pub channel_id: u64,

    /// Prefix for chat commands.
    pub command_prefix: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("channel_id", &self.channel_id)
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            channel_id: 0,
            command_prefix: "!".into(),
        }
    }
}
