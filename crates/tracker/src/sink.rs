use {anyhow::Result, async_trait::async_trait};

/// Destination for notification and reply lines.
///
/// Delivery is best-effort: the tracker logs and swallows send errors
/// rather than failing a poll cycle.
#[async_trait]
pub trait NotifySink: Send + Sync {
    /// Post one plain-text line.
    async fn send_line(&self, text: &str) -> Result<()>;
}
