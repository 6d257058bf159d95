use thiserror::Error;

/// Watchlist mutation errors, reported to users as command reply text.
///
/// Name resolution collapses "no such user" and transient API failures
/// into [`WatchError::NotFound`]; the Roblox client logs the underlying
/// cause at `warn` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchError {
    /// The username did not resolve to a user id.
    #[error("player not found")]
    NotFound,
    /// The resolved user id is already on the watchlist.
    #[error("player is already tracked")]
    AlreadyTracked,
    /// The resolved user id is not on the watchlist.
    #[error("player is not tracked")]
    NotTracked,
}
