//! Command parsing and routing.
//!
//! The parser recognizes the prefix commands; everything else in the
//! channel is ignored. The router executes a command against the shared
//! tracker/poller and sends human-readable reply lines through a
//! per-message sink, so it stays testable without a gateway connection.

use std::sync::Arc;

use tracing::{info, warn};

use robwatch_tracker::{NotifySink, Poller, PresenceTracker, WatchError};

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Check,
    Status,
    AddUser(String),
    RemoveUser(String),
}

impl Command {
    /// Parse a message into a command.
    ///
    /// Returns `None` for messages without the prefix, unknown command
    /// names, and commands missing a required argument.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let mut parts = rest.split_whitespace();
        match parts.next()? {
            "help" => Some(Self::Help),
            "check" => Some(Self::Check),
            "status" => Some(Self::Status),
            "adduser" => parts.next().map(|name| Self::AddUser(name.to_string())),
            "removeuser" => parts.next().map(|name| Self::RemoveUser(name.to_string())),
            _ => None,
        }
    }
}

/// Executes commands against the shared tracker and poller.
pub struct CommandRouter {
    tracker: Arc<PresenceTracker>,
    poller: Arc<Poller>,
    prefix: String,
}

impl CommandRouter {
    pub fn new(tracker: Arc<PresenceTracker>, poller: Arc<Poller>, prefix: String) -> Self {
        Self {
            tracker,
            poller,
            prefix,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Execute `cmd`, sending reply lines through `reply`.
    pub async fn dispatch(&self, cmd: Command, reply: &dyn NotifySink) {
        match cmd {
            Command::Help => self.help(reply).await,
            Command::Check => self.check(reply).await,
            Command::Status => self.status(reply).await,
            Command::AddUser(name) => self.add_user(&name, reply).await,
            Command::RemoveUser(name) => self.remove_user(&name, reply).await,
        }
    }

    async fn help(&self, reply: &dyn NotifySink) {
        let p = &self.prefix;
        let text = format!(
            "Roblox presence watcher commands:\n\
             {p}help - show this message\n\
             {p}check - toggle automatic presence checks on or off\n\
             {p}status - show the last known state of every tracked player\n\
             {p}adduser <name> - start tracking a Roblox player\n\
             {p}removeuser <name> - stop tracking a Roblox player"
        );
        send_reply(reply, &text).await;
    }

    async fn check(&self, reply: &dyn NotifySink) {
        if self.tracker.is_empty().await {
            let text = format!(
                "No players are tracked yet. Add one with {}adduser <name>.",
                self.prefix
            );
            send_reply(reply, &text).await;
            return;
        }

        if self.poller.stop() {
            send_reply(reply, "Stopped automatic presence checks.").await;
            return;
        }

        send_reply(reply, "Starting automatic presence checks...").await;
        // Immediate pass with status reports, so the user gets feedback
        // before the first timer tick.
        self.tracker.poll_cycle(true).await;
        self.poller.start();
    }

    async fn status(&self, reply: &dyn NotifySink) {
        if !self.tracker.has_observations().await {
            let text = format!(
                "No presence data yet. Run {}check or wait for the next poll.",
                self.prefix
            );
            send_reply(reply, &text).await;
            return;
        }

        for entry in self.tracker.snapshot().await {
            let state = match entry.last_in_game {
                Some(true) => "in game",
                Some(false) => "not in game",
                None => "not yet observed",
            };
            let text = format!(
                "{}: last known state {state}, online notified: {}, offline notified: {}",
                entry.username,
                yes_no(entry.online_notified),
                yes_no(entry.offline_notified),
            );
            send_reply(reply, &text).await;
        }
    }

    async fn add_user(&self, name: &str, reply: &dyn NotifySink) {
        let text = match self.tracker.add_user(name).await {
            Ok(user_id) => {
                info!(user_id, username = name, "player added to watchlist");
                format!("Added {name} (ID: {user_id}) to the watchlist.")
            },
            Err(WatchError::AlreadyTracked) => format!("{name} is already being tracked."),
            Err(_) => format!("Could not find player {name}."),
        };
        send_reply(reply, &text).await;
    }

    async fn remove_user(&self, name: &str, reply: &dyn NotifySink) {
        let text = match self.tracker.remove_user(name).await {
            Ok(removal) => {
                info!(
                    user_id = removal.user_id,
                    username = name,
                    "player removed from watchlist"
                );
                if removal.watchlist_now_empty && self.poller.stop() {
                    info!("watchlist empty, automatic checks stopped");
                }
                format!("Removed {name} (ID: {}) from the watchlist.", removal.user_id)
            },
            Err(WatchError::NotTracked) => format!("{name} is not being tracked."),
            Err(_) => format!("Could not find player {name}."),
        };
        send_reply(reply, &text).await;
    }
}

async fn send_reply(reply: &dyn NotifySink, text: &str) {
    if let Err(e) = reply.send_line(text).await {
        warn!(error = %e, "failed to send command reply");
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
        time::Duration,
    };

    use {anyhow::Result, async_trait::async_trait};

    use {
        super::*,
        robwatch_tracker::{PresenceProvider, UserId},
    };

    struct StubProvider {
        names: HashMap<String, UserId>,
        in_game: Mutex<HashMap<UserId, bool>>,
    }

    impl StubProvider {
        fn new(names: &[(&str, UserId)]) -> Self {
            Self {
                names: names
                    .iter()
                    .map(|&(n, id)| (n.to_string(), id))
                    .collect(),
                in_game: Mutex::new(HashMap::new()),
            }
        }

        fn set_in_game(&self, user_id: UserId, in_game: bool) {
            self.in_game.lock().unwrap().insert(user_id, in_game);
        }
    }

    #[async_trait]
    impl PresenceProvider for StubProvider {
        async fn resolve_user_id(&self, username: &str) -> Option<UserId> {
            self.names.get(username).copied()
        }

        async fn fetch_presence(&self, ids: &[UserId]) -> HashMap<UserId, bool> {
            let in_game = self.in_game.lock().unwrap();
            ids.iter()
                .filter_map(|id| in_game.get(id).map(|&v| (*id, v)))
                .collect()
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        lines: Mutex<Vec<String>>,
    }

    impl CollectingSink {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotifySink for CollectingSink {
        async fn send_line(&self, text: &str) -> Result<()> {
            self.lines.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Fixture {
        router: CommandRouter,
        provider: Arc<StubProvider>,
        notify: Arc<CollectingSink>,
        poller: Arc<Poller>,
    }

    fn fixture(names: &[(&str, UserId)]) -> Fixture {
        let provider = Arc::new(StubProvider::new(names));
        let notify = Arc::new(CollectingSink::default());
        let tracker = Arc::new(PresenceTracker::new(
            Arc::clone(&provider) as Arc<dyn PresenceProvider>,
            Arc::clone(&notify) as Arc<dyn NotifySink>,
            50,
        ));
        let poller = Arc::new(Poller::new(Arc::clone(&tracker), Duration::from_secs(60)));
        Fixture {
            router: CommandRouter::new(tracker, Arc::clone(&poller), "!".into()),
            provider,
            notify,
            poller,
        }
    }

    #[test]
    fn parse_recognizes_commands() {
        assert_eq!(Command::parse("!", "!help"), Some(Command::Help));
        assert_eq!(Command::parse("!", "!check"), Some(Command::Check));
        assert_eq!(Command::parse("!", "!status"), Some(Command::Status));
        assert_eq!(
            Command::parse("!", "!adduser builderman"),
            Some(Command::AddUser("builderman".into()))
        );
        assert_eq!(
            Command::parse("!", "!removeuser builderman"),
            Some(Command::RemoveUser("builderman".into()))
        );
    }

    #[test]
    fn parse_ignores_noise() {
        assert_eq!(Command::parse("!", "hello there"), None);
        assert_eq!(Command::parse("!", "!unknown"), None);
        assert_eq!(Command::parse("!", "!adduser"), None);
        assert_eq!(Command::parse("!", "!removeuser"), None);
        assert_eq!(Command::parse("!", ""), None);
    }

    #[test]
    fn parse_honors_custom_prefix() {
        assert_eq!(Command::parse("?", "?help"), Some(Command::Help));
        assert_eq!(Command::parse("?", "!help"), None);
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let fx = fixture(&[]);
        let reply = CollectingSink::default();
        fx.router.dispatch(Command::Help, &reply).await;

        let lines = reply.lines();
        assert_eq!(lines.len(), 1);
        for name in ["!help", "!check", "!status", "!adduser", "!removeuser"] {
            assert!(lines[0].contains(name), "missing {name}");
        }
    }

    #[tokio::test]
    async fn add_remove_and_duplicate_replies() {
        let fx = fixture(&[("alice", 7)]);
        let reply = CollectingSink::default();

        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;
        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;
        fx.router
            .dispatch(Command::AddUser("ghost".into()), &reply)
            .await;
        fx.router
            .dispatch(Command::RemoveUser("alice".into()), &reply)
            .await;
        fx.router
            .dispatch(Command::RemoveUser("alice".into()), &reply)
            .await;

        let lines = reply.lines();
        assert_eq!(lines[0], "Added alice (ID: 7) to the watchlist.");
        assert_eq!(lines[1], "alice is already being tracked.");
        assert_eq!(lines[2], "Could not find player ghost.");
        assert_eq!(lines[3], "Removed alice (ID: 7) from the watchlist.");
        assert_eq!(lines[4], "alice is not being tracked.");
    }

    #[tokio::test]
    async fn check_requires_a_watchlist() {
        let fx = fixture(&[]);
        let reply = CollectingSink::default();
        fx.router.dispatch(Command::Check, &reply).await;

        assert!(reply.lines()[0].contains("No players are tracked yet"));
        assert!(!fx.poller.is_running());
    }

    #[tokio::test]
    async fn check_toggles_polling_with_immediate_report() {
        let fx = fixture(&[("alice", 7)]);
        fx.provider.set_in_game(7, true);
        let reply = CollectingSink::default();

        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;

        fx.router.dispatch(Command::Check, &reply).await;
        assert!(fx.poller.is_running());
        assert!(reply.lines().iter().any(|l| l.contains("Starting")));
        // The immediate pass went through the notification sink: an
        // online transition plus a status-report line.
        let notified = fx.notify.lines();
        assert!(notified.iter().any(|l| l == "alice is now in game"));
        assert!(notified.iter().any(|l| l.contains("profile")));

        fx.router.dispatch(Command::Check, &reply).await;
        assert!(!fx.poller.is_running());
        assert!(reply.lines().iter().any(|l| l.contains("Stopped")));
    }

    #[tokio::test]
    async fn removing_last_player_stops_polling() {
        let fx = fixture(&[("alice", 7), ("bob", 8)]);
        let reply = CollectingSink::default();

        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;
        fx.router
            .dispatch(Command::AddUser("bob".into()), &reply)
            .await;
        fx.router.dispatch(Command::Check, &reply).await;
        assert!(fx.poller.is_running());

        fx.router
            .dispatch(Command::RemoveUser("alice".into()), &reply)
            .await;
        assert!(fx.poller.is_running());

        fx.router
            .dispatch(Command::RemoveUser("bob".into()), &reply)
            .await;
        assert!(!fx.poller.is_running());
    }

    #[tokio::test]
    async fn failed_removal_leaves_poller_running() {
        let fx = fixture(&[("alice", 7), ("bob", 8)]);
        let reply = CollectingSink::default();

        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;
        fx.router.dispatch(Command::Check, &reply).await;
        assert!(fx.poller.is_running());

        // Resolvable but untracked name: NotTracked, no side effects.
        fx.router
            .dispatch(Command::RemoveUser("bob".into()), &reply)
            .await;
        assert!(fx.poller.is_running());
    }

    #[tokio::test]
    async fn status_reports_no_data_then_state() {
        let fx = fixture(&[("alice", 7)]);
        fx.provider.set_in_game(7, true);
        let reply = CollectingSink::default();

        fx.router
            .dispatch(Command::AddUser("alice".into()), &reply)
            .await;
        fx.router.dispatch(Command::Status, &reply).await;
        assert!(reply.lines().last().unwrap().contains("No presence data yet"));

        fx.router.dispatch(Command::Check, &reply).await;
        fx.router.dispatch(Command::Status, &reply).await;
        let last = reply.lines().last().unwrap().clone();
        assert!(last.contains("alice: last known state in game"));
        assert!(last.contains("online notified: yes"));
        assert!(last.contains("offline notified: no"));
    }
}
