//! Shared application state for kestra-slackbot.
//!
//! [`AppState`] is the central state container passed (as `Arc<AppState>`)
//! to the webhook layer and every handler. It is built once at startup;
//! apart from the background task tracker, nothing in it changes.

use tokio_util::task::TaskTracker;
use tracing::info;

use crate::config::ServerConfig;
use crate::kestra::KestraClient;
use crate::slack_client::SlackClient;

/// Shared application state, passed as `Arc<AppState>` to all handlers.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use kestra_slackbot::config::ServerConfig;
/// use kestra_slackbot::state::AppState;
///
/// let env = HashMap::from([
///     ("SLACK_BOT_TOKEN", "xoxb-test"),
///     ("SLACK_SIGNING_SECRET", "secret"),
///     ("SLACK_BOT_USER_ID", "U123"),
///     ("KESTRA_API_TOKEN", "kestra-token"),
///     ("KESTRA_SERVER_URL", "http://localhost:8080"),
///     ("KESTRA_TENANT_ID", "main"),
/// ]);
/// let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
/// let state = AppState::new(config);
/// assert_eq!(state.config().slack.bot_user_id, "U123");
/// ```
#[derive(Debug)]
pub struct AppState {
    config: ServerConfig,
    slack: SlackClient,
    kestra: KestraClient,
    tasks: TaskTracker,
}

impl AppState {
    /// Creates the application state and its API clients from configuration.
    pub fn new(config: ServerConfig) -> Self {
        let slack = SlackClient::new(
            config.slack.bot_token.clone(),
            config.slack.api_base.clone(),
        );
        let kestra = KestraClient::new(config.kestra.clone());
        Self {
            config,
            slack,
            kestra,
            tasks: TaskTracker::new(),
        }
    }

    /// Returns the immutable server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns a reference to the Slack Web API client.
    pub fn slack(&self) -> &SlackClient {
        &self.slack
    }

    /// Returns a reference to the Kestra API client.
    pub fn kestra(&self) -> &KestraClient {
        &self.kestra
    }

    /// Returns the tracker for handler tasks spawned after acknowledgment.
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }

    /// Stops accepting new handler tasks and waits for in-flight ones.
    ///
    /// Called after the listener has shut down so a resume already sent to
    /// Kestra still gets its thread reply.
    pub async fn drain(&self) {
        self.tasks.close();
        info!(pending = self.tasks.len(), "Waiting for in-flight handlers");
        self.tasks.wait().await;
    }
}
