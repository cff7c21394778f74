//! Server configuration types and loading.
//!
//! Defines [`ServerConfig`], built once at startup from environment
//! variables (optionally seeded from a `.env` file) and shared read-only
//! with every handler through [`AppState`](crate::state::AppState).

use std::fmt;

use tracing::info;

use crate::error::ServerError;

/// Default base URL for the Slack Web API.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Top-level server configuration.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use kestra_slackbot::config::ServerConfig;
///
/// let env = HashMap::from([
///     ("SLACK_BOT_TOKEN", "xoxb-test"),
///     ("SLACK_SIGNING_SECRET", "secret"),
///     ("SLACK_BOT_USER_ID", "U123"),
///     ("KESTRA_API_TOKEN", "kestra-token"),
///     ("KESTRA_SERVER_URL", "https://kestra.example.com"),
///     ("KESTRA_TENANT_ID", "main"),
/// ]);
///
/// let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
/// assert_eq!(config.slack.bot_user_id, "U123");
/// assert_eq!(config.kestra.tenant_id, "main");
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Slack credentials and identity.
    pub slack: SlackConfig,

    /// Kestra server location and credentials.
    pub kestra: KestraConfig,
}

/// Slack API configuration.
#[derive(Clone)]
pub struct SlackConfig {
    /// Bot User OAuth Token for Web API calls (`xoxb-...`).
    pub bot_token: String,

    /// Signing secret used to verify inbound webhook requests.
    pub signing_secret: String,

    /// The bot's own user id, as it appears in `<@...>` mentions.
    pub bot_user_id: String,

    /// Base URL for Web API calls. Overridable for tests and proxies.
    pub api_base: String,
}

/// Kestra API configuration.
#[derive(Clone)]
pub struct KestraConfig {
    /// Bearer token for the Kestra API.
    pub api_token: String,

    /// Base server URL, without trailing slash.
    pub server_url: String,

    /// Tenant id used in `/api/v1/{tenant}/...` paths.
    pub tenant_id: String,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .field("bot_user_id", &self.bot_user_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for KestraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KestraConfig")
            .field("api_token", &"<redacted>")
            .field("server_url", &self.server_url)
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is applied first when present;
    /// variables already set in the environment take precedence over it.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` naming the first required variable that
    /// is missing or empty.
    pub fn from_env() -> Result<Self, ServerError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` naming the first required variable that
    /// is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String, ServerError> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ServerError::Config(format!("{key} must be set"))),
            }
        };

        let slack = SlackConfig {
            bot_token: require("SLACK_BOT_TOKEN")?,
            signing_secret: require("SLACK_SIGNING_SECRET")?,
            bot_user_id: require("SLACK_BOT_USER_ID")?,
            api_base: lookup("SLACK_API_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
        };

        let server_url = require("KESTRA_SERVER_URL")?;
        let kestra = KestraConfig {
            api_token: require("KESTRA_API_TOKEN")?,
            server_url: server_url
                .strip_suffix('/')
                .unwrap_or(&server_url)
                .to_string(),
            tenant_id: require("KESTRA_TENANT_ID")?,
        };

        Ok(Self { slack, kestra })
    }
}
