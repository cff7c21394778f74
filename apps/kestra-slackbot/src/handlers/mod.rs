//! Handlers for decoded webhook deliveries.
//!
//! Each submodule handles one [`IncomingEvent`](crate::dispatch::IncomingEvent) variant:
//! - [`events`] — `app_mention` trigger matching
//! - [`interactions`] — resume button clicks

pub mod events;
pub mod interactions;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::config::ServerConfig;
    use crate::state::AppState;

    /// Builds state pointing both API clients at the given mock servers.
    pub(crate) fn state_for(slack_uri: &str, kestra_uri: &str) -> Arc<AppState> {
        let env = HashMap::from([
            ("SLACK_BOT_TOKEN", "xoxb-test".to_string()),
            ("SLACK_SIGNING_SECRET", "secret".to_string()),
            ("SLACK_BOT_USER_ID", "U123".to_string()),
            ("SLACK_API_BASE_URL", slack_uri.to_string()),
            ("KESTRA_API_TOKEN", "kestra-token".to_string()),
            ("KESTRA_SERVER_URL", kestra_uri.to_string()),
            ("KESTRA_TENANT_ID", "main".to_string()),
        ]);
        let config = ServerConfig::from_lookup(|key| env.get(key).cloned()).expect("config");
        Arc::new(AppState::new(config))
    }

    /// Body Slack returns for a successful `chat.postMessage`.
    pub(crate) fn slack_ok() -> serde_json::Value {
        serde_json::json!({"ok": true, "ts": "999.000"})
    }
}
