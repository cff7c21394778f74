//! Thin async client for the Kestra executions API.
//!
//! Only the resume endpoint is used. Responses are classified by status
//! code into a [`ResumeOutcome`]; transport failures surface as
//! [`ServerError::Kestra`].

use tracing::{debug, instrument};

use crate::config::KestraConfig;
use crate::error::ServerError;
use crate::trigger::ExecutionId;

/// Outcome of a resume call, derived solely from the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// 200 or 204: the execution was resumed.
    Resumed,

    /// 409: the execution is not paused (already running or resumed).
    Conflict,

    /// Any other status, with the response body verbatim.
    Failed {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ResumeOutcome {
    /// Classifies a response status and body.
    ///
    /// # Examples
    ///
    /// ```
    /// use kestra_slackbot::kestra::ResumeOutcome;
    ///
    /// assert_eq!(ResumeOutcome::from_status(204, String::new()), ResumeOutcome::Resumed);
    /// assert_eq!(ResumeOutcome::from_status(409, String::new()), ResumeOutcome::Conflict);
    /// ```
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            200 | 204 => Self::Resumed,
            409 => Self::Conflict,
            _ => Self::Failed { status, body },
        }
    }
}

/// Async client for the Kestra API, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct KestraClient {
    http: reqwest::Client,
    config: KestraConfig,
}

impl KestraClient {
    /// Creates a new Kestra client from configuration.
    pub fn new(config: KestraConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Builds the resume URL for an execution.
    ///
    /// The id is inserted as-is.
    pub fn resume_url(&self, execution_id: &ExecutionId) -> String {
        format!(
            "{}/api/v1/{}/executions/{}/resume",
            self.config.server_url, self.config.tenant_id, execution_id
        )
    }

    /// Resumes a paused execution.
    ///
    /// Sends an empty-bodied `POST` with no timeout beyond the transport
    /// default and no retries.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Kestra` when no HTTP response is received
    /// (connection, DNS or TLS failure) or the body cannot be read.
    #[instrument(skip(self), fields(execution_id = %execution_id))]
    pub async fn resume(&self, execution_id: &ExecutionId) -> Result<ResumeOutcome, ServerError> {
        let url = self.resume_url(execution_id);
        debug!(url, "Resuming Kestra execution");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| ServerError::Kestra(format!("resume request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ServerError::Kestra(format!("resume response read failed: {e}")))?;

        debug!(status, "Kestra resume responded");
        Ok(ResumeOutcome::from_status(status, body))
    }
}
