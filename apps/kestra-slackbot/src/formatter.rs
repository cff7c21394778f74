//! Block Kit and reply text builders for Slack responses.
//!
//! Pure functions producing either `serde_json::Value` block arrays for
//! `chat.postMessage` or plain reply strings.

use serde_json::json;

use crate::kestra::ResumeOutcome;
use crate::trigger::ExecutionId;

/// Action ID for the resume button, shared by the formatter and the
/// interaction parser for routing.
pub const RESUME_ACTION: &str = "resume_kestra_workflow";

/// Label on the resume button.
pub const RESUME_BUTTON_LABEL: &str = "Resume Workflow";

/// Reply for mentions that do not carry the review trigger.
pub const NO_TRIGGER_REPLY: &str = "Hello, that message does not trigger anything.";

/// Reply for mentions that carry the trigger but no execution id.
pub const MISSING_ID_REPLY: &str =
    "Sorry, I could not find a Kestra Execution ID in that message.";

/// Builds the single `actions` block holding the resume button.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::formatter::{resume_button, RESUME_ACTION};
/// use kestra_slackbot::trigger::ExecutionId;
///
/// let blocks = resume_button(&ExecutionId::new("abc-456"));
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0]["elements"][0]["value"], "abc-456");
/// assert_eq!(blocks[0]["elements"][0]["action_id"], RESUME_ACTION);
/// ```
pub fn resume_button(execution_id: &ExecutionId) -> Vec<serde_json::Value> {
    vec![json!({
        "type": "actions",
        "elements": [{
            "type": "button",
            "text": {
                "type": "plain_text",
                "text": RESUME_BUTTON_LABEL,
            },
            "value": execution_id.as_str(),
            "action_id": RESUME_ACTION,
        }],
    })]
}

/// Renders the thread reply for a resume attempt.
pub fn resume_outcome(execution_id: &ExecutionId, user: &str, outcome: &ResumeOutcome) -> String {
    match outcome {
        ResumeOutcome::Resumed => format!("Kestra Execution {execution_id} resumed by {user}."),
        ResumeOutcome::Conflict => {
            format!("Kestra Execution {execution_id} is already in progress.")
        }
        ResumeOutcome::Failed { status, body } => format!(
            "Sorry, there was an error resuming Kestra execution {execution_id} - {status}: {body}."
        ),
    }
}

/// Renders the thread reply when the resume call never got a response.
pub fn resume_unreachable(execution_id: &ExecutionId, error: &str) -> String {
    format!("Sorry, there was an error resuming Kestra execution {execution_id} - {error}.")
}
