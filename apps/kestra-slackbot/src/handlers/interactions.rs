//! Interactive component handler for the resume button.
//!
//! Runs after the webhook layer has already acknowledged the click. Calls
//! the Kestra resume endpoint once and reports the outcome in the thread
//! the button lives in.

use tracing::{error, info, instrument, warn};

use crate::dispatch::ResumeAction;
use crate::formatter;
use crate::state::AppState;

/// Handles a resume button click.
///
/// Posts exactly one thread reply: the classified outcome when Kestra
/// answered, or a transport error when it did not. No retries.
#[instrument(
    skip(state, action),
    fields(
        execution_id = %action.execution_id,
        user = %action.user_name,
        thread_ts = %action.thread_anchor,
    )
)]
pub async fn handle_resume(state: &AppState, action: ResumeAction) {
    let text = match state.kestra().resume(&action.execution_id).await {
        Ok(outcome) => {
            info!(outcome = ?outcome, "Kestra resume completed");
            formatter::resume_outcome(&action.execution_id, &action.user_name, &outcome)
        }
        Err(e) => {
            error!(error = %e, "Kestra resume request failed");
            formatter::resume_unreachable(&action.execution_id, &e.to_string())
        }
    };

    if let Err(e) = state
        .slack()
        .post_text(&action.channel, Some(&action.thread_anchor), &text)
        .await
    {
        warn!(error = %e, "Failed to post resume outcome");
    }
}
