//! Events API handler for `app_mention` deliveries.
//!
//! Matches the mention text against the review trigger for this bot and
//! replies with either a resume button or a fixed acknowledgment. No Kestra
//! call happens here.

use tracing::{info, instrument, warn};

use crate::dispatch::MentionEvent;
use crate::formatter::{self, MISSING_ID_REPLY, NO_TRIGGER_REPLY};
use crate::state::AppState;
use crate::trigger::{self, TriggerMatch};

/// Handles a single `app_mention` event.
///
/// Posts exactly one message:
/// - a threaded resume button when the trigger carries an execution id,
/// - a threaded apology when the trigger is present but the id is empty,
/// - the generic acknowledgment (unthreaded) otherwise.
#[instrument(skip(state, mention), fields(channel = %mention.channel, ts = %mention.ts))]
pub async fn handle_app_mention(state: &AppState, mention: MentionEvent) {
    let slack = state.slack();
    let bot_user_id = &state.config().slack.bot_user_id;

    let result = match trigger::match_trigger(&mention.text, bot_user_id) {
        TriggerMatch::Matched(execution_id) => {
            info!(execution_id = %execution_id, "Review requested, posting resume button");
            slack
                .post_blocks(
                    &mention.channel,
                    Some(&mention.ts),
                    &formatter::resume_button(&execution_id),
                )
                .await
        }
        TriggerMatch::MissingId => {
            warn!("Review trigger present but no execution id could be extracted");
            slack
                .post_text(&mention.channel, Some(&mention.ts), MISSING_ID_REPLY)
                .await
        }
        TriggerMatch::NoMatch => {
            slack
                .post_text(&mention.channel, None, NO_TRIGGER_REPLY)
                .await
        }
    };

    if let Err(e) = result {
        warn!(error = %e, "Failed to reply to mention");
    }
}
