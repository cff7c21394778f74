//! Trigger phrase matching and execution id extraction for mention text.
//!
//! Grammar, applied to the raw mention text:
//!
//! ```text
//! trigger   = "<@" bot_user_id ">, will you review Kestra Execution ID: "
//! reference = "Kestra Execution ID: " id [ "?" any* ]
//! id        = 1*( any character except "?" )
//! ```
//!
//! The trigger must appear somewhere in the text. The id is then read from
//! the first occurrence of the reference prefix, up to the first `?` or the
//! end of the text. It is kept verbatim, whitespace included.

use std::fmt;

/// Literal that introduces the execution id.
const REFERENCE_PREFIX: &str = "Kestra Execution ID: ";

/// Terminator for the execution id.
const TERMINATOR: char = '?';

/// A Kestra execution id taken from chat text or a button value.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::trigger::ExecutionId;
///
/// let id = ExecutionId::new("abc-456");
/// assert_eq!(id.as_str(), "abc-456");
/// assert_eq!(id.to_string(), "abc-456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionId(String);

impl ExecutionId {
    /// Wraps a raw id without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of matching mention text against the review trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerMatch {
    /// The trigger phrase is absent.
    NoMatch,

    /// The trigger phrase is present and an id was captured.
    Matched(ExecutionId),

    /// The trigger phrase is present but the id capture is empty.
    MissingId,
}

/// Builds the exact trigger phrase for the given bot user id.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::trigger::trigger_phrase;
///
/// assert_eq!(
///     trigger_phrase("U123"),
///     "<@U123>, will you review Kestra Execution ID: "
/// );
/// ```
pub fn trigger_phrase(bot_user_id: &str) -> String {
    format!("<@{bot_user_id}>, will you review {REFERENCE_PREFIX}")
}

/// Matches `text` against the trigger for `bot_user_id` and extracts the id.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::trigger::{match_trigger, ExecutionId, TriggerMatch};
///
/// let text = "<@U123>, will you review Kestra Execution ID: abc-456?";
/// assert_eq!(
///     match_trigger(text, "U123"),
///     TriggerMatch::Matched(ExecutionId::new("abc-456"))
/// );
/// assert_eq!(match_trigger("hi <@U123>", "U123"), TriggerMatch::NoMatch);
/// ```
pub fn match_trigger(text: &str, bot_user_id: &str) -> TriggerMatch {
    if !text.contains(&trigger_phrase(bot_user_id)) {
        return TriggerMatch::NoMatch;
    }
    match extract_execution_id(text) {
        Some(id) => TriggerMatch::Matched(id),
        None => TriggerMatch::MissingId,
    }
}

/// Extracts the id following the first reference prefix in `text`.
///
/// Returns `None` when the prefix is absent or the capture is empty.
pub fn extract_execution_id(text: &str) -> Option<ExecutionId> {
    let (_, rest) = text.split_once(REFERENCE_PREFIX)?;
    let id = rest
        .split_once(TERMINATOR)
        .map_or(rest, |(before, _)| before);
    if id.is_empty() {
        return None;
    }
    Some(ExecutionId::new(id))
}
