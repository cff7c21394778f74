//! Webhook body parsing and type-based dispatch.
//!
//! Slack delivers Events API callbacks as JSON and interactive component
//! actions as `application/x-www-form-urlencoded` bodies with a single
//! `payload` field holding JSON. This module decodes both into an
//! [`IncomingEvent`] and routes each variant to its handler.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ServerError;
use crate::formatter::RESUME_ACTION;
use crate::handlers;
use crate::state::AppState;
use crate::trigger::ExecutionId;

/// A decoded inbound webhook delivery.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::dispatch::{parse_body, IncomingEvent};
///
/// let body = br#"{"type": "url_verification", "challenge": "abc123"}"#;
/// let event = parse_body(Some("application/json"), body).unwrap();
/// assert_eq!(event, IncomingEvent::UrlVerification { challenge: "abc123".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingEvent {
    /// Endpoint registration handshake.
    UrlVerification {
        /// Token to echo back verbatim.
        challenge: String,
    },

    /// The bot was mentioned in a message.
    AppMention(MentionEvent),

    /// The resume button was clicked.
    ResumeAction(ResumeAction),

    /// Any other event or action; acknowledged and dropped.
    Ignored {
        /// Event type or action id, for logging.
        kind: String,
    },
}

/// An `app_mention` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MentionEvent {
    /// Channel where the mention was posted.
    pub channel: String,

    /// Raw message text.
    #[serde(default)]
    pub text: String,

    /// Timestamp of the mentioning message.
    pub ts: String,

    /// Thread parent timestamp, when the mention is itself a thread reply.
    #[serde(default)]
    pub thread_ts: Option<String>,

    /// User id of the author.
    #[serde(default)]
    pub user: Option<String>,
}

/// A click on the resume button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAction {
    /// Display name of the clicking user.
    pub user_name: String,

    /// Channel holding the button message.
    pub channel: String,

    /// Thread to reply into: the root `thread_ts`, else the button's `message_ts`.
    pub thread_anchor: String,

    /// Execution id carried by the button.
    pub execution_id: ExecutionId,
}

/// JSON envelope for Events API deliveries.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum EventsApiBody {
    #[serde(rename = "url_verification")]
    UrlVerification {
        #[serde(default)]
        challenge: Option<String>,
    },

    #[serde(rename = "event_callback")]
    EventCallback { event: serde_json::Value },

    #[serde(other)]
    Other,
}

/// Inner `event` of an `event_callback`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum EventPayload {
    #[serde(rename = "app_mention")]
    AppMention(MentionEvent),

    #[serde(other)]
    Other,
}

/// Interactive `block_actions` payload, reduced to the fields used here.
#[derive(Debug, Deserialize)]
struct InteractionPayload {
    user: UserRef,
    #[serde(default)]
    channel: Option<ChannelRef>,
    container: Container,
    #[serde(default)]
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ChannelRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Container {
    #[serde(default)]
    thread_ts: Option<String>,
    #[serde(default)]
    message_ts: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Action {
    action_id: String,
    #[serde(default)]
    value: Option<String>,
}

/// Parses a raw webhook body into an [`IncomingEvent`].
///
/// Form-encoded bodies are treated as interactive payloads; everything
/// else is parsed as Events API JSON.
///
/// # Errors
///
/// Returns `ServerError::Dispatch` or `ServerError::Json` if the body does
/// not match a known shape, including a handshake without a challenge.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<IncomingEvent, ServerError> {
    let is_form = content_type
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        parse_interaction(body)
    } else {
        parse_events_api(body)
    }
}

fn parse_events_api(body: &[u8]) -> Result<IncomingEvent, ServerError> {
    match serde_json::from_slice::<EventsApiBody>(body)? {
        EventsApiBody::UrlVerification { challenge } => {
            let challenge = challenge.ok_or_else(|| {
                ServerError::Dispatch("url_verification missing 'challenge'".into())
            })?;
            Ok(IncomingEvent::UrlVerification { challenge })
        }
        EventsApiBody::EventCallback { event } => {
            let kind = event
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            match serde_json::from_value::<EventPayload>(event)? {
                EventPayload::AppMention(mention) => Ok(IncomingEvent::AppMention(mention)),
                EventPayload::Other => Ok(IncomingEvent::Ignored { kind }),
            }
        }
        EventsApiBody::Other => Ok(IncomingEvent::Ignored {
            kind: "unknown".into(),
        }),
    }
}

fn parse_interaction(body: &[u8]) -> Result<IncomingEvent, ServerError> {
    let payload = form_urlencoded::parse(body)
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ServerError::Dispatch("form body missing 'payload'".into()))?;

    let interaction: InteractionPayload = serde_json::from_str(&payload)?;

    let Some(action) = interaction.actions.first() else {
        return Ok(IncomingEvent::Ignored {
            kind: "empty_actions".into(),
        });
    };
    if action.action_id != RESUME_ACTION {
        return Ok(IncomingEvent::Ignored {
            kind: action.action_id.clone(),
        });
    }

    let value = action
        .value
        .clone()
        .ok_or_else(|| ServerError::Dispatch("resume action missing 'value'".into()))?;

    let container = interaction.container;
    let thread_anchor = container
        .thread_ts
        .or(container.message_ts)
        .ok_or_else(|| {
            ServerError::Dispatch("container has neither 'thread_ts' nor 'message_ts'".into())
        })?;

    let channel = interaction
        .channel
        .map(|c| c.id)
        .or(container.channel_id)
        .ok_or_else(|| ServerError::Dispatch("interaction missing channel".into()))?;

    Ok(IncomingEvent::ResumeAction(ResumeAction {
        user_name: interaction.user.name,
        channel,
        thread_anchor,
        execution_id: ExecutionId::new(value),
    }))
}

/// Routes an event that needs background work to its handler.
///
/// Handshakes are answered inline by the webhook layer and never reach here.
#[instrument(skip(state, event))]
pub async fn dispatch(state: Arc<AppState>, event: IncomingEvent) {
    match event {
        IncomingEvent::UrlVerification { .. } => {
            debug!("Handshake already answered inline");
        }
        IncomingEvent::AppMention(mention) => {
            handlers::events::handle_app_mention(&state, mention).await;
        }
        IncomingEvent::ResumeAction(action) => {
            handlers::interactions::handle_resume(&state, action).await;
        }
        IncomingEvent::Ignored { kind } => {
            debug!(kind = %kind, "Ignoring unhandled delivery");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: Option<&str> = Some("application/x-www-form-urlencoded");
    const JSON: Option<&str> = Some("application/json");

    fn form_body(payload: &serde_json::Value) -> Vec<u8> {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("payload", &payload.to_string())
            .finish()
            .into_bytes()
    }

    fn resume_payload(container: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "type": "block_actions",
            "user": {"id": "U9", "name": "alice", "username": "alice"},
            "channel": {"id": "C1", "name": "ops"},
            "container": container,
            "actions": [{
                "type": "button",
                "action_id": "resume_kestra_workflow",
                "value": "exec-1",
            }],
        })
    }

    #[test]
    fn test_should_parse_url_verification() {
        let body = br#"{"token":"t","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#;
        let event = parse_body(JSON, body).expect("parse");
        assert_eq!(
            event,
            IncomingEvent::UrlVerification {
                challenge: "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P".into()
            }
        );
    }

    #[test]
    fn test_should_reject_url_verification_without_challenge() {
        let err = parse_body(JSON, br#"{"type":"url_verification"}"#).unwrap_err();
        assert!(matches!(err, ServerError::Dispatch(_)));
    }

    #[test]
    fn test_should_parse_app_mention() {
        let body = serde_json::json!({
            "type": "event_callback",
            "event": {
                "type": "app_mention",
                "user": "U456",
                "text": "<@U123>, will you review Kestra Execution ID: abc-456?",
                "ts": "1700000000.000100",
                "channel": "C1",
            },
        })
        .to_string();
        let event = parse_body(None, body.as_bytes()).expect("parse");
        match event {
            IncomingEvent::AppMention(mention) => {
                assert_eq!(mention.channel, "C1");
                assert_eq!(mention.ts, "1700000000.000100");
                assert!(mention.thread_ts.is_none());
                assert_eq!(mention.user.as_deref(), Some("U456"));
            }
            other => panic!("Expected AppMention, got {other:?}"),
        }
    }

    #[test]
    fn test_should_ignore_other_event_types() {
        let body = serde_json::json!({
            "type": "event_callback",
            "event": {"type": "reaction_added", "reaction": "thumbsup"},
        })
        .to_string();
        let event = parse_body(JSON, body.as_bytes()).expect("parse");
        assert_eq!(
            event,
            IncomingEvent::Ignored {
                kind: "reaction_added".into()
            }
        );
    }

    #[test]
    fn test_should_ignore_unknown_envelope_type() {
        let event = parse_body(JSON, br#"{"type":"app_rate_limited"}"#).expect("parse");
        assert!(matches!(event, IncomingEvent::Ignored { .. }));
    }

    #[test]
    fn test_should_error_on_invalid_json() {
        let err = parse_body(JSON, b"not json").unwrap_err();
        assert!(matches!(err, ServerError::Json(_)));
    }

    #[test]
    fn test_should_prefer_thread_ts_for_anchor() {
        let payload = resume_payload(serde_json::json!({
            "type": "message",
            "message_ts": "200.000",
            "thread_ts": "100.000",
            "channel_id": "C1",
        }));
        let event = parse_body(FORM, &form_body(&payload)).expect("parse");
        assert_eq!(
            event,
            IncomingEvent::ResumeAction(ResumeAction {
                user_name: "alice".into(),
                channel: "C1".into(),
                thread_anchor: "100.000".into(),
                execution_id: ExecutionId::new("exec-1"),
            })
        );
    }

    #[test]
    fn test_should_fall_back_to_message_ts_for_anchor() {
        let payload = resume_payload(serde_json::json!({
            "type": "message",
            "message_ts": "200.000",
            "channel_id": "C1",
        }));
        match parse_body(FORM, &form_body(&payload)).expect("parse") {
            IncomingEvent::ResumeAction(action) => assert_eq!(action.thread_anchor, "200.000"),
            other => panic!("Expected ResumeAction, got {other:?}"),
        }
    }

    #[test]
    fn test_should_take_channel_from_container_when_missing() {
        let mut payload = resume_payload(serde_json::json!({
            "message_ts": "200.000",
            "channel_id": "C7",
        }));
        payload
            .as_object_mut()
            .expect("object")
            .remove("channel");
        match parse_body(FORM, &form_body(&payload)).expect("parse") {
            IncomingEvent::ResumeAction(action) => assert_eq!(action.channel, "C7"),
            other => panic!("Expected ResumeAction, got {other:?}"),
        }
    }

    #[test]
    fn test_should_keep_button_value_verbatim() {
        let mut payload = resume_payload(serde_json::json!({"message_ts": "1.0"}));
        payload["actions"][0]["value"] = serde_json::json!(" id with spaces & symbols ");
        match parse_body(FORM, &form_body(&payload)).expect("parse") {
            IncomingEvent::ResumeAction(action) => {
                assert_eq!(action.execution_id.as_str(), " id with spaces & symbols ");
            }
            other => panic!("Expected ResumeAction, got {other:?}"),
        }
    }

    #[test]
    fn test_should_ignore_other_action_ids() {
        let mut payload = resume_payload(serde_json::json!({"message_ts": "1.0"}));
        payload["actions"][0]["action_id"] = serde_json::json!("something_else");
        let event = parse_body(FORM, &form_body(&payload)).expect("parse");
        assert_eq!(
            event,
            IncomingEvent::Ignored {
                kind: "something_else".into()
            }
        );
    }

    #[test]
    fn test_should_error_on_form_without_payload() {
        let err = parse_body(FORM, b"command=%2Fkestra").unwrap_err();
        assert!(err.to_string().contains("payload"));
    }
}
