//! HTTP webhook endpoint for Slack deliveries.
//!
//! Every request is signature-checked, decoded into an
//! [`IncomingEvent`], and acknowledged with `200 OK` before any slow work.
//! Handshakes are answered inline with the challenge token; mentions and
//! button clicks are handed to [`dispatch`](crate::dispatch::dispatch) on a
//! task tracked by [`AppState::tasks`] so shutdown can drain it.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::dispatch::{self, IncomingEvent};
use crate::error::ServerError;
use crate::signature;
use crate::state::AppState;

/// Fixed listening port.
pub const PORT: u16 = 3000;

/// Request URL path registered with Slack for events and interactivity.
pub const EVENTS_PATH: &str = "/slack/events";

/// Builds the webhook router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(EVENTS_PATH, post(handle_webhook))
        .with_state(state)
}

/// Serves the webhook router on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the underlying I/O error if the server fails.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServerError> {
    signature::verify(
        &state.config().slack.signing_secret,
        &headers,
        &body,
        chrono::Utc::now().timestamp(),
    )?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let event = dispatch::parse_body(content_type, &body)?;

    match event {
        IncomingEvent::UrlVerification { challenge } => {
            info!("Answering url_verification challenge");
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response())
        }
        event => {
            debug!(event = ?event, "Acknowledging delivery");
            state
                .tasks()
                .spawn(dispatch::dispatch(Arc::clone(&state), event));
            Ok(StatusCode::OK.into_response())
        }
    }
}
