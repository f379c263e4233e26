//! Relay endpoint handler.
//!
//! Accepts gateway dispatches forwarded by the relay, verifies their
//! signature, and hands the parsed event to the tribunal. Handling runs on
//! its own task, so a relay that gives up on the request cannot cut a case
//! transition short. The response is sent once that task finishes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::AppState;
use crate::effects::{MembershipInterpreter, MessagingInterpreter};
use crate::gateway::{GatewayEvent, ParseError, SIGNATURE_HEADER, parse_dispatch, verify};
use crate::vote::{EventOutcome, ReactionOutcome};

/// Errors that can occur when accepting a relayed dispatch.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Invalid signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// The body is not a dispatch we can read.
    #[error("malformed dispatch: {0}")]
    Parse(#[from] ParseError),

    /// The handling task panicked or was cancelled.
    #[error("dispatch handling failed: {0}")]
    Handling(#[from] JoinError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::MissingHeader(_) | RelayError::Parse(_) => StatusCode::BAD_REQUEST,
            RelayError::InvalidSignature => StatusCode::UNAUTHORIZED,
            RelayError::Handling(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Relay handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-Signature-256`: HMAC-SHA256 signature of the body
/// - Body: `{"t": <dispatch name>, "d": <dispatch data>}`
///
/// # Response
///
/// - 200 OK: Handled; the body names what happened (`opened`, `duplicate`,
///   `pending`, `promoted`, `rejected`, `discarded` or `ignored`)
/// - 400 Bad Request: Missing signature header or malformed dispatch
/// - 401 Unauthorized: Invalid signature
/// - 500 Internal Server Error: The handling task panicked
pub async fn relay_handler<I>(
    State(app_state): State<AppState<I>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), RelayError>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(RelayError::MissingHeader(SIGNATURE_HEADER))?;

    // Verify before parsing; nothing from an unsigned body is trusted.
    if !verify(&body, signature, app_state.relay_secret()) {
        warn!(bytes = body.len(), "Invalid relay signature");
        return Err(RelayError::InvalidSignature);
    }

    let Some(event) = parse_dispatch(&body)? else {
        debug!("Ignoring dispatch");
        return Ok((StatusCode::OK, "ignored"));
    };

    let kind = match &event {
        GatewayEvent::MemberJoined(_) => "member_joined",
        GatewayEvent::Reaction(_) => "reaction",
    };
    // Detached: once spawned, the case transition completes even if this
    // request future is dropped.
    let outcome = tokio::spawn(async move { app_state.tribunal().handle(event).await }).await?;

    if matches!(outcome, EventOutcome::Reaction(ReactionOutcome::Ignored(_))) {
        debug!(kind, outcome = %outcome, "Dispatch handled");
    } else {
        info!(kind, outcome = %outcome, "Dispatch handled");
    }

    Ok((StatusCode::OK, outcome.label()))
}
