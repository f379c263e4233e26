//! Case inspection endpoints for observability.
//!
//! Provides a read-only view of pending cases for debugging and moderation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::AppState;
use crate::effects::{MembershipInterpreter, MessagingInterpreter};
use crate::types::{MessageId, UserId};
use crate::vote::VoteRecord;

/// Errors that can occur when looking up a case.
#[derive(Debug, Error)]
pub enum CaseLookupError {
    /// The path segment is not a snowflake.
    #[error("invalid subject ID: {0}")]
    InvalidSubject(String),

    /// No pending case for this member.
    #[error("no pending case for {0}")]
    NotFound(UserId),
}

impl IntoResponse for CaseLookupError {
    fn into_response(self) -> Response {
        let status = match &self {
            CaseLookupError::InvalidSubject(_) => StatusCode::BAD_REQUEST,
            CaseLookupError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

/// A pending case as reported over HTTP.
#[derive(Debug, Serialize)]
pub struct CaseView {
    pub subject: UserId,
    pub subject_tag: String,
    pub approvals: Vec<UserId>,
    pub approval_count: usize,
    pub prompt: Option<MessageId>,
    pub opened_at: DateTime<Utc>,
}

impl From<VoteRecord> for CaseView {
    fn from(record: VoteRecord) -> Self {
        CaseView {
            subject: record.subject,
            approval_count: record.approval_count(),
            approvals: record.approvals.into_iter().collect(),
            subject_tag: record.subject_tag,
            prompt: record.prompt.map(|p| p.message),
            opened_at: record.opened_at,
        }
    }
}

/// Response body for `GET /cases`.
#[derive(Debug, Serialize)]
pub struct CasesResponse {
    pub required_approvals: usize,
    pub pending: Vec<CaseView>,
}

/// Lists pending cases, oldest first.
///
/// # Example
///
/// ```ignore
/// GET /cases HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {
///   "required_approvals": 3,
///   "pending": [{ "subject": "50", "approval_count": 1, ... }]
/// }
/// ```
pub async fn cases_handler<I>(State(app_state): State<AppState<I>>) -> Json<CasesResponse>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync + 'static,
{
    let tribunal = app_state.tribunal();
    let pending = tribunal.store().pending().await;
    Json(CasesResponse {
        required_approvals: tribunal.settings().required_approvals,
        pending: pending.into_iter().map(CaseView::from).collect(),
    })
}

/// Returns the pending case for one member.
///
/// # Response
///
/// - 200 OK with a [`CaseView`]
/// - 400 Bad Request if `subject` is not a snowflake
/// - 404 Not Found if the member has no pending case
pub async fn case_handler<I>(
    State(app_state): State<AppState<I>>,
    Path(subject): Path<String>,
) -> Result<Json<CaseView>, CaseLookupError>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync + 'static,
{
    let subject: UserId = subject
        .parse()
        .map_err(|_| CaseLookupError::InvalidSubject(subject))?;

    app_state
        .tribunal()
        .store()
        .get(subject)
        .await
        .map(|record| Json(CaseView::from(record)))
        .ok_or(CaseLookupError::NotFound(subject))
}
