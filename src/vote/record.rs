//! The per-case vote record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{ChannelId, MessageId, UserId};

/// Where a case's prompt message lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptHandle {
    pub channel: ChannelId,
    pub message: MessageId,
}

/// One pending probation case.
///
/// A record exists exactly as long as its case is pending. Closing a case
/// removes the record from the store, and whoever removed it owns the
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The member under judgment.
    pub subject: UserId,

    /// The member's tag at intake, used in the welcome announcement.
    pub subject_tag: String,

    /// Voters currently counted as "keep".
    pub approvals: BTreeSet<UserId>,

    /// The prompt message, once posted.
    pub prompt: Option<PromptHandle>,

    /// When the case was opened.
    pub opened_at: DateTime<Utc>,
}

impl VoteRecord {
    /// Creates a record with no approvals and no prompt yet.
    pub fn new(subject: UserId, subject_tag: impl Into<String>) -> Self {
        VoteRecord {
            subject,
            subject_tag: subject_tag.into(),
            approvals: BTreeSet::new(),
            prompt: None,
            opened_at: Utc::now(),
        }
    }

    /// Number of approvals currently counted.
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// How long the case has been open.
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.opened_at
    }
}
