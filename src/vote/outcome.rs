//! Executing a terminal decision.
//!
//! The executor first claims the case by removing its record from the store.
//! Only the caller that gets the record back performs the external calls;
//! any other caller racing on the same case gets [`Resolution::Discarded`].
//! Because the claim removes the record before anything can fail, a closed
//! case never re-triggers and is never retried.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::error::CaseError;
use super::notice;
use super::record::VoteRecord;
use super::tribunal::Tribunal;
use crate::effects::{
    MembershipEffect, MembershipInterpreter, MessagingEffect, MessagingInterpreter,
};
use crate::types::UserId;

/// How a case ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Swap the probation role for the member role and welcome them.
    Promote,
    /// Kick the member.
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Promote => write!(f, "promote"),
            Decision::Reject => write!(f, "reject"),
        }
    }
}

/// Result of asking the executor to close a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// This call closed the case.
    ///
    /// `completed` is false when a collaborator step failed and the
    /// remaining steps were skipped.
    Executed { decision: Decision, completed: bool },
    /// The case was already closed; nothing was done.
    Discarded,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Executed {
                decision: Decision::Promote,
                ..
            } => "promoted",
            Resolution::Executed {
                decision: Decision::Reject,
                ..
            } => "rejected",
            Resolution::Discarded => "discarded",
        }
    }
}

impl<I> Tribunal<I>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync,
{
    /// Closes `subject`'s case with `decision`, at most once.
    pub async fn execute(&self, decision: Decision, subject: UserId) -> Resolution {
        let Some(record) = self.store.remove(subject).await else {
            debug!(subject = %subject, decision = %decision, "Case already closed; discarding");
            return Resolution::Discarded;
        };

        let result = match decision {
            Decision::Promote => self.promote(&record).await,
            Decision::Reject => self.reject(&record).await,
        };

        let completed = match result {
            Ok(()) => {
                info!(
                    subject = %subject,
                    decision = %decision,
                    approvals = record.approval_count(),
                    open_secs = record.age().num_seconds(),
                    "Case closed"
                );
                true
            }
            Err(err) => {
                error!(
                    subject = %subject,
                    decision = %decision,
                    error = %err,
                    "Case closed with remaining steps skipped"
                );
                false
            }
        };

        Resolution::Executed {
            decision,
            completed,
        }
    }

    async fn promote(&self, record: &VoteRecord) -> Result<(), CaseError> {
        let member = record.subject;

        self.membership(MembershipEffect::RemoveRole {
            member,
            role: self.settings.probation_role,
        })
        .await?;
        debug!(subject = %member, "Removed probation role");

        self.membership(MembershipEffect::AddRole {
            member,
            role: self.settings.member_role,
        })
        .await?;
        debug!(subject = %member, "Granted member role");

        if let Some(prompt) = record.prompt {
            self.messaging(MessagingEffect::EditMessage {
                channel: prompt.channel,
                message: prompt.message,
                content: notice::accepted(member),
            })
            .await?;
        }

        self.post(
            self.settings.general_channel,
            notice::welcome(&record.subject_tag),
        )
        .await?;

        Ok(())
    }

    async fn reject(&self, record: &VoteRecord) -> Result<(), CaseError> {
        let member = record.subject;

        self.membership(MembershipEffect::Kick {
            member,
            reason: notice::KICK_REASON.to_string(),
        })
        .await?;

        if let Some(prompt) = record.prompt {
            self.messaging(MessagingEffect::EditMessage {
                channel: prompt.channel,
                message: prompt.message,
                content: notice::kicked(member),
            })
            .await?;
        }

        Ok(())
    }
}
