//! Opening a case when a member joins.

use tracing::{debug, error, info, warn};

use super::error::CaseError;
use super::notice;
use super::record::PromptHandle;
use super::tribunal::Tribunal;
use crate::effects::{
    MembershipEffect, MembershipInterpreter, MessagingEffect, MessagingInterpreter,
};
use crate::types::{Ballot, UserId};

/// What intake managed to do for a new case.
///
/// The case is pending even if both collaborator steps failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    pub subject: UserId,
    /// Whether the probation role was assigned.
    pub probation_assigned: bool,
    /// The prompt, if it was posted and bound to the case.
    pub prompt: Option<PromptHandle>,
}

impl<I> Tribunal<I>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync,
{
    /// Puts `subject` on probation and asks the community to vote.
    ///
    /// The case is registered first, so a duplicate join makes no external
    /// calls. The probation role is assigned before the prompt is posted, so
    /// no vote can promote the subject ahead of the role landing. Neither
    /// failure aborts the other.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::DuplicateCase`] if `subject` is already pending.
    pub async fn open_case(&self, subject: UserId, tag: &str) -> Result<IntakeReport, CaseError> {
        self.store.create(subject, tag).await?;

        let probation_assigned = self.assign_probation(subject).await;
        let prompt = self.post_prompt(subject).await;

        info!(
            subject = %subject,
            tag,
            probation_assigned,
            prompt = ?prompt.map(|p| p.message),
            "Voting started"
        );

        Ok(IntakeReport {
            subject,
            probation_assigned,
            prompt,
        })
    }

    async fn assign_probation(&self, subject: UserId) -> bool {
        let effect = MembershipEffect::AddRole {
            member: subject,
            role: self.settings.probation_role,
        };
        match self.membership(effect).await {
            Ok(_) => {
                debug!(subject = %subject, "Assigned probation role");
                true
            }
            Err(err) => {
                error!(subject = %subject, error = %err, "Failed to assign probation role");
                false
            }
        }
    }

    async fn post_prompt(&self, subject: UserId) -> Option<PromptHandle> {
        let channel = self.settings.voting_channel;
        let message = match self.post(channel, notice::prompt(subject)).await {
            Ok(message) => message,
            Err(err) => {
                error!(subject = %subject, error = %err, "Failed to post voting prompt");
                return None;
            }
        };

        let prompt = PromptHandle { channel, message };
        if !self.store.bind_prompt(subject, prompt).await {
            warn!(subject = %subject, message = %message, "Case closed before its prompt was bound");
            return None;
        }

        for ballot in [Ballot::Approve, Ballot::Reject] {
            let effect = MessagingEffect::AddReaction {
                channel,
                message,
                ballot,
            };
            if let Err(err) = self.messaging(effect).await {
                error!(
                    subject = %subject,
                    ballot = %ballot,
                    error = %err,
                    "Failed to attach ballot reaction"
                );
            }
        }

        Some(prompt)
    }
}
