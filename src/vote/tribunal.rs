//! The case engine.
//!
//! A [`Tribunal`] owns the vote store, the collaborator that executes
//! effects, and the guild settings. Intake, reaction handling and outcome
//! execution are implemented as `impl Tribunal` blocks in their own modules.

use std::fmt;

use tracing::{debug, warn};

use super::error::CaseError;
use super::intake::IntakeReport;
use super::reactions::ReactionOutcome;
use super::store::VoteStore;
use crate::effects::{
    MembershipEffect, MembershipInterpreter, MembershipResponse, MessagingEffect,
    MessagingInterpreter, MessagingResponse,
};
use crate::gateway::GatewayEvent;
use crate::types::{ChannelId, MessageId, RoleId, UserId};

/// Approvals needed for promotion unless configured otherwise.
pub const DEFAULT_REQUIRED_APPROVALS: usize = 3;

/// Guild-specific identifiers and the promotion threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSettings {
    /// The bot's own user ID. Its reactions never count.
    pub bot_user: UserId,
    /// Where prompts are posted and votes are cast.
    pub voting_channel: ChannelId,
    /// Where promotions are announced.
    pub general_channel: ChannelId,
    /// Role held while a case is pending.
    pub probation_role: RoleId,
    /// Role granted on promotion.
    pub member_role: RoleId,
    /// Approvals at which a case resolves to promotion.
    pub required_approvals: usize,
}

/// What handling a single gateway event amounted to.
#[derive(Debug)]
pub enum EventOutcome {
    /// A case was opened.
    Opened(IntakeReport),
    /// A member joined while already under judgment; intake was skipped.
    Duplicate(UserId),
    /// A reaction was processed.
    Reaction(ReactionOutcome),
}

impl EventOutcome {
    /// Short label for responses and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventOutcome::Opened(_) => "opened",
            EventOutcome::Duplicate(_) => "duplicate",
            EventOutcome::Reaction(outcome) => outcome.label(),
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs probation cases against a collaborator `I`.
pub struct Tribunal<I> {
    pub(super) store: VoteStore,
    pub(super) interpreter: I,
    pub(super) settings: VoteSettings,
}

impl<I> Tribunal<I>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync,
{
    pub fn new(interpreter: I, settings: VoteSettings) -> Self {
        Tribunal {
            store: VoteStore::new(),
            interpreter,
            settings,
        }
    }

    pub fn store(&self) -> &VoteStore {
        &self.store
    }

    pub fn settings(&self) -> &VoteSettings {
        &self.settings
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    /// Dispatches a gateway event to intake or reaction handling.
    ///
    /// Never fails: every error is either an expected no-op or has already
    /// been logged by the step that hit it.
    pub async fn handle(&self, event: GatewayEvent) -> EventOutcome {
        match event {
            GatewayEvent::MemberJoined(joined) => {
                match self.open_case(joined.member, &joined.tag).await {
                    Ok(report) => EventOutcome::Opened(report),
                    Err(err) => {
                        warn!(subject = %joined.member, error = %err, "Skipping intake");
                        EventOutcome::Duplicate(joined.member)
                    }
                }
            }
            GatewayEvent::Reaction(reaction) => {
                EventOutcome::Reaction(self.process_reaction(&reaction).await)
            }
        }
    }

    // ─── Collaborator calls ───────────────────────────────────────────────────

    pub(super) async fn membership(
        &self,
        effect: MembershipEffect,
    ) -> Result<MembershipResponse, CaseError> {
        let operation = effect.name();
        debug!(operation, member = %effect.member(), "Executing membership effect");
        MembershipInterpreter::interpret(&self.interpreter, effect)
            .await
            .map_err(|e| CaseError::collaborator(operation, e))
    }

    pub(super) async fn messaging(
        &self,
        effect: MessagingEffect,
    ) -> Result<MessagingResponse, CaseError> {
        let operation = effect.name();
        debug!(operation, "Executing messaging effect");
        MessagingInterpreter::interpret(&self.interpreter, effect)
            .await
            .map_err(|e| CaseError::collaborator(operation, e))
    }

    /// Posts a message and returns its ID.
    pub(super) async fn post(
        &self,
        channel: ChannelId,
        content: String,
    ) -> Result<MessageId, CaseError> {
        match self
            .messaging(MessagingEffect::PostMessage { channel, content })
            .await?
        {
            MessagingResponse::Posted(id) => Ok(id),
            other => Err(CaseError::collaborator(
                "post_message",
                UnexpectedResponse(format!("{other:?}")),
            )),
        }
    }
}

/// An interpreter answered an effect with the wrong kind of response.
#[derive(Debug, thiserror::Error)]
#[error("unexpected response: {0}")]
pub(super) struct UnexpectedResponse(String);
