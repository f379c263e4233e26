//! Shared test utilities: a recording interpreter and arbitrary generators.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use proptest::prelude::*;

use crate::effects::{
    Effect, MembershipEffect, MembershipInterpreter, MembershipResponse, MessagingEffect,
    MessagingInterpreter, MessagingResponse,
};
use crate::gateway::{GatewayEvent, MemberJoinedEvent, ReactionEvent};
use crate::types::{Ballot, ChannelId, MessageId, ReactionChange, RoleId, UserId};
use crate::vote::{Tribunal, Vote, VoteSettings};

pub const BOT: UserId = UserId(1);
pub const VOTING_CHANNEL: ChannelId = ChannelId(100);
pub const GENERAL_CHANNEL: ChannelId = ChannelId(200);
pub const PROBATION_ROLE: RoleId = RoleId(300);
pub const MEMBER_ROLE: RoleId = RoleId(400);

/// First message ID handed out by [`RecordingInterpreter`].
pub const FIRST_MESSAGE_ID: u64 = 5000;

pub fn settings() -> VoteSettings {
    VoteSettings {
        bot_user: BOT,
        voting_channel: VOTING_CHANNEL,
        general_channel: GENERAL_CHANNEL,
        probation_role: PROBATION_ROLE,
        member_role: MEMBER_ROLE,
        required_approvals: 3,
    }
}

pub fn tribunal() -> Tribunal<RecordingInterpreter> {
    Tribunal::new(RecordingInterpreter::new(), settings())
}

pub fn joined(member: u64, tag: &str) -> GatewayEvent {
    GatewayEvent::MemberJoined(MemberJoinedEvent {
        member: UserId(member),
        tag: tag.to_string(),
    })
}

/// A reaction by `reactor` in the voting channel.
pub fn reaction(
    change: ReactionChange,
    ballot: Ballot,
    message: MessageId,
    reactor: u64,
) -> ReactionEvent {
    ReactionEvent {
        change,
        channel: VOTING_CHANNEL,
        message,
        ballot,
        reactor: UserId(reactor),
        reactor_is_bot: false,
    }
}

/// Error returned for effects matched by [`RecordingInterpreter::fail_when`].
#[derive(Debug, thiserror::Error)]
#[error("injected failure for {0}")]
pub struct InjectedFailure(pub &'static str);

type FailurePredicate = Box<dyn Fn(&Effect) -> bool + Send + Sync>;

/// Records every effect it is asked to execute.
///
/// Posted messages get sequential IDs starting at [`FIRST_MESSAGE_ID`].
/// Failures can be injected per effect, and `yielding` makes every call
/// suspend once so concurrent handlers interleave.
pub struct RecordingInterpreter {
    effects: Mutex<Vec<Effect>>,
    failures: Mutex<Vec<FailurePredicate>>,
    next_message: AtomicU64,
    yielding: bool,
}

impl Default for RecordingInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingInterpreter {
    pub fn new() -> Self {
        RecordingInterpreter {
            effects: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            next_message: AtomicU64::new(FIRST_MESSAGE_ID),
            yielding: false,
        }
    }

    pub fn yielding() -> Self {
        RecordingInterpreter {
            yielding: true,
            ..Self::new()
        }
    }

    /// Makes every effect matching `predicate` fail.
    pub fn fail_when(&self, predicate: impl Fn(&Effect) -> bool + Send + Sync + 'static) {
        self.failures.lock().unwrap().push(Box::new(predicate));
    }

    /// All effects attempted so far, including failed ones.
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Effect) -> bool) -> usize {
        self.effects.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        self.effects.lock().unwrap().clear();
    }

    async fn record(&self, effect: Effect) -> Result<(), InjectedFailure> {
        if self.yielding {
            tokio::task::yield_now().await;
        }
        let name = effect.name();
        let failed = self.failures.lock().unwrap().iter().any(|f| f(&effect));
        self.effects.lock().unwrap().push(effect);
        if failed {
            Err(InjectedFailure(name))
        } else {
            Ok(())
        }
    }
}

impl MembershipInterpreter for RecordingInterpreter {
    type Error = InjectedFailure;

    async fn interpret(&self, effect: MembershipEffect) -> Result<MembershipResponse, Self::Error> {
        self.record(effect.into()).await?;
        Ok(MembershipResponse::Done)
    }
}

impl MessagingInterpreter for RecordingInterpreter {
    type Error = InjectedFailure;

    async fn interpret(&self, effect: MessagingEffect) -> Result<MessagingResponse, Self::Error> {
        let posts = matches!(effect, MessagingEffect::PostMessage { .. });
        self.record(effect.into()).await?;
        if posts {
            let id = self.next_message.fetch_add(1, Ordering::SeqCst);
            Ok(MessagingResponse::Posted(MessageId(id)))
        } else {
            Ok(MessagingResponse::Done)
        }
    }
}

// ─── Effect matchers ──────────────────────────────────────────────────────────

pub fn is_kick(effect: &Effect) -> bool {
    matches!(effect, Effect::Membership(MembershipEffect::Kick { .. }))
}

pub fn is_add_role(role: RoleId) -> impl Fn(&Effect) -> bool {
    move |effect| matches!(effect, Effect::Membership(MembershipEffect::AddRole { role: r, .. }) if *r == role)
}

pub fn is_remove_role(role: RoleId) -> impl Fn(&Effect) -> bool {
    move |effect| matches!(effect, Effect::Membership(MembershipEffect::RemoveRole { role: r, .. }) if *r == role)
}

pub fn is_post_to(channel: ChannelId) -> impl Fn(&Effect) -> bool {
    move |effect| matches!(effect, Effect::Messaging(MessagingEffect::PostMessage { channel: c, .. }) if *c == channel)
}

pub fn is_edit(effect: &Effect) -> bool {
    matches!(effect, Effect::Messaging(MessagingEffect::EditMessage { .. }))
}

pub fn is_add_reaction(effect: &Effect) -> bool {
    matches!(effect, Effect::Messaging(MessagingEffect::AddReaction { .. }))
}

// ─── Arbitrary generators ─────────────────────────────────────────────────────

/// Voters drawn from a small pool so votes collide.
pub fn arb_voter() -> impl Strategy<Value = UserId> {
    (2u64..8).prop_map(UserId)
}

pub fn arb_ballot() -> impl Strategy<Value = Ballot> {
    prop_oneof![Just(Ballot::Approve), Just(Ballot::Reject)]
}

pub fn arb_change() -> impl Strategy<Value = ReactionChange> {
    prop_oneof![Just(ReactionChange::Added), Just(ReactionChange::Removed)]
}

pub fn arb_vote() -> impl Strategy<Value = Vote> {
    (arb_ballot(), arb_change(), arb_voter()).prop_map(|(ballot, change, voter)| Vote {
        ballot,
        change,
        voter,
    })
}
