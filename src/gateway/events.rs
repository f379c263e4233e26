//! Typed gateway events.
//!
//! The bot reacts to three gateway dispatches: a member joining the guild,
//! and a reaction being added to or removed from a message. Everything else
//! the relay forwards is dropped by the parser.

use serde::{Deserialize, Serialize};

use crate::types::{Ballot, ChannelId, MessageId, ReactionChange, UserId};

/// A parsed gateway event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayEvent {
    /// A member joined the guild (`GUILD_MEMBER_ADD`).
    MemberJoined(MemberJoinedEvent),

    /// A ballot reaction was added or removed (`MESSAGE_REACTION_ADD` /
    /// `MESSAGE_REACTION_REMOVE`).
    Reaction(ReactionEvent),
}

/// A new member joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberJoinedEvent {
    /// The member's user ID.
    pub member: UserId,

    /// The member's display tag (`name` or legacy `name#1234`).
    pub tag: String,
}

/// A ballot reaction changed on some message.
///
/// The parser only produces this for the two ballot emoji; whether the message
/// is a prompt is decided later by the vote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Whether the reaction was added or removed.
    pub change: ReactionChange,

    /// The channel containing the message.
    pub channel: ChannelId,

    /// The message that was reacted to.
    pub message: MessageId,

    /// Which ballot the reaction represents.
    pub ballot: Ballot,

    /// The user who reacted.
    pub reactor: UserId,

    /// Whether the reactor is a bot account.
    ///
    /// Discord only includes member data on reaction adds, so this is
    /// `false` for removals even when a bot withdrew the reaction.
    pub reactor_is_bot: bool,
}
