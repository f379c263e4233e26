//! Channel messaging effect types.
//!
//! These types describe message operations as data. The Discord interpreter
//! executes them against the REST API; tests use a recording interpreter.

use serde::{Deserialize, Serialize};

use crate::types::{Ballot, ChannelId, MessageId};

/// A messaging effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagingEffect {
    // ─── Messages ─────────────────────────────────────────────────────────────
    /// Post a new message to a channel.
    PostMessage { channel: ChannelId, content: String },

    /// Replace the content of an existing message.
    EditMessage {
        channel: ChannelId,
        message: MessageId,
        content: String,
    },

    // ─── Reactions ────────────────────────────────────────────────────────────
    /// React to a message as the bot, giving voters a ballot to click.
    AddReaction {
        channel: ChannelId,
        message: MessageId,
        ballot: Ballot,
    },
}

impl MessagingEffect {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            MessagingEffect::PostMessage { .. } => "post_message",
            MessagingEffect::EditMessage { .. } => "edit_message",
            MessagingEffect::AddReaction { .. } => "add_reaction",
        }
    }
}

/// Response from a messaging effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessagingResponse {
    /// Response to `PostMessage`.
    Posted(MessageId),

    /// Response to `EditMessage` and `AddReaction`.
    Done,
}
