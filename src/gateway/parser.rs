//! Gateway dispatch parser.
//!
//! The relay forwards dispatches verbatim as `{"t": <name>, "d": <data>}`.
//!
//! # Parsing Strategy
//!
//! 1. The envelope is read and the event name taken from `t`
//! 2. `d` is parsed according to the event name
//! 3. Unknown event names and non-ballot emoji return `Ok(None)`
//! 4. Malformed envelopes or data return `Err` with details

use serde::Deserialize;
use thiserror::Error;

use crate::types::{Ballot, ChannelId, MessageId, ReactionChange, UserId};

use super::events::{GatewayEvent, MemberJoinedEvent, ReactionEvent};

/// Error type for dispatch parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field was present but unusable.
    #[error("invalid field value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Parses a relayed dispatch into a typed event.
///
/// # Returns
///
/// * `Ok(Some(event))` - A member join or a ballot reaction
/// * `Ok(None)` - Any other dispatch, or a reaction with another emoji
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use gatekeeper::gateway::{GatewayEvent, parse_dispatch};
///
/// let payload = br#"{
///     "t": "GUILD_MEMBER_ADD",
///     "d": { "guild_id": "9", "user": { "id": "42", "username": "newbie" } }
/// }"#;
///
/// let event = parse_dispatch(payload).unwrap();
/// assert!(matches!(event, Some(GatewayEvent::MemberJoined(_))));
/// ```
pub fn parse_dispatch(payload: &[u8]) -> Result<Option<GatewayEvent>, ParseError> {
    let envelope: RawDispatch = serde_json::from_slice(payload)?;
    let Some(name) = envelope.t else {
        // Non-dispatch gateway frames (heartbeat acks and the like) have no name.
        return Ok(None);
    };

    match name.as_str() {
        "GUILD_MEMBER_ADD" => parse_member_add(envelope.d).map(|e| Some(GatewayEvent::MemberJoined(e))),
        "MESSAGE_REACTION_ADD" => {
            parse_reaction(envelope.d, ReactionChange::Added).map(|e| e.map(GatewayEvent::Reaction))
        }
        "MESSAGE_REACTION_REMOVE" => parse_reaction(envelope.d, ReactionChange::Removed)
            .map(|e| e.map(GatewayEvent::Reaction)),
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures
//
// These follow Discord's dispatch JSON. Optional fields default so that
// older or trimmed relays still parse.
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawDispatch {
    t: Option<String>,
    #[serde(default)]
    d: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: UserId,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    bot: bool,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawMemberAdd {
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawEmoji {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReaction {
    user_id: UserId,
    channel_id: ChannelId,
    message_id: MessageId,
    emoji: RawEmoji,
    member: Option<RawMember>,
    #[serde(default)]
    bot: bool,
}

// ============================================================================
// GUILD_MEMBER_ADD
// ============================================================================

fn parse_member_add(data: serde_json::Value) -> Result<MemberJoinedEvent, ParseError> {
    let raw: RawMemberAdd = serde_json::from_value(data)?;
    if raw.user.username.is_empty() {
        return Err(ParseError::InvalidField {
            field: "user.username",
            value: String::new(),
        });
    }

    Ok(MemberJoinedEvent {
        member: raw.user.id,
        tag: user_tag(&raw.user.username, raw.user.discriminator.as_deref()),
    })
}

/// `name#1234` for legacy accounts, plain `name` for migrated ones.
fn user_tag(username: &str, discriminator: Option<&str>) -> String {
    match discriminator {
        Some(d) if !d.is_empty() && d != "0" => format!("{username}#{d}"),
        _ => username.to_string(),
    }
}

// ============================================================================
// MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE
// ============================================================================

fn parse_reaction(
    data: serde_json::Value,
    change: ReactionChange,
) -> Result<Option<ReactionEvent>, ParseError> {
    let raw: RawReaction = serde_json::from_value(data)?;

    // Custom emoji without a name, or any emoji that is not a ballot.
    let Some(ballot) = raw.emoji.name.as_deref().and_then(Ballot::from_emoji) else {
        return Ok(None);
    };

    let member_is_bot = raw
        .member
        .and_then(|m| m.user)
        .is_some_and(|user| user.bot);

    Ok(Some(ReactionEvent {
        change,
        channel: raw.channel_id,
        message: raw.message_id,
        ballot,
        reactor: raw.user_id,
        reactor_is_bot: raw.bot || member_is_bot,
    }))
}
