//! Text of the messages the bot posts and edits.

use crate::types::{Ballot, UserId};

/// Audit-log reason attached to a kick.
pub const KICK_REASON: &str = "Voted out by members.";

/// The prompt posted to the voting channel when a member joins.
pub fn prompt(subject: UserId) -> String {
    format!(
        "A new member, {}, has joined. React with {} to keep them or {} to kick them.",
        subject.mention(),
        Ballot::Approve.emoji(),
        Ballot::Reject.emoji()
    )
}

/// The prompt's replacement text once the member is promoted.
pub fn accepted(subject: UserId) -> String {
    format!(
        "{} has been voted to stay and assigned the success role.",
        subject.mention()
    )
}

/// The announcement posted to the general channel on promotion.
pub fn welcome(subject_tag: &str) -> String {
    format!("{subject_tag} has passed judgement and has been granted entry")
}

/// The prompt's replacement text once the member is kicked.
pub fn kicked(subject: UserId) -> String {
    format!("{} has been kicked from the server.", subject.mention())
}
