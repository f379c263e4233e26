//! Guild membership effect types.
//!
//! These types describe role and membership operations as data, without
//! executing them. Effects are guild-scoped: the interpreter is constructed
//! with a `GuildId`, so effects don't include it.

use serde::{Deserialize, Serialize};

use crate::types::{RoleId, UserId};

/// A membership effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEffect {
    /// Give a role to a member.
    AddRole { member: UserId, role: RoleId },

    /// Take a role away from a member.
    RemoveRole { member: UserId, role: RoleId },

    /// Remove a member from the guild.
    ///
    /// The reason is recorded in the guild's audit log.
    Kick { member: UserId, reason: String },
}

impl MembershipEffect {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            MembershipEffect::AddRole { .. } => "add_role",
            MembershipEffect::RemoveRole { .. } => "remove_role",
            MembershipEffect::Kick { .. } => "kick",
        }
    }

    /// Returns the member this effect targets.
    pub fn member(&self) -> UserId {
        match self {
            MembershipEffect::AddRole { member, .. }
            | MembershipEffect::RemoveRole { member, .. }
            | MembershipEffect::Kick { member, .. } => *member,
        }
    }
}

/// Response from a membership effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipResponse {
    /// The operation was applied.
    Done,
}
