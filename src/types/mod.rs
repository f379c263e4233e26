//! Core domain types for the gatekeeper bot.
//!
//! This module contains the identifiers and vote symbols used throughout the
//! application, designed to encode invariants via the type system.

pub mod ballot;
pub mod ids;

// Re-export commonly used types at the module level
pub use ballot::{Ballot, ReactionChange};
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
