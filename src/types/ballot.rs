//! Vote symbols and reaction change kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two reaction symbols voters use on a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ballot {
    /// 👍 - keep the member.
    Approve,
    /// 👎 - kick the member.
    Reject,
}

impl Ballot {
    /// Returns the unicode emoji for this ballot.
    pub fn emoji(self) -> &'static str {
        match self {
            Ballot::Approve => "👍",
            Ballot::Reject => "👎",
        }
    }

    /// Returns the emoji percent-encoded for use in a REST path segment.
    pub fn url_encoded(self) -> &'static str {
        match self {
            Ballot::Approve => "%F0%9F%91%8D",
            Ballot::Reject => "%F0%9F%91%8E",
        }
    }

    /// Maps a reaction emoji name to a ballot.
    ///
    /// Skin-tone variants are not ballots; only the bare emoji counts.
    pub fn from_emoji(name: &str) -> Option<Ballot> {
        match name {
            "👍" => Some(Ballot::Approve),
            "👎" => Some(Ballot::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ballot::Approve => write!(f, "approve"),
            Ballot::Reject => write!(f, "reject"),
        }
    }
}

/// Whether a reaction was placed or withdrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionChange {
    Added,
    Removed,
}

impl fmt::Display for ReactionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionChange::Added => write!(f, "added"),
            ReactionChange::Removed => write!(f, "removed"),
        }
    }
}
