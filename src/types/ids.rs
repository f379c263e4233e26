//! Newtype wrappers for Discord snowflake identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! `ChannelId` where a `UserId` is expected) and make the code more
//! self-documenting.
//!
//! Discord encodes snowflakes as JSON strings to avoid precision loss in
//! JavaScript clients. The wrappers serialize as strings and accept either a
//! string or a number when deserializing, so relayed payloads and test
//! fixtures can use whichever is convenient.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                $name(n)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(SnowflakeVisitor).map($name)
            }
        }
    };
}

/// Accepts a snowflake as either a decimal string or an unsigned integer.
struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a decimal string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.parse::<u64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

snowflake_id!(
    /// A Discord user (and, within a guild, member) ID.
    UserId
);

snowflake_id!(
    /// A guild role ID.
    RoleId
);

snowflake_id!(
    /// A channel ID.
    ChannelId
);

snowflake_id!(
    /// A message ID. Message IDs are globally unique, so they key the prompt index
    /// without the channel.
    MessageId
);

snowflake_id!(
    /// A guild (server) ID.
    GuildId
);

impl UserId {
    /// Returns the `<@id>` mention markup for this user.
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}
