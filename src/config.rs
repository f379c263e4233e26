//! Process configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::discord::DEFAULT_API_BASE;
use crate::types::{ChannelId, GuildId, RoleId, UserId};
use crate::vote::{DEFAULT_REQUIRED_APPROVALS, VoteSettings};

const DEFAULT_PORT: u16 = 3000;

/// Errors from reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the binary needs to run.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub guild: GuildId,
    pub bot_user: UserId,
    pub voting_channel: ChannelId,
    pub general_channel: ChannelId,
    /// Held while a case is pending (`TEMP_ROLE_ID`).
    pub probation_role: RoleId,
    /// Granted on promotion (`SUCCESS_ROLE_ID`).
    pub member_role: RoleId,
    pub relay_secret: String,
    pub port: u16,
    pub required_approvals: usize,
    pub api_base: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `.env` files are not loaded; export the variables before starting.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns a variable's
    /// value or `None` if it is unset.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let required_approvals = match get("REQUIRED_APPROVALS") {
            Some(value) => parse::<usize>("REQUIRED_APPROVALS", value)?,
            None => DEFAULT_REQUIRED_APPROVALS,
        };
        if required_approvals == 0 {
            return Err(ConfigError::Invalid {
                var: "REQUIRED_APPROVALS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            bot_token: require("DISCORD_BOT_TOKEN")?,
            guild: parse("DISCORD_GUILD_ID", require("DISCORD_GUILD_ID")?)?,
            bot_user: parse("BOT_USER_ID", require("BOT_USER_ID")?)?,
            voting_channel: parse("VOTING_CHANNEL_ID", require("VOTING_CHANNEL_ID")?)?,
            general_channel: parse("GENERAL_CHANNEL_ID", require("GENERAL_CHANNEL_ID")?)?,
            probation_role: parse("TEMP_ROLE_ID", require("TEMP_ROLE_ID")?)?,
            member_role: parse("SUCCESS_ROLE_ID", require("SUCCESS_ROLE_ID")?)?,
            relay_secret: require("RELAY_SECRET")?,
            port: match get("PORT") {
                Some(value) => parse("PORT", value)?,
                None => DEFAULT_PORT,
            },
            required_approvals,
            api_base: get("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// The guild-specific settings the tribunal runs with.
    pub fn vote_settings(&self) -> VoteSettings {
        VoteSettings {
            bot_user: self.bot_user,
            voting_channel: self.voting_channel,
            general_channel: self.general_channel,
            probation_role: self.probation_role,
            member_role: self.member_role,
            required_approvals: self.required_approvals,
        }
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("guild", &self.guild)
            .field("bot_user", &self.bot_user)
            .field("voting_channel", &self.voting_channel)
            .field("general_channel", &self.general_channel)
            .field("probation_role", &self.probation_role)
            .field("member_role", &self.member_role)
            .field("relay_secret", &"<redacted>")
            .field("port", &self.port)
            .field("required_approvals", &self.required_approvals)
            .field("api_base", &self.api_base)
            .finish()
    }
}
