//! HTTP client scoped to one guild.
//!
//! Effects carry member, role, channel and message IDs but never the guild;
//! the client supplies it, so every membership call targets the configured
//! guild.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

use crate::types::GuildId;

use super::error::DiscordApiError;

/// Production REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/gatekeeper, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A Discord REST client authenticated as the bot and scoped to a guild.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    guild: GuildId,
}

impl DiscordClient {
    /// Creates a client for `guild` talking to `base_url`.
    ///
    /// `base_url` is normally [`DEFAULT_API_BASE`]; tests point it at a
    /// local server.
    pub fn new(
        token: impl Into<String>,
        guild: GuildId,
        base_url: impl Into<String>,
    ) -> Result<Self, DiscordApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DiscordApiError::transport("build_client", e))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            guild,
        })
    }

    /// Returns the guild this client is scoped to.
    pub fn guild(&self) -> GuildId {
        self.guild
    }

    /// Starts an authenticated request to `path` (which begins with `/`).
    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Sends `request`, turning transport failures and non-success statuses
    /// into [`DiscordApiError`].
    pub(super) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, DiscordApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| DiscordApiError::transport(operation, e))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "Discord responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DiscordApiError::status(operation, status, &body))
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("base_url", &self.base_url)
            .field("guild", &self.guild)
            .finish_non_exhaustive()
    }
}
