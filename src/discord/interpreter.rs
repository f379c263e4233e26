//! Effect interpreters backed by the Discord REST API.
//!
//! | Effect          | Request                                                   |
//! |-----------------|-----------------------------------------------------------|
//! | `AddRole`       | `PUT /guilds/{g}/members/{u}/roles/{r}`                   |
//! | `RemoveRole`    | `DELETE /guilds/{g}/members/{u}/roles/{r}`                |
//! | `Kick`          | `DELETE /guilds/{g}/members/{u}` + `X-Audit-Log-Reason`   |
//! | `PostMessage`   | `POST /channels/{c}/messages`                             |
//! | `EditMessage`   | `PATCH /channels/{c}/messages/{m}`                        |
//! | `AddReaction`   | `PUT /channels/{c}/messages/{m}/reactions/{emoji}/@me`    |

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::effects::{
    MembershipEffect, MembershipInterpreter, MembershipResponse, MessagingEffect,
    MessagingInterpreter, MessagingResponse,
};
use crate::types::MessageId;

use super::client::DiscordClient;
use super::error::DiscordApiError;

/// Header Discord records in the guild audit log. Values must be URL-encoded.
const AUDIT_LOG_REASON: &str = "x-audit-log-reason";

// ─── Request / Response Bodies ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    content: &'a str,
    allowed_mentions: AllowedMentions,
}

/// Lets the message ping users it mentions, and nothing else.
#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: [&'static str; 1],
}

impl<'a> MessageBody<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            allowed_mentions: AllowedMentions { parse: ["users"] },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: MessageId,
}

// ─── Interpreter Implementations ──────────────────────────────────────────────

impl MembershipInterpreter for DiscordClient {
    type Error = DiscordApiError;

    async fn interpret(&self, effect: MembershipEffect) -> Result<MembershipResponse, Self::Error> {
        let operation = effect.name();
        let guild = self.guild();
        let request = match &effect {
            MembershipEffect::AddRole { member, role } => self.request(
                Method::PUT,
                &format!("/guilds/{guild}/members/{member}/roles/{role}"),
            ),
            MembershipEffect::RemoveRole { member, role } => self.request(
                Method::DELETE,
                &format!("/guilds/{guild}/members/{member}/roles/{role}"),
            ),
            MembershipEffect::Kick { member, reason } => self
                .request(Method::DELETE, &format!("/guilds/{guild}/members/{member}"))
                .header(AUDIT_LOG_REASON, urlencoding::encode(reason).into_owned()),
        };

        self.send(operation, request).await?;
        Ok(MembershipResponse::Done)
    }
}

impl MessagingInterpreter for DiscordClient {
    type Error = DiscordApiError;

    async fn interpret(&self, effect: MessagingEffect) -> Result<MessagingResponse, Self::Error> {
        let operation = effect.name();
        match &effect {
            MessagingEffect::PostMessage { channel, content } => {
                let request = self
                    .request(Method::POST, &format!("/channels/{channel}/messages"))
                    .json(&MessageBody::new(content));
                let created: CreatedMessage = self
                    .send(operation, request)
                    .await?
                    .json()
                    .await
                    .map_err(|e| DiscordApiError::malformed(operation, e.to_string()))?;
                Ok(MessagingResponse::Posted(created.id))
            }
            MessagingEffect::EditMessage {
                channel,
                message,
                content,
            } => {
                let request = self
                    .request(
                        Method::PATCH,
                        &format!("/channels/{channel}/messages/{message}"),
                    )
                    .json(&MessageBody::new(content));
                self.send(operation, request).await?;
                Ok(MessagingResponse::Done)
            }
            MessagingEffect::AddReaction {
                channel,
                message,
                ballot,
            } => {
                let request = self.request(
                    Method::PUT,
                    &format!(
                        "/channels/{channel}/messages/{message}/reactions/{}/@me",
                        ballot.url_encoded()
                    ),
                );
                self.send(operation, request).await?;
                Ok(MessagingResponse::Done)
            }
        }
    }
}
