//! Effect interpreter traits.
//!
//! These traits define how effects are executed. `DiscordClient` implements
//! both against the Discord REST API; tests use `RecordingInterpreter`.
//!
//! The trait-based design enables:
//! - Mock interpreters for testing
//! - Failure injection for the degraded paths of intake and resolution

use std::future::Future;

use super::membership::{MembershipEffect, MembershipResponse};
use super::messaging::{MessagingEffect, MessagingResponse};

/// Interprets membership effects against a guild.
///
/// Implementations are constructed with a `GuildId`, so all effects executed
/// through a single interpreter instance are scoped to that guild.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct NoopMembership;
///
/// impl MembershipInterpreter for NoopMembership {
///     type Error = std::io::Error;
///
///     async fn interpret(&self, _: MembershipEffect) -> Result<MembershipResponse, Self::Error> {
///         Ok(MembershipResponse::Done)
///     }
/// }
/// ```
pub trait MembershipInterpreter {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a membership effect and return its response.
    fn interpret(
        &self,
        effect: MembershipEffect,
    ) -> impl Future<Output = Result<MembershipResponse, Self::Error>> + Send;
}

/// Interprets messaging effects against channels.
pub trait MessagingInterpreter {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a messaging effect and return its response.
    fn interpret(
        &self,
        effect: MessagingEffect,
    ) -> impl Future<Output = Result<MessagingResponse, Self::Error>> + Send;
}
