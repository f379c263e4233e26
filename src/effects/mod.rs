//! Effects-as-data for guild membership and channel messaging.
//!
//! This module defines effect types that describe operations without executing them.
//! This enables:
//! - Case logic that names its collaborator calls as data
//! - Testability via recording interpreters
//! - Logging/tracing of intended operations

use serde::{Deserialize, Serialize};

pub mod interpreter;
pub mod membership;
pub mod messaging;

pub use interpreter::{MembershipInterpreter, MessagingInterpreter};
pub use membership::{MembershipEffect, MembershipResponse};
pub use messaging::{MessagingEffect, MessagingResponse};

/// A unified effect type encompassing both membership and messaging operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect_type", rename_all = "snake_case")]
pub enum Effect {
    /// A role or membership operation.
    Membership(MembershipEffect),
    /// A channel message operation.
    Messaging(MessagingEffect),
}

impl Effect {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Membership(e) => e.name(),
            Effect::Messaging(e) => e.name(),
        }
    }
}

impl From<MembershipEffect> for Effect {
    fn from(effect: MembershipEffect) -> Self {
        Effect::Membership(effect)
    }
}

impl From<MessagingEffect> for Effect {
    fn from(effect: MessagingEffect) -> Self {
        Effect::Messaging(effect)
    }
}
