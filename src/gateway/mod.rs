//! Gateway dispatches forwarded by the relay.
//!
//! This module provides:
//! - Signature verification for relayed payloads (HMAC-SHA256)
//! - Parsing of the dispatches the bot acts on into typed events

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{GatewayEvent, MemberJoinedEvent, ReactionEvent};
pub use parser::{ParseError, parse_dispatch};
pub use signature::{SIGNATURE_HEADER, decode_signature, sign, verify};
