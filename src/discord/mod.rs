//! Discord REST integration.
//!
//! [`DiscordClient`] implements both effect interpreters, so a
//! [`Tribunal`](crate::vote::Tribunal) can be run directly against a guild.

pub mod client;
pub mod error;
pub mod interpreter;

pub use client::{DEFAULT_API_BASE, DiscordClient};
pub use error::DiscordApiError;
