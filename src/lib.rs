//! Gatekeeper - A Discord bot that puts new members on probation and lets the
//! community vote them in or out with reactions.
//!
//! This library provides the vote engine, the gateway event model, the
//! Discord REST collaborator and the HTTP server the binary runs.

pub mod config;
pub mod discord;
pub mod effects;
pub mod gateway;
pub mod server;
pub mod types;
pub mod vote;

#[cfg(test)]
mod test_utils;
