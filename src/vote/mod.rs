//! Probation cases and the reaction vote that decides them.
//!
//! A member joining opens a case; ballot reactions on the case's prompt
//! mutate its approval set; a decision hands the case to the executor, which
//! claims it and performs the role changes and announcements.
//!
//! # Module Structure
//!
//! - [`store`]: Pending cases and the prompt → subject index
//! - [`intake`]: Opening a case
//! - [`reactions`]: The mutation and resolution rules
//! - [`outcome`]: At-most-once execution of a decision
//! - [`tribunal`]: The engine tying the above to a collaborator

pub mod error;
pub mod intake;
pub mod notice;
pub mod outcome;
pub mod reactions;
pub mod record;
pub mod store;
pub mod tribunal;


pub use error::CaseError;
pub use intake::IntakeReport;
pub use outcome::{Decision, Resolution};
pub use reactions::{IgnoreReason, ReactionOutcome, Vote, apply_vote, evaluate};
pub use record::{PromptHandle, VoteRecord};
pub use store::VoteStore;
pub use tribunal::{DEFAULT_REQUIRED_APPROVALS, EventOutcome, Tribunal, VoteSettings};
