//! In-memory store of pending cases.
//!
//! The store keeps two maps under one lock: subject → record, and prompt
//! message → subject. Every method is a single lock-scoped operation, and no
//! method holds the lock across a collaborator call, so two handlers for the
//! same case can interleave only between store operations.
//!
//! `remove` returns the record it took out. Exactly one caller can receive
//! `Some` for a given case, which makes it the arbitration point for
//! executing an outcome.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::Mutex;

use super::error::CaseError;
use super::record::{PromptHandle, VoteRecord};
use crate::types::{MessageId, UserId};

#[derive(Debug, Default)]
struct Docket {
    cases: HashMap<UserId, VoteRecord>,
    prompts: HashMap<MessageId, UserId>,
}

/// Thread-safe store of pending vote records.
#[derive(Debug, Default)]
pub struct VoteStore {
    docket: Mutex<Docket>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a case for `subject`.
    ///
    /// Fails with [`CaseError::DuplicateCase`] if one is already pending.
    pub async fn create(
        &self,
        subject: UserId,
        subject_tag: impl Into<String>,
    ) -> Result<VoteRecord, CaseError> {
        let mut docket = self.docket.lock().await;
        match docket.cases.entry(subject) {
            Entry::Occupied(_) => Err(CaseError::DuplicateCase(subject)),
            Entry::Vacant(slot) => Ok(slot.insert(VoteRecord::new(subject, subject_tag)).clone()),
        }
    }

    /// Returns a snapshot of the pending record for `subject`, if any.
    pub async fn get(&self, subject: UserId) -> Option<VoteRecord> {
        let docket = self.docket.lock().await;
        docket.cases.get(&subject).cloned()
    }

    /// Removes the case for `subject`, along with its prompt binding.
    ///
    /// Removing an absent case is a no-op and returns `None`.
    pub async fn remove(&self, subject: UserId) -> Option<VoteRecord> {
        let mut docket = self.docket.lock().await;
        let record = docket.cases.remove(&subject)?;
        if let Some(prompt) = record.prompt {
            docket.prompts.remove(&prompt.message);
        }
        Some(record)
    }

    /// Attaches the posted prompt to `subject`'s case and indexes it.
    ///
    /// Returns `false` if the case is no longer pending.
    pub async fn bind_prompt(&self, subject: UserId, prompt: PromptHandle) -> bool {
        let mut docket = self.docket.lock().await;
        let Some(record) = docket.cases.get_mut(&subject) else {
            return false;
        };
        let previous = record.prompt.replace(prompt);
        if let Some(previous) = previous {
            docket.prompts.remove(&previous.message);
        }
        docket.prompts.insert(prompt.message, subject);
        true
    }

    /// Returns the subject whose pending case owns `message` as its prompt.
    #[cfg(test)]
    pub async fn subject_for(&self, message: MessageId) -> Option<UserId> {
        let docket = self.docket.lock().await;
        docket.prompts.get(&message).copied()
    }

    /// Runs `update` on the pending case whose prompt is `message`.
    ///
    /// Lookup and mutation happen under one lock acquisition. Returns `None`
    /// without calling `update` if no pending case owns the message.
    pub async fn update_by_prompt<F, R>(&self, message: MessageId, update: F) -> Option<R>
    where
        F: FnOnce(&mut VoteRecord) -> R + Send,
    {
        let mut docket = self.docket.lock().await;
        let subject = *docket.prompts.get(&message)?;
        let record = docket.cases.get_mut(&subject)?;
        Some(update(record))
    }

    /// Number of pending cases.
    pub async fn len(&self) -> usize {
        self.docket.lock().await.cases.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copies of all pending cases, oldest first.
    pub async fn pending(&self) -> Vec<VoteRecord> {
        let mut records: Vec<VoteRecord> =
            self.docket.lock().await.cases.values().cloned().collect();
        records.sort_by_key(|r| (r.opened_at, r.subject));
        records
    }
}
