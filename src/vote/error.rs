//! Errors raised while running a case.
//!
//! None of these reach the voting community. Intake reports `DuplicateCase`
//! to its caller, reaction handling swallows `UnresolvedSubject`, and
//! `Collaborator` failures are logged where they happen.

use thiserror::Error;

use crate::types::{MessageId, UserId};

/// Errors that can occur while opening, voting on or closing a case.
#[derive(Debug, Error)]
pub enum CaseError {
    /// Intake was attempted for a member whose case is still pending.
    #[error("a case is already pending for member {0}")]
    DuplicateCase(UserId),

    /// A reaction targeted a message that is not the prompt of a pending case.
    #[error("message {0} is not the prompt of a pending case")]
    UnresolvedSubject(MessageId),

    /// A membership or messaging call failed.
    #[error("{operation} failed: {source}")]
    Collaborator {
        /// The effect that failed (e.g. `kick`).
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CaseError {
    /// Wraps an interpreter error with the name of the failed operation.
    pub fn collaborator(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CaseError::Collaborator {
            operation,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_display_names_operation() {
        let err = CaseError::collaborator("kick", std::io::Error::other("missing permissions"));
        assert_eq!(err.to_string(), "kick failed: missing permissions");
    }

    #[test]
    fn duplicate_case_display() {
        assert_eq!(
            CaseError::DuplicateCase(UserId(12)).to_string(),
            "a case is already pending for member 12"
        );
    }
}
