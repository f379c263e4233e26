//! Applying ballot reactions to a pending case.
//!
//! # Mutation rule
//!
//! | Event    | 👍 approve              | 👎 reject               |
//! |----------|-------------------------|-------------------------|
//! | added    | insert voter            | remove voter            |
//! | removed  | remove voter            | insert voter            |
//!
//! Withdrawing a reject therefore counts as an approval.
//!
//! # Resolution
//!
//! After every mutation: reaching the threshold promotes. Otherwise, if the
//! event was a reject being withdrawn, the case resolves to reject. Adding
//! reactions can never reject a case.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::error::CaseError;
use super::outcome::{Decision, Resolution};
use super::tribunal::Tribunal;
use crate::effects::{MembershipInterpreter, MessagingInterpreter};
use crate::gateway::ReactionEvent;
use crate::types::{Ballot, ReactionChange, UserId};

/// A single voter's reaction change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub ballot: Ballot,
    pub change: ReactionChange,
    pub voter: UserId,
}

/// Applies `vote` to an approval set.
pub fn apply_vote(approvals: &mut BTreeSet<UserId>, vote: &Vote) {
    match (vote.change, vote.ballot) {
        (ReactionChange::Added, Ballot::Approve) | (ReactionChange::Removed, Ballot::Reject) => {
            approvals.insert(vote.voter);
        }
        (ReactionChange::Added, Ballot::Reject) | (ReactionChange::Removed, Ballot::Approve) => {
            approvals.remove(&vote.voter);
        }
    }
}

/// Decides whether a case is over after `vote` left it with `approvals`.
pub fn evaluate(approvals: usize, vote: &Vote, required: usize) -> Option<Decision> {
    if approvals >= required {
        Some(Decision::Promote)
    } else if vote.change == ReactionChange::Removed && vote.ballot == Ballot::Reject {
        Some(Decision::Reject)
    } else {
        None
    }
}

/// Why a reaction event was dropped without touching any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The reactor is the bot itself or another bot account.
    BotReaction,
    /// The reaction is outside the voting channel.
    ForeignChannel,
    /// The message is not the prompt of a pending case.
    UnresolvedSubject,
}

/// Result of processing one reaction event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    Ignored(IgnoreReason),
    /// The vote was counted and the case is still open.
    Pending { subject: UserId, approvals: usize },
    /// The vote ended the case.
    Resolved {
        subject: UserId,
        resolution: Resolution,
    },
}

impl ReactionOutcome {
    /// Short label for responses and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ReactionOutcome::Ignored(_) => "ignored",
            ReactionOutcome::Pending { .. } => "pending",
            ReactionOutcome::Resolved { resolution, .. } => resolution.label(),
        }
    }
}

/// The state of a case right after a vote was applied.
#[derive(Debug, Clone, Copy)]
struct Tally {
    subject: UserId,
    approvals: usize,
    decision: Option<Decision>,
}

impl<I> Tribunal<I>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync,
{
    /// Counts a reaction and closes the case if it reached a decision.
    pub async fn process_reaction(&self, event: &ReactionEvent) -> ReactionOutcome {
        if event.reactor_is_bot || event.reactor == self.settings.bot_user {
            return ReactionOutcome::Ignored(IgnoreReason::BotReaction);
        }
        if event.channel != self.settings.voting_channel {
            return ReactionOutcome::Ignored(IgnoreReason::ForeignChannel);
        }

        let vote = Vote {
            ballot: event.ballot,
            change: event.change,
            voter: event.reactor,
        };
        let tally = match self.cast(event, vote).await {
            Ok(tally) => tally,
            Err(err) => {
                debug!(voter = %vote.voter, error = %err, "Discarding reaction");
                return ReactionOutcome::Ignored(IgnoreReason::UnresolvedSubject);
            }
        };

        debug!(
            subject = %tally.subject,
            voter = %vote.voter,
            ballot = %vote.ballot,
            change = %vote.change,
            approvals = tally.approvals,
            "Vote counted"
        );

        match tally.decision {
            None => ReactionOutcome::Pending {
                subject: tally.subject,
                approvals: tally.approvals,
            },
            Some(decision) => {
                info!(
                    subject = %tally.subject,
                    decision = %decision,
                    approvals = tally.approvals,
                    "Case reached a decision"
                );
                ReactionOutcome::Resolved {
                    subject: tally.subject,
                    resolution: self.execute(decision, tally.subject).await,
                }
            }
        }
    }

    /// Applies `vote` and evaluates the case in one store operation.
    async fn cast(&self, event: &ReactionEvent, vote: Vote) -> Result<Tally, CaseError> {
        let required = self.settings.required_approvals;
        self.store
            .update_by_prompt(event.message, |record| {
                apply_vote(&mut record.approvals, &vote);
                let approvals = record.approval_count();
                Tally {
                    subject: record.subject,
                    approvals,
                    decision: evaluate(approvals, &vote, required),
                }
            })
            .await
            .ok_or(CaseError::UnresolvedSubject(event.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_vote, arb_voter};
    use proptest::prelude::*;

    fn vote(ballot: Ballot, change: ReactionChange, voter: u64) -> Vote {
        Vote {
            ballot,
            change,
            voter: UserId(voter),
        }
    }

    #[test]
    fn approve_added_inserts() {
        let mut approvals = BTreeSet::new();
        apply_vote(&mut approvals, &vote(Ballot::Approve, ReactionChange::Added, 1));
        assert!(approvals.contains(&UserId(1)));
    }

    #[test]
    fn reject_added_cancels_existing_approval() {
        let mut approvals = BTreeSet::from([UserId(1), UserId(2)]);
        apply_vote(&mut approvals, &vote(Ballot::Reject, ReactionChange::Added, 1));
        assert_eq!(approvals, BTreeSet::from([UserId(2)]));
    }

    #[test]
    fn reject_removed_counts_as_approval() {
        let mut approvals = BTreeSet::new();
        apply_vote(&mut approvals, &vote(Ballot::Reject, ReactionChange::Removed, 3));
        assert_eq!(approvals, BTreeSet::from([UserId(3)]));
    }

    #[test]
    fn threshold_promotes_on_any_path() {
        for (ballot, change) in [
            (Ballot::Approve, ReactionChange::Added),
            (Ballot::Reject, ReactionChange::Removed),
        ] {
            assert_eq!(
                evaluate(3, &vote(ballot, change, 1), 3),
                Some(Decision::Promote)
            );
        }
    }

    #[test]
    fn reject_withdrawal_below_threshold_rejects() {
        let v = vote(Ballot::Reject, ReactionChange::Removed, 1);
        assert_eq!(evaluate(1, &v, 3), Some(Decision::Reject));
    }

    #[test]
    fn additions_below_threshold_stay_pending() {
        assert_eq!(
            evaluate(2, &vote(Ballot::Approve, ReactionChange::Added, 1), 3),
            None
        );
        assert_eq!(
            evaluate(0, &vote(Ballot::Reject, ReactionChange::Added, 1), 3),
            None
        );
    }

    #[test]
    fn approve_withdrawal_below_threshold_stays_pending() {
        let v = vote(Ballot::Approve, ReactionChange::Removed, 1);
        assert_eq!(evaluate(0, &v, 3), None);
    }

    proptest! {
        /// Adding then removing an approve leaves the set as it was, provided
        /// the voter was not already approving.
        #[test]
        fn approve_add_then_remove_is_noop(
            existing in prop::collection::btree_set(arb_voter(), 0..6),
            voter in arb_voter(),
        ) {
            prop_assume!(!existing.contains(&voter));
            let mut approvals = existing.clone();
            apply_vote(&mut approvals, &Vote { ballot: Ballot::Approve, change: ReactionChange::Added, voter });
            apply_vote(&mut approvals, &Vote { ballot: Ballot::Approve, change: ReactionChange::Removed, voter });
            prop_assert_eq!(approvals, existing);
        }

        /// Each voter contributes at most one approval, and only voters who
        /// voted can appear in the set.
        #[test]
        fn approvals_are_a_subset_of_voters(votes in prop::collection::vec(arb_vote(), 0..40)) {
            let mut approvals = BTreeSet::new();
            for v in &votes {
                apply_vote(&mut approvals, v);
            }
            let voters: BTreeSet<UserId> = votes.iter().map(|v| v.voter).collect();
            prop_assert!(approvals.is_subset(&voters));
        }

        /// A voter's membership depends only on their own last vote.
        #[test]
        fn last_vote_decides_membership(votes in prop::collection::vec(arb_vote(), 1..40)) {
            let mut approvals = BTreeSet::new();
            for v in &votes {
                apply_vote(&mut approvals, v);
            }
            for voter in votes.iter().map(|v| v.voter) {
                let last = votes.iter().rev().find(|v| v.voter == voter).unwrap();
                let counted = matches!(
                    (last.change, last.ballot),
                    (ReactionChange::Added, Ballot::Approve) | (ReactionChange::Removed, Ballot::Reject)
                );
                prop_assert_eq!(approvals.contains(&voter), counted);
            }
        }

        /// Additions never produce a reject decision.
        #[test]
        fn additions_never_reject(approvals in 0usize..10, v in arb_vote(), required in 1usize..6) {
            prop_assume!(v.change == ReactionChange::Added);
            prop_assert_ne!(evaluate(approvals, &v, required), Some(Decision::Reject));
        }
    }
}
