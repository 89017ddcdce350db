//! Local bookkeeping of votes staged against a voter's quota.
//!
//! The server re-validates every submission; this only keeps the UI from
//! offering votes the voter cannot cast.

use std::collections::HashMap;

use crate::models::{ContestantId, PendingVotes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Nothing staged.
    Idle,
    /// At least one vote staged and not yet submitted.
    Staged,
}

/// Invariant: `confirmed + total_pending() <= max_votes`.
#[derive(Debug, Clone)]
pub struct VoteQuotaTracker {
    max_votes: u32,
    confirmed: u32,
    pending: HashMap<ContestantId, u32>,
}

impl VoteQuotaTracker {
    pub fn new(max_votes: u32, confirmed: u32) -> Self {
        Self {
            max_votes,
            confirmed,
            pending: HashMap::new(),
        }
    }

    pub fn max_votes(&self) -> u32 {
        self.max_votes
    }

    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    pub fn remaining(&self) -> u32 {
        self.max_votes
            .saturating_sub(self.confirmed)
            .saturating_sub(self.total_pending())
    }

    pub fn total_pending(&self) -> u32 {
        self.pending.values().sum()
    }

    pub fn pending_for(&self, contestant: ContestantId) -> u32 {
        self.pending.get(&contestant).copied().unwrap_or(0)
    }

    /// Snapshot of the staged votes, suitable for a submit request.
    pub fn pending(&self) -> PendingVotes {
        self.pending.clone()
    }

    pub fn state(&self) -> TrackerState {
        if self.total_pending() > 0 {
            TrackerState::Staged
        } else {
            TrackerState::Idle
        }
    }

    /// Stages one vote for `contestant`. Returns `false` and leaves the
    /// tracker untouched when the quota is exhausted.
    pub fn increment(&mut self, contestant: ContestantId) -> bool {
        if self.remaining() == 0 {
            return false;
        }
        *self.pending.entry(contestant).or_insert(0) += 1;
        true
    }

    /// Folds the staged votes into the confirmed total. Only call after the
    /// server accepted the submission.
    pub fn reset(&mut self) {
        let submitted = self.total_pending();
        self.pending.clear();
        self.confirmed += submitted;
    }

    /// Confirms exactly the votes in `submitted`, taking them out of the
    /// staged map. Votes staged after the snapshot stay pending.
    pub fn settle(&mut self, submitted: &PendingVotes) -> u32 {
        let mut settled = 0;
        for (contestant, &count) in submitted {
            let Some(staged) = self.pending.get_mut(contestant) else {
                continue;
            };
            let taken = count.min(*staged);
            *staged -= taken;
            if *staged == 0 {
                self.pending.remove(contestant);
            }
            settled += taken;
        }
        self.confirmed += settled;
        settled
    }
}
