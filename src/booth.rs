//! View-model behind the voter's voting screen.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};
use reqwest::Client;

use crate::api::vote;
use crate::error::ApiError;
use crate::flight::{Action, FlightGuard, SingleFlight};
use crate::models::{Contestant, ContestantId, PendingVotes, VotingLine, VotingState};
use crate::quota::{TrackerState, VoteQuotaTracker};
use crate::session::SessionContext;

static NEXT_BOOTH: AtomicU64 = AtomicU64::new(1);

pub struct VotingBooth {
    /// Distinguishes this booth from any booth loaded later.
    id: u64,
    line: VotingLine,
    contestants: Vec<Contestant>,
    tracker: VoteQuotaTracker,
    submitting: bool,
}

impl VotingBooth {
    pub fn from_state(state: VotingState) -> Self {
        let tracker = VoteQuotaTracker::new(
            state.voting_line.max_votes_per_user,
            state.user_total_votes,
        );
        Self {
            id: NEXT_BOOTH.fetch_add(1, Ordering::Relaxed),
            line: state.voting_line,
            contestants: state.contestants,
            tracker,
            submitting: false,
        }
    }

    pub fn line(&self) -> &VotingLine {
        &self.line
    }

    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }

    pub fn tracker(&self) -> &VoteQuotaTracker {
        &self.tracker
    }

    pub fn remaining(&self) -> u32 {
        self.tracker.remaining()
    }

    pub fn pending_for(&self, contestant: ContestantId) -> u32 {
        self.tracker.pending_for(contestant)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Vote buttons are live while quota remains and no submission is out.
    pub fn can_vote(&self) -> bool {
        !self.submitting && self.tracker.remaining() > 0
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.tracker.state() == TrackerState::Staged
    }

    /// Stages a vote. Ignored while a submission is in flight or the quota is
    /// used up.
    pub fn vote(&mut self, contestant: ContestantId) -> bool {
        if self.submitting {
            return false;
        }
        self.tracker.increment(contestant)
    }

    /// Claims the submit slot and snapshots what will be sent. Voting is
    /// frozen until [`finish_submission`](Self::finish_submission).
    pub fn begin_submission(
        &mut self,
        session: &SessionContext,
        flights: &SingleFlight,
    ) -> Result<Submission, ApiError> {
        if self.tracker.state() == TrackerState::Idle {
            return Err(ApiError::ValidationFailed("No votes to submit.".to_owned()));
        }
        let token = session.token()?.to_owned();
        let flight = flights.begin(Action::SubmitVotes)?;
        self.submitting = true;
        Ok(Submission {
            _flight: flight,
            booth: self.id,
            token,
            votes: self.tracker.pending(),
        })
    }

    /// Applies the server's answer. On success exactly the submitted votes
    /// become confirmed; on any failure they stay staged for a retry. A
    /// rejected token also ends the session.
    ///
    /// An outcome from a booth this one replaced only goes through the
    /// session guard. Its votes were never staged here.
    pub fn finish_submission(
        &mut self,
        session: &mut SessionContext,
        outcome: SubmissionOutcome,
    ) -> Result<u32, ApiError> {
        let SubmissionOutcome {
            booth,
            votes,
            result,
        } = outcome;
        let submitted: u32 = votes.values().sum();
        if booth != self.id {
            session.guard(result)?;
            warn!(
                "{} votes confirmed for a replaced booth, leaving this one untouched",
                submitted
            );
            return Ok(submitted);
        }
        self.submitting = false;
        session.guard(result)?;
        self.tracker.settle(&votes);
        info!(
            "{} votes confirmed, {} remaining",
            submitted,
            self.tracker.remaining()
        );
        Ok(submitted)
    }
}

/// An outstanding vote submission. Holds the submit slot until dropped.
pub struct Submission {
    _flight: FlightGuard,
    booth: u64,
    token: String,
    votes: PendingVotes,
}

pub struct SubmissionOutcome {
    booth: u64,
    votes: PendingVotes,
    result: Result<(), ApiError>,
}

impl Submission {
    pub fn votes(&self) -> &PendingVotes {
        &self.votes
    }

    pub async fn send(self, client: &Client, base_url: &str) -> SubmissionOutcome {
        let result = vote::submit_votes(client, base_url, &self.token, &self.votes).await;
        if let Err(e) = &result {
            warn!("Vote submission failed: {}", e);
        }
        SubmissionOutcome {
            booth: self.booth,
            votes: self.votes,
            result,
        }
    }
}

/// Fetches the voting state and wraps it in a fresh booth.
pub async fn fetch_booth(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<VotingBooth, ApiError> {
    vote::get_vote_state(client, base_url, token)
        .await
        .map(VotingBooth::from_state)
}
