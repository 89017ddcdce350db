use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::contestant::{Contestant, ContestantId};
use super::voting_line::VotingLine;

/// Staged vote counts per contestant.
pub type PendingVotes = HashMap<ContestantId, u32>;

/// Response of `GET /api/vote/state`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VotingState {
    pub contestants: Vec<Contestant>,
    pub voting_line: VotingLine,
    pub user_total_votes: u32,
}

#[derive(Serialize, Debug)]
pub struct SubmitVotesRequest<'a> {
    pub votes: &'a PendingVotes,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoteHistoryEntry {
    pub voting_line_name: String,
    pub voting_line_dates: String,
    pub contestant_name: String,
    pub vote_count: u32,
    pub voted_at: String,
}

#[derive(Deserialize, Debug)]
pub struct VoteHistoryResponse {
    pub history: Vec<VoteHistoryEntry>,
}
