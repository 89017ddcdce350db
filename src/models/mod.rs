pub mod auth;
pub mod contestant;
pub mod dashboard;
pub mod vote;
pub mod voting_line;

pub use contestant::{Contestant, ContestantId, Gender, ImageUpload, NewContestant};
pub use dashboard::{ContestantVoteStat, DashboardStats};
pub use vote::{PendingVotes, VoteHistoryEntry, VotingState};
pub use voting_line::{ContestantSummary, NewVotingLine, VotingLine, VotingLineId};
