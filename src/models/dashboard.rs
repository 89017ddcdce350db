use serde::{Deserialize, Serialize};

use super::contestant::ContestantId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContestantVoteStat {
    #[serde(default)]
    pub contestant_id: Option<ContestantId>,
    pub contestant_name: String,
    pub total_votes: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub voting_line_name: String,
    pub stats: Vec<ContestantVoteStat>,
}

impl DashboardStats {
    /// Largest per-contestant total, used to scale the bars.
    pub fn peak(&self) -> u64 {
        self.stats.iter().map(|s| s.total_votes).max().unwrap_or(0)
    }
}
