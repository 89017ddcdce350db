use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contestant::ContestantId;

pub type VotingLineId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContestantSummary {
    pub id: ContestantId,
    pub name: String,
}

/// A voting period. Voters only receive `id`, `name` and the quota; the admin
/// listing fills in the rest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VotingLine {
    pub id: VotingLineId,
    pub name: String,
    pub max_votes_per_user: u32,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub contestants: Vec<ContestantSummary>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewVotingLine {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_votes_per_user: u32,
    pub contestant_ids: Vec<ContestantId>,
}
