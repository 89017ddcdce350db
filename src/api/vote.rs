use crate::error::ApiError;
use crate::models::auth::StatusResponse;
use crate::models::vote::{SubmitVotesRequest, VoteHistoryResponse};
use crate::models::{PendingVotes, VoteHistoryEntry, VotingState};
use log::{error, info};
use reqwest::{Client, StatusCode};

use super::{bearer, endpoint, read_json};

/// Contestants, the active voting line and the voter's confirmed total.
///
/// `NotAvailable` means no voting line is active right now.
pub async fn get_vote_state(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<VotingState, ApiError> {
    let url = endpoint(base_url, "/api/vote/state");
    let resp = client
        .get(&url)
        .header("Authorization", bearer(token))
        .send()
        .await?;
    if resp.status() == StatusCode::NOT_FOUND {
        info!("No voting line is active");
        return Err(ApiError::NotAvailable);
    }
    let state = read_json::<VotingState>(resp, "get voting state").await?;
    info!(
        "Voting state received: {} ({} contestants)",
        state.voting_line.name,
        state.contestants.len()
    );
    Ok(state)
}

/// Submits the whole pending map. Anything other than a rejected token comes
/// back as `SubmissionFailed`.
pub async fn submit_votes(
    client: &Client,
    base_url: &str,
    token: &str,
    votes: &PendingVotes,
) -> Result<(), ApiError> {
    let url = endpoint(base_url, "/api/vote/submit");
    let resp = client
        .post(&url)
        .header("Authorization", bearer(token))
        .json(&SubmitVotesRequest { votes })
        .send()
        .await
        .map_err(|e| {
            error!("Vote submission did not reach the server: {}", e);
            ApiError::SubmissionFailed
        })?;

    match resp.status() {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status if status.is_success() => {
            let total: u32 = votes.values().sum();
            match resp.json::<StatusResponse>().await {
                Ok(body) => info!("Submitted {} votes: {}", total, body.status),
                Err(_) => info!("Submitted {} votes", total),
            }
            Ok(())
        }
        status => {
            error!("Vote submission rejected: {}", status);
            Err(ApiError::SubmissionFailed)
        }
    }
}

pub async fn get_vote_history(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<Vec<VoteHistoryEntry>, ApiError> {
    let url = endpoint(base_url, "/api/vote/history");
    let resp = client
        .get(&url)
        .header("Authorization", bearer(token))
        .send()
        .await?;
    let response = read_json::<VoteHistoryResponse>(resp, "get vote history").await?;
    info!("Vote history received: {} entries", response.history.len());
    Ok(response.history)
}
