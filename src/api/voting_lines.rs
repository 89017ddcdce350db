use crate::error::ApiError;
use crate::models::{NewVotingLine, VotingLine, VotingLineId};
use log::info;
use reqwest::Client;

use super::{bearer, endpoint, expect_success, read_json};

pub async fn list_voting_lines(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<Vec<VotingLine>, ApiError> {
    let url = endpoint(base_url, "/api/admin/voting-lines");
    let resp = client
        .get(&url)
        .header("Authorization", bearer(token))
        .send()
        .await?;
    let lines = read_json::<Vec<VotingLine>>(resp, "list voting lines").await?;
    info!("Received {} voting lines", lines.len());
    Ok(lines)
}

pub async fn create_voting_line(
    client: &Client,
    base_url: &str,
    token: &str,
    line: &NewVotingLine,
) -> Result<VotingLine, ApiError> {
    let url = endpoint(base_url, "/api/admin/voting-lines");
    let resp = client
        .post(&url)
        .header("Authorization", bearer(token))
        .json(line)
        .send()
        .await?;
    let created = read_json::<VotingLine>(resp, "create voting line").await?;
    info!(
        "Created voting line {} with {} contestants",
        created.name,
        line.contestant_ids.len()
    );
    Ok(created)
}

/// Activates or deactivates a voting line.
pub async fn set_voting_line_active(
    client: &Client,
    base_url: &str,
    token: &str,
    line_id: VotingLineId,
    active: bool,
) -> Result<(), ApiError> {
    let action = if active { "activate" } else { "deactivate" };
    let url = endpoint(
        base_url,
        &format!("/api/admin/voting-lines/{}/{}", line_id, action),
    );
    let resp = client
        .patch(&url)
        .header("Authorization", bearer(token))
        .send()
        .await?;
    expect_success(resp, action).await?;
    info!("Voting line {} {}d", line_id, action);
    Ok(())
}
