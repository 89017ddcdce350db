use crate::error::ApiError;
use crate::models::{DashboardStats, VotingLineId};
use log::info;
use reqwest::Client;

use super::{bearer, endpoint, read_json};

/// Aggregated vote totals per contestant for one voting line.
pub async fn get_dashboard_stats(
    client: &Client,
    base_url: &str,
    token: &str,
    line_id: VotingLineId,
) -> Result<DashboardStats, ApiError> {
    let url = endpoint(base_url, &format!("/api/admin/dashboard-stats/{}", line_id));
    let resp = client
        .get(&url)
        .header("Authorization", bearer(token))
        .send()
        .await?;
    let stats = read_json::<DashboardStats>(resp, "get dashboard stats").await?;
    info!("Dashboard stats received for {}", stats.voting_line_name);
    Ok(stats)
}
