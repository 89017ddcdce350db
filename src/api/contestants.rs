use crate::error::ApiError;
use crate::models::{Contestant, NewContestant};
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{bearer, endpoint, read_json};

/// Public contestant listing; no token required.
pub async fn list_contestants(client: &Client, base_url: &str) -> Result<Vec<Contestant>, ApiError> {
    let url = endpoint(base_url, "/api/contestants");
    let resp = client.get(&url).send().await?;
    let contestants = read_json::<Vec<Contestant>>(resp, "list contestants").await?;
    info!("Received {} contestants", contestants.len());
    Ok(contestants)
}

pub async fn create_contestant(
    client: &Client,
    base_url: &str,
    token: &str,
    contestant: NewContestant,
) -> Result<Contestant, ApiError> {
    let url = endpoint(base_url, "/api/admin/contestants");
    let mut form = Form::new()
        .text("name", contestant.name)
        .text("age", contestant.age.to_string())
        .text("gender", contestant.gender.as_str())
        .text("details", contestant.details);
    if let Some(image) = contestant.image {
        debug!("Attaching image {} ({} bytes)", image.file_name, image.bytes.len());
        form = form.part("image", Part::bytes(image.bytes).file_name(image.file_name));
    }

    let resp = client
        .post(&url)
        .header("Authorization", bearer(token))
        .multipart(form)
        .send()
        .await?;
    let created = read_json::<Contestant>(resp, "create contestant").await?;
    info!("Created contestant {} ({})", created.name, created.id);
    Ok(created)
}
