//! Thin request/response layer over the voting backend.
//!
//! Every function takes the shared [`reqwest::Client`] and the API base URL,
//! plus a bearer token when the endpoint needs one. Tokens are passed in by
//! the caller; nothing here reads or writes session storage.

use log::error;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub mod admin;
pub mod auth;
pub mod contestants;
pub mod vote;
pub mod voting_lines;

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

async fn read_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json::<T>().await?)
    } else {
        error!("Failed to {}: {}", what, status);
        Err(ApiError::from_status(status))
    }
}

async fn expect_success(resp: Response, what: &str) -> Result<(), ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        error!("Failed to {}: {}", what, status);
        Err(ApiError::from_status(status))
    }
}
