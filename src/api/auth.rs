use crate::error::ApiError;
use crate::login::Identifier;
use crate::models::auth::{
    AdminLoginRequest, SendOtpRequest, StatusResponse, TokenResponse, VerifyOtpRequest,
};
use log::{debug, info};
use reqwest::Client;

use super::{endpoint, read_json};

pub async fn send_otp(
    client: &Client,
    base_url: &str,
    identifier: &Identifier,
) -> Result<StatusResponse, ApiError> {
    debug!("Requesting OTP for {}", identifier);
    let url = endpoint(base_url, "/api/auth/send-otp");
    let request = SendOtpRequest {
        mobile_number: identifier.mobile_number(),
        email: identifier.email(),
    };
    let resp = client.post(&url).json(&request).send().await?;
    let response = read_json::<StatusResponse>(resp, "send OTP").await?;
    info!("OTP sent");
    Ok(response)
}

/// Exchanges an OTP for a voter access token.
pub async fn verify_otp(
    client: &Client,
    base_url: &str,
    identifier: &Identifier,
    otp_code: &str,
) -> Result<String, ApiError> {
    debug!("Verifying OTP for {}", identifier);
    let url = endpoint(base_url, "/api/auth/verify-otp");
    let request = VerifyOtpRequest {
        mobile_number: identifier.mobile_number(),
        email: identifier.email(),
        otp_code: otp_code.trim(),
    };
    let resp = client.post(&url).json(&request).send().await?;
    let response = read_json::<TokenResponse>(resp, "verify OTP").await?;
    info!("OTP verified successfully");
    Ok(response.access_token)
}

pub async fn admin_login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    debug!("Admin login as {}", username);
    let url = endpoint(base_url, "/api/admin/login");
    let request = AdminLoginRequest { username, password };
    let resp = client.post(&url).json(&request).send().await?;
    let response = read_json::<TokenResponse>(resp, "log in as admin").await?;
    info!("Admin logged in");
    Ok(response.access_token)
}
