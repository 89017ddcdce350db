use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct SendOtpRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

#[derive(Serialize, Debug)]
pub struct VerifyOtpRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub otp_code: &'a str,
}

#[derive(Serialize, Debug)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Subset of the ip-api.com lookup response.
#[derive(Deserialize, Debug)]
pub struct GeoLookupResponse {
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
}
