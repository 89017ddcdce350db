//! Voter identifier handling: which identifier to ask for and whether what
//! the voter typed looks like one.

use std::fmt;
use std::future::Future;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::error::ApiError;
use crate::models::auth::GeoLookupResponse;

static MOBILE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Country whose voters sign in with a mobile number.
const MOBILE_COUNTRY: &str = "IN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    Mobile,
    Email,
}

impl LoginMethod {
    pub fn label(&self) -> &'static str {
        match self {
            LoginMethod::Mobile => "Mobile Number",
            LoginMethod::Email => "Email Address",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            LoginMethod::Mobile => "Enter 10-digit number",
            LoginMethod::Email => "Enter your email",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Mobile(String),
    Email(String),
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Mobile(s) | Identifier::Email(s) => s,
        }
    }

    pub fn mobile_number(&self) -> Option<&str> {
        match self {
            Identifier::Mobile(s) => Some(s),
            Identifier::Email(_) => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Identifier::Email(s) => Some(s),
            Identifier::Mobile(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mobile for voters located in India, email for everyone else and whenever
/// the lookup failed.
pub fn resolve_login_method<E>(lookup: Result<Option<String>, E>) -> LoginMethod {
    match lookup {
        Ok(Some(code)) if code.eq_ignore_ascii_case(MOBILE_COUNTRY) => LoginMethod::Mobile,
        _ => LoginMethod::Email,
    }
}

pub fn validate_identifier(method: LoginMethod, input: &str) -> Result<Identifier, ApiError> {
    let input = input.trim();
    match method {
        LoginMethod::Mobile if MOBILE_PATTERN.is_match(input) => {
            Ok(Identifier::Mobile(input.to_owned()))
        }
        LoginMethod::Mobile => Err(ApiError::ValidationFailed(
            "Please enter a valid 10-digit mobile number.".to_owned(),
        )),
        LoginMethod::Email if EMAIL_PATTERN.is_match(input) => {
            Ok(Identifier::Email(input.to_owned()))
        }
        LoginMethod::Email => Err(ApiError::ValidationFailed(
            "Please enter a valid email address.".to_owned(),
        )),
    }
}

/// Source of the voter's country code.
pub trait LocationLookup {
    fn country_code(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}

/// Looks the country up through an ip-api.com compatible endpoint.
#[derive(Clone)]
pub struct IpApiLookup {
    client: Client,
    url: String,
}

impl IpApiLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl LocationLookup for IpApiLookup {
    fn country_code(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send {
        let client = self.client.clone();
        let url = self.url.clone();
        async move {
            let resp = client.get(&url).send().await?;
            if !resp.status().is_success() {
                return Err(ApiError::from_status(resp.status()));
            }
            let body = resp.json::<GeoLookupResponse>().await?;
            debug!("Location lookup returned {:?}", body.country_code);
            Ok(body.country_code)
        }
    }
}

/// Runs the lookup once and falls back to email on any failure.
pub async fn detect_login_method<L: LocationLookup>(lookup: &L) -> LoginMethod {
    let result = lookup.country_code().await;
    if let Err(e) = &result {
        warn!("Could not fetch location, defaulting to email: {}", e);
    }
    resolve_login_method(result)
}
