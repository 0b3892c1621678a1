//! Username/password logins for SferaNet and FacileWS
//!
//! Both backends answer a form POST with a JSON body carrying the JWT
//! (`token` for SferaNet, `jwt` for FacileWS). The two flows deliberately
//! differ on transport failure: SferaNet logs it and yields no token,
//! FacileWS raises it.

use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{GatewayError, GatewayResult};

#[derive(Debug, Deserialize)]
struct SferanetLoginResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacileWsLoginResponse {
    jwt: Option<String>,
}

/// POST `{base_url}/login_check`. Never fails; returns `None` when no token came back.
pub async fn login_sferanet(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Option<String> {
    tracing::info!("Logging into SferaNet...");
    let url = format!("{}/login_check", base_url.trim_end_matches('/'));

    let body = match http
        .post(&url)
        .form(&[
            ("_username", credentials.username.as_str()),
            ("_password", credentials.password.as_str()),
        ])
        .send()
        .await
    {
        Ok(resp) => resp.text().await.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("SferaNet login call failed: {}", e);
            String::new()
        }
    };

    match serde_json::from_str::<SferanetLoginResponse>(&body)
        .ok()
        .and_then(|r| r.token)
    {
        Some(token) => {
            tracing::info!("Token successfully acquired.");
            Some(token)
        }
        None => {
            // Also the credentials-mismatch case
            tracing::warn!(
                "Error processing request: token not set in response body. JSON from response: {}",
                body
            );
            None
        }
    }
}

/// POST the FacileWS login form. Transport failures are raised.
pub async fn login_facilews(
    http: &reqwest::Client,
    login_url: &str,
    credentials: &Credentials,
) -> GatewayResult<Option<String>> {
    tracing::info!("Logging into FacileWS...");

    let resp = http
        .post(login_url)
        .form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
        .send()
        .await
        .map_err(|e| GatewayError::Login(e.to_string()))?;
    let body = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<FacileWsLoginResponse>(&body)
        .ok()
        .and_then(|r| r.jwt)
    {
        Some(jwt) => {
            tracing::info!("Token from FacileWS successfully acquired.");
            Ok(Some(jwt))
        }
        None => {
            tracing::warn!("Error processing request: token from FacileWS not set in response body");
            Ok(None)
        }
    }
}
