//! Authenticated HTTP client for the SferaNet and FacileWS APIs
//!
//! Wraps reqwest::Client with token refresh and bearer injection, and maps
//! every exchange to the uniform `{status, msg, data}` response.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{TokenKind, TokenManager};
use crate::config::{Config, Endpoints, Settings};
use crate::error::GatewayResult;

pub const INVALID_INPUT: &str = "Invalid input";
pub const NOT_FOUND: &str = "Resource not found.";
pub const GENERIC_ERROR: &str = "Generic error, debug please.";

/// Uniform result of every gateway operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: bool,
    pub msg: String,
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            status: false,
            msg: msg.into(),
            data: None,
        }
    }

    fn log(&self) {
        let rendered = serde_json::to_string(self).unwrap_or_default();
        if self.status {
            tracing::info!("Response: {}", rendered);
        } else {
            tracing::warn!("Response: {}", rendered);
        }
    }
}

/// What came back from one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// 200 or 201
    Success { code: u16, body: Option<Value> },
    /// Any other status code
    Rejected { code: u16, body: Option<Value> },
    /// The request never completed
    Transport(String),
}

impl CallOutcome {
    pub fn code(&self) -> Option<u16> {
        match self {
            CallOutcome::Success { code, .. } | CallOutcome::Rejected { code, .. } => Some(*code),
            CallOutcome::Transport(_) => None,
        }
    }

    /// Map a completed exchange to an `ApiResponse` and log it.
    ///
    /// `shape` builds `data` from the success body. Transport failures come
    /// back as `Err(message)` so each operation decides whether to raise.
    pub fn respond(
        self,
        success_msg: &str,
        fallback_msg: &str,
        shape: impl FnOnce(Option<Value>) -> Option<Value>,
    ) -> Result<ApiResponse, String> {
        let response = match self {
            CallOutcome::Success { body, .. } => ApiResponse {
                status: true,
                msg: success_msg.to_string(),
                data: shape(body),
            },
            CallOutcome::Rejected { code: 400, body } => ApiResponse {
                status: false,
                msg: INVALID_INPUT.to_string(),
                data: body,
            },
            CallOutcome::Rejected { code: 404, .. } => ApiResponse::failure(NOT_FOUND),
            CallOutcome::Rejected { body, .. } => ApiResponse {
                status: false,
                msg: fallback_msg.to_string(),
                data: body,
            },
            CallOutcome::Transport(message) => return Err(message),
        };
        response.log();
        Ok(response)
    }
}

/// Decode a response body: JSON when possible, raw text otherwise.
fn decode_body(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Gateway to both backends
pub struct SferanetClient {
    http: reqwest::Client,
    tokens: TokenManager,
    settings: Settings,
    endpoints: Endpoints,
}

impl SferanetClient {
    pub fn new(
        http: reqwest::Client,
        tokens: TokenManager,
        settings: Settings,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            http,
            tokens,
            settings,
            endpoints,
        }
    }

    /// Build a client whose tokens persist into `config`.
    pub fn from_config(config: Config) -> Self {
        let http = reqwest::Client::new();
        let settings = config.settings.clone();
        let endpoints = config.endpoints.clone();
        let tokens = TokenManager::new(Box::new(config), http.clone(), &endpoints);
        Self::new(http, tokens, settings, endpoints)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenManager {
        &mut self.tokens
    }

    /// Absolute SferaNet URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.base_url.trim_end_matches('/'), path)
    }

    /// Refresh the `kind` token if needed, then perform one request.
    pub async fn send(
        &mut self,
        kind: TokenKind,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> GatewayResult<CallOutcome> {
        self.tokens.ensure_valid(kind).await?;
        let token = self.tokens.get_token(kind).unwrap_or_default();

        tracing::debug!("{} {}", method, url);
        if let Some(payload) = body {
            tracing::debug!("Payload: {}", payload);
        }

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = body {
            request = request.body(payload.to_string());
        }

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(CallOutcome::Transport(e.to_string())),
        };

        let code = resp.status().as_u16();
        let body = decode_body(resp.text().await.unwrap_or_default());
        tracing::debug!("HTTP {} from {}", code, url);

        Ok(match code {
            200 | 201 => CallOutcome::Success { code, body },
            _ => CallOutcome::Rejected { code, body },
        })
    }

    /// Download a remote document without authentication.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        tracing::debug!("Downloading {}", url);
        let resp = self.http.get(url).send().await.map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!(
                "Attachment download returned {}",
                resp.status().as_u16()
            ));
        }
        let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}
