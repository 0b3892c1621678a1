//! Errors raised by the gateway.
//!
//! Application-level rejections (HTTP 400/404/...) are never errors; they come
//! back as an `ApiResponse` with `status == false`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network, DNS or TLS failure on a path that propagates it
    #[error("{context}. Error: {message}")]
    Transport { context: String, message: String },

    /// FacileWS login could not reach its endpoint
    #[error("Error during login call in FacileWS: {0}")]
    Login(String),

    /// A refreshed token could not be persisted
    #[error("Failed to persist token: {0}")]
    Store(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn transport(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
