//! Token kinds, storage and expiry checks

use anyhow::Result;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::time::{SystemTime, UNIX_EPOCH};

/// A token must outlive this many seconds to be used
pub const EXPIRY_MARGIN_SECS: i64 = 300;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// The two independent bearer tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// SferaNet REST API
    Primary,
    /// FacileWS customer lookup
    Secondary,
}

impl TokenKind {
    /// Key under which the token is persisted
    pub fn option_key(self) -> &'static str {
        match self {
            TokenKind::Primary => "sferanet_token",
            TokenKind::Secondary => "sferanet_facilews_token",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Primary => "SferaNet",
            TokenKind::Secondary => "FacileWS",
        }
    }
}

/// Durable key-value storage for tokens
pub trait TokenStore {
    fn get_option(&self, key: &str) -> Option<String>;
    fn set_option(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    options: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl TokenStore for MemoryStore {
    fn get_option(&self, key: &str) -> Option<String> {
        self.options.get(key).cloned()
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// True iff `token` is a three-part JWT whose `exp` is more than five minutes away.
///
/// Only the expiry is checked; the signature is not verified.
pub fn is_valid(token: Option<&str>) -> bool {
    is_valid_at(token, unix_now())
}

pub fn is_valid_at(token: Option<&str>, now: i64) -> bool {
    match token.and_then(expiry) {
        Some(exp) => exp > now + EXPIRY_MARGIN_SECS,
        None => false,
    }
}

/// `exp` claim of a JWT, if it can be decoded
fn expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let raw = URL_SAFE_LENIENT
        .decode(parts[1])
        .or_else(|_| STANDARD_LENIENT.decode(parts[1]))
        .ok()?;
    let payload: serde_json::Value = serde_json::from_slice(&raw).ok()?;

    let exp = payload.get("exp")?;
    exp.as_i64()
        .or_else(|| exp.as_f64().map(|f| f as i64))
        .or_else(|| exp.as_str().and_then(|s| s.parse().ok()))
}

/// Build an unsigned JWT carrying `exp`
#[cfg(test)]
pub(crate) fn token_expiring_at(exp: i64) -> String {
    let header = URL_SAFE_LENIENT.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_LENIENT.encode(format!(r#"{{"username":"agency","exp":{}}}"#, exp));
    format!("{}.{}.signature", header, payload)
}

#[cfg(test)]
pub(crate) fn fresh_token() -> String {
    token_expiring_at(unix_now() + 3600)
}
