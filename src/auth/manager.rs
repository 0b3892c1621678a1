//! Token lifecycle: cache, persistence and refresh-on-expiry

use std::collections::HashMap;

use super::login::{login_facilews, login_sferanet};
use super::tokens::{is_valid, TokenKind, TokenStore};
use crate::config::{Credentials, Endpoints};
use crate::error::{GatewayError, GatewayResult};

/// Owns the SferaNet and FacileWS bearer tokens.
///
/// Reads go through an in-process cache backed by the store; writes hit both.
pub struct TokenManager {
    store: Box<dyn TokenStore + Send>,
    cache: HashMap<TokenKind, String>,
    http: reqwest::Client,
    base_url: String,
    facilews_login_url: String,
    sferanet: Credentials,
    facilews: Credentials,
}

impl TokenManager {
    /// Build a manager with credentials taken from the environment.
    pub fn new(
        store: Box<dyn TokenStore + Send>,
        http: reqwest::Client,
        endpoints: &Endpoints,
    ) -> Self {
        Self {
            store,
            cache: HashMap::new(),
            http,
            base_url: endpoints.base_url.clone(),
            facilews_login_url: endpoints.facilews_login_url.clone(),
            sferanet: Credentials::sferanet(),
            facilews: Credentials::facilews(),
        }
    }

    #[cfg(test)]
    pub fn with_credentials(mut self, sferanet: Credentials, facilews: Credentials) -> Self {
        self.sferanet = sferanet;
        self.facilews = facilews;
        self
    }

    /// Cached token, falling back to the store
    pub fn get_token(&self, kind: TokenKind) -> Option<String> {
        self.cache
            .get(&kind)
            .cloned()
            .or_else(|| self.store.get_option(kind.option_key()))
    }

    /// Persist `value` and cache it
    pub fn set_token(&mut self, kind: TokenKind, value: &str) -> GatewayResult<&mut Self> {
        self.store
            .set_option(kind.option_key(), value)
            .map_err(|e| GatewayError::Store(format!("{:#}", e)))?;
        self.cache.insert(kind, value.to_string());
        Ok(self)
    }

    /// Log in again unless the current token outlives the expiry margin.
    ///
    /// A login that yields no token leaves the old value in place and is not
    /// an error; only a FacileWS transport failure is raised.
    pub async fn ensure_valid(&mut self, kind: TokenKind) -> GatewayResult<()> {
        let current = self.get_token(kind);
        if is_valid(current.as_deref()) {
            return Ok(());
        }

        tracing::info!("{} token not valid, refreshing...", kind.label());
        match self.login(kind).await? {
            Some(token) => {
                self.set_token(kind, &token)?;
                tracing::info!("{} token refreshed", kind.label());
            }
            None => {
                tracing::warn!("{} login returned no token", kind.label());
            }
        }
        Ok(())
    }

    async fn login(&self, kind: TokenKind) -> GatewayResult<Option<String>> {
        match kind {
            TokenKind::Primary => {
                Ok(login_sferanet(&self.http, &self.base_url, &self.sferanet).await)
            }
            TokenKind::Secondary => {
                login_facilews(&self.http, &self.facilews_login_url, &self.facilews).await
            }
        }
    }
}
