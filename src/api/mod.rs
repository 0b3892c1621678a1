//! API gateway for SferaNet and FacileWS
//!
//! One function per backend operation. Each refreshes the relevant token,
//! builds its JSON payload, performs a single request and returns an
//! `ApiResponse`.

mod accounts;
mod attachments;
pub mod client;
mod movements;
mod payload;
mod practices;
mod services;

pub use accounts::{create_account, list_accounts, lookup_customer};
pub use attachments::add_attachments;
pub use client::{ApiResponse, SferanetClient};
pub use movements::add_financial_transaction;
pub use practices::{add_passenger, create_practice, finalize_practice};
pub use services::{add_quote, add_service};

#[cfg(test)]
pub(crate) mod testing {
    use wiremock::MockServer;

    use super::SferanetClient;
    use crate::auth::tokens::fresh_token;
    use crate::auth::{MemoryStore, TokenKind, TokenManager, TokenStore};
    use crate::config::{Credentials, Endpoints, Settings};

    pub fn settings() -> Settings {
        Settings {
            agency_code: "AG001".to_string(),
            agency_id: "7".to_string(),
            attachment_type_id: "3".to_string(),
            ..Default::default()
        }
    }

    /// Client pointed at `server` with both tokens already valid
    pub fn client_for(server: &MockServer) -> SferanetClient {
        let endpoints = Endpoints {
            base_url: server.uri(),
            facilews_login_url: format!("{}/public/login.php", server.uri()),
            facilews_account_url: format!("{}/Api/Rest/Account", server.uri()),
        };

        let mut store = MemoryStore::default();
        for kind in [TokenKind::Primary, TokenKind::Secondary] {
            store
                .set_option(kind.option_key(), &fresh_token())
                .expect("memory store");
        }

        let http = reqwest::Client::new();
        let tokens = TokenManager::new(Box::new(store), http.clone(), &endpoints)
            .with_credentials(Credentials::default(), Credentials::default());
        SferanetClient::new(http, tokens, settings(), endpoints)
    }
}
