//! Authentication for SferaNet and FacileWS
//!
//! Each backend issues its own JWT through a username/password login.
//! Tokens are refreshed lazily, just before a call, once they come within
//! five minutes of their `exp` claim.

pub mod login;
pub mod manager;
pub mod tokens;

pub use manager::TokenManager;
pub use tokens::{is_valid, TokenKind, TokenStore};
#[cfg(test)]
pub use tokens::MemoryStore;
