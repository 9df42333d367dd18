//! Identity Gateway: maps a credential to a user id.

use slotswap_sdk::token::TokenError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential: {0}")]
    Invalid(#[from] TokenError),
}

/// Authenticates the caller of every client operation.
pub trait IdentityGateway: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<i64, AuthError>;
}
