//! Session authentication configuration.

use crate::identity::{AuthError, IdentityGateway};
use slotswap_sdk::token::{issue_session_token, strip_bearer, verify_session_token};
use std::time::Duration;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Secret and lifetime used to issue and verify session tokens.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret key bytes for HMAC signing.
    pub token_secret: Box<[u8]>,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<Box<[u8]>>, token_ttl: Duration) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl,
        }
    }

    pub fn secret_bytes(&self) -> &[u8] {
        &self.token_secret
    }

    /// Issue a token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: i64) -> String {
        issue_session_token(user_id, self.token_ttl, &self.token_secret)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl IdentityGateway for AuthConfig {
    /// Accepts either a bare token or an `Authorization` header value.
    fn authenticate(&self, credential: &str) -> Result<i64, AuthError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        let token = strip_bearer(credential).unwrap_or(credential);
        let claims = verify_session_token(token, &self.token_secret)?;
        Ok(claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotswap_sdk::token::TokenError;

    #[test]
    fn authenticates_issued_tokens() {
        let auth = AuthConfig::new(b"secret".to_vec(), DEFAULT_TOKEN_TTL);
        let token = auth.issue(42);
        assert_eq!(auth.authenticate(&token), Ok(42));
        assert_eq!(auth.authenticate(&format!("Bearer {token}")), Ok(42));
    }

    #[test]
    fn rejects_tokens_from_another_secret() {
        let issuer = AuthConfig::new(b"old".to_vec(), DEFAULT_TOKEN_TTL);
        let verifier = AuthConfig::new(b"new".to_vec(), DEFAULT_TOKEN_TTL);
        assert_eq!(
            verifier.authenticate(&issuer.issue(1)),
            Err(AuthError::Invalid(TokenError::SignatureMismatch))
        );
        assert_eq!(verifier.authenticate("  "), Err(AuthError::MissingCredential));
    }
}
