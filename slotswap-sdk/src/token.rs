//! Session tokens for all SlotSwap APIs.
//!
//! A session token binds a user id to an expiry time with an HMAC-SHA256
//! signature. The wire format is:
//!
//! ```text
//! {user_id}.{expires_at_unix}.{base64_signature}
//! ```
//!
//! where the signature is `HMAC-SHA256("{user_id}.{expires_at_unix}", secret)`.
//! Tokens travel as `Authorization: Bearer {token}` on HTTP requests and as
//! the `token` query parameter on the WebSocket upgrade.

use std::time::Duration;

/// Prefix of the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Name of the query parameter carrying the token on the WebSocket upgrade.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Errors produced by token verification.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
}

impl From<ring::error::Unspecified> for TokenError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// The authenticated content of a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: i64,
    /// Unix timestamp after which the token is rejected.
    pub expires_at: i64,
}

fn sign(payload: &str, key: &[u8]) -> ring::hmac::Tag {
    ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        payload.as_bytes(),
    )
}

/// Issue a token for `user_id` valid for `ttl` from now.
pub fn issue_session_token(user_id: i64, ttl: Duration, key: &[u8]) -> String {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    issue_session_token_until(user_id, now.saturating_add(ttl), key)
}

/// Issue a token for `user_id` that expires at the given unix timestamp.
pub fn issue_session_token_until(user_id: i64, expires_at: i64, key: &[u8]) -> String {
    let payload = format!("{user_id}.{expires_at}");
    let tag = sign(&payload, key);
    format!(
        "{payload}.{}",
        fast32::base64::RFC4648_NOPAD.encode(tag.as_ref())
    )
}

/// Split a token into `(claims, signed_payload, raw_signature_bytes)`
/// without checking the signature.
fn parse_token(token: &str) -> Result<(SessionClaims, &str, Vec<u8>), TokenError> {
    let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::InvalidFormat)?;
    let (user_id, expires_at) = payload.split_once('.').ok_or(TokenError::InvalidFormat)?;
    let user_id: i64 = user_id.parse().map_err(|_| TokenError::InvalidFormat)?;
    let expires_at: i64 = expires_at.parse().map_err(|_| TokenError::InvalidFormat)?;
    let signature = fast32::base64::RFC4648_NOPAD
        .decode_str(signature)
        .map_err(|_| TokenError::InvalidBase64)?;
    Ok((
        SessionClaims {
            user_id,
            expires_at,
        },
        payload,
        signature,
    ))
}

/// Verify the signature and expiry of a token, returning its claims.
pub fn verify_session_token(token: &str, key: &[u8]) -> Result<SessionClaims, TokenError> {
    let (claims, payload, signature) = parse_token(token)?;
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        payload.as_bytes(),
        &signature,
    )?;
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    if now > claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Extract the token from an `Authorization` header value.
pub fn strip_bearer(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
