//! Custom Axum extractors for request authentication and decoding.
//!
//! Provides:
//! - `AuthenticatedUser`: resolves the caller from `Authorization: Bearer`
//!   or, for the WebSocket upgrade, the `token` query parameter.
//! - `ApiJson<T>` / `ApiPath<T>`: `Json` / `Path` with rejections rendered
//!   as [`ApiError`] bodies.

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use slotswap_core::identity::{AuthError, IdentityGateway};
use slotswap_sdk::token::strip_bearer;

use super::error::ApiError;
use crate::state::AppState;

/// The caller of an API route, authenticated through the Identity Gateway.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    /// The verified session token, kept so long-lived sessions can
    /// re-verify it after a secret rotation.
    pub token: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn credential_from_parts(parts: &Parts) -> Result<String, AuthError> {
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MissingCredential)?;
        return strip_bearer(value)
            .map(str::to_owned)
            .ok_or(AuthError::MissingCredential);
    }
    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .ok_or(AuthError::MissingCredential)
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credential_from_parts(parts)?;
        let user_id = state.auth.read().await.authenticate(&token)?;
        Ok(AuthenticatedUser { user_id, token })
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
