//! Session boundary: login, token rotation, and maintenance endpoints.
//!
//! All auth failures surface as typed [`AppError`]s, so clients receive
//! `INVALID_CREDENTIALS`, `TOKEN_INVALID`, or `ACCOUNT_LOCKED` (with
//! `locked_until`) rather than a generic fault.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waypoint_auth::{CredentialVerifier, Credentials, RefreshToken, RefreshTokenStore};

/// Issued-token response body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Opaque refresh-token value.
    pub refresh_token: String,
    /// When the token stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl From<RefreshToken> for TokenResponse {
    fn from(token: RefreshToken) -> Self {
        Self {
            refresh_token: token.token,
            expires_at: token.expires_at,
        }
    }
}

/// Rotation request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token to rotate.
    pub refresh_token: String,
}

/// Per-user revocation request body.
#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    /// Owner whose tokens are revoked.
    pub user_id: Uuid,
}

/// Count response for maintenance endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Number of tokens affected.
    pub affected: u64,
}

/// `POST /auth/login` — authenticate and issue a refresh token.
///
/// # Errors
///
/// `422` on blank fields, `401 INVALID_CREDENTIALS` on a mismatch, `423
/// ACCOUNT_LOCKED` with `locked_until` while the account is locked.
pub async fn login<V, S>(
    State(state): State<AppState<V, S>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError>
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let token = state.sessions.login(&credentials).await?;
    Ok(Json(token.into()))
}

/// `POST /auth/refresh` — rotate a refresh token.
///
/// # Errors
///
/// `401 TOKEN_INVALID` when the token is absent, revoked, or expired.
pub async fn refresh<V, S>(
    State(state): State<AppState<V, S>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError>
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let token = state.sessions.rotate(&request.refresh_token).await?;
    Ok(Json(token.into()))
}

/// `POST /auth/revoke` — revoke every token for one user (logout
/// everywhere, credential change).
///
/// # Errors
///
/// `500` if the token store fails.
pub async fn revoke_user<V, S>(
    State(state): State<AppState<V, S>>,
    Json(request): Json<RevokeRequest>,
) -> Result<Json<CountResponse>, AppError>
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let affected = state.sessions.revoke_all_for_user(request.user_id).await?;
    Ok(Json(CountResponse { affected }))
}

/// `POST /auth/revoke-all` — revoke every token (security-incident
/// response).
///
/// # Errors
///
/// `500` if the token store fails.
pub async fn revoke_all<V, S>(
    State(state): State<AppState<V, S>>,
) -> Result<Json<CountResponse>, AppError>
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let affected = state.sessions.revoke_all().await?;
    Ok(Json(CountResponse { affected }))
}

/// `DELETE /auth/expired` — delete tokens past expiry.
///
/// # Errors
///
/// `500` if the token store fails.
pub async fn delete_expired<V, S>(
    State(state): State<AppState<V, S>>,
) -> Result<Json<CountResponse>, AppError>
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let affected = state.sessions.sweep_expired().await?;
    Ok(Json(CountResponse { affected }))
}
