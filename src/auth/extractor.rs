use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

/// Identity decoded from the bearer token. The role is trusted from the token;
/// status and verification must be read fresh (see `auth::policy`).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

enum BearerError {
    Missing,
    Invalid,
}

fn decode_bearer(parts: &Parts, state: &SharedState) -> Result<AuthUser, BearerError> {
    let header = parts
        .headers
        .get("authorization")
        .ok_or(BearerError::Missing)?;
    let value = header.to_str().map_err(|_| BearerError::Invalid)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(BearerError::Missing)?;

    let claims =
        jwt::decode_token(token, &state.config.jwt_secret).map_err(|_| BearerError::Invalid)?;

    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        decode_bearer(parts, state).map_err(|e| match e {
            BearerError::Missing => {
                AppError::Unauthenticated("Access Denied. Please login.".to_string())
            }
            BearerError::Invalid => {
                AppError::Unauthenticated("Invalid or expired token".to_string())
            }
        })
    }
}

/// Same identity as [`AuthUser`], but a garbled or expired token is answered
/// with 400 "Invalid Token". The admin, reception, pharmacist dashboard and
/// feedback submission routes have always behaved this way and existing
/// clients depend on it.
#[derive(Debug, Clone)]
pub struct LegacyAuth(pub AuthUser);

impl FromRequestParts<SharedState> for LegacyAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        decode_bearer(parts, state).map(LegacyAuth).map_err(|e| match e {
            BearerError::Missing => AppError::Unauthenticated("Access Denied".to_string()),
            BearerError::Invalid => AppError::BadRequest("Invalid Token".to_string()),
        })
    }
}
