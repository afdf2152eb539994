use crate::auth::{Claims, validate_token};
use crate::error::AppError;
use crate::state::AppState;
use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

/// Proof that the request carried a valid, unexpired bearer token.
///
/// Add `user: AuthenticatedUser` to a handler and Axum will:
/// 1. Pull the `Authorization: Bearer <token>` header
/// 2. Check the signature against the configured secret
/// 3. Reject with 401 before the handler runs if anything is off
///
/// Downstream code takes the claims from here instead of re-decoding.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> i32 {
        self.claims.user_id
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Authentication)?;

        // Missing header, bad signature and expiry all collapse into the same 401.
        let claims = validate_token(bearer.token(), &state.security).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::from(e)
        })?;

        Ok(AuthenticatedUser { claims })
    }
}
