use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use reproot_core::error::AppError;

use crate::{services::TokenClaims, AppState};

/// Require a Bearer token. On success the decoded claims are stored in the
/// request extensions; only the `sub` is ever trusted from the token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::MissingCredential)?;

    let claims = state.jwt.validate_token(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for the authenticated principal id in handlers.
pub struct AuthPrincipal(pub TokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Auth claims missing from request extensions"))
        })?;

        Ok(AuthPrincipal(claims.clone()))
    }
}
