//! Role guards layered after `require_auth`.
//!
//! Each guard re-reads the principal from the store on every request; the
//! token carries no role claim and is never trusted for authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use reproot_core::error::AppError;

use crate::{models::Role, services::TokenClaims, AppState};

fn claimed_sub(req: &Request) -> Result<String, AppError> {
    req.extensions()
        .get::<TokenClaims>()
        .map(|claims| claims.sub.clone())
        .ok_or(AppError::MissingCredential)
}

async fn load_principal(
    state: &AppState,
    sub: String,
) -> Result<crate::models::Principal, AppError> {
    state
        .store
        .find_principal_by_id(&sub)
        .await?
        .ok_or_else(|| AppError::Forbidden("Access denied".to_string()))
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let sub = claimed_sub(&req)?;
    let principal = load_principal(&state, sub).await?;

    if principal.role != Role::SuperAdmin {
        return Err(AppError::Forbidden("Super admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

/// Institution admin routes additionally require the admin itself to be
/// approved.
pub async fn require_institution_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let sub = claimed_sub(&req)?;
    let principal = load_principal(&state, sub).await?;

    if principal.role != Role::InstitutionAdmin {
        return Err(AppError::Forbidden(
            "Institution admin access required".to_string(),
        ));
    }
    if !principal.is_approved() {
        return Err(AppError::Forbidden(
            "Institution admin is not approved".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Employer routes additionally require the employer itself to be approved.
pub async fn require_employer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let sub = claimed_sub(&req)?;
    let principal = load_principal(&state, sub).await?;

    if principal.role != Role::Employer {
        return Err(AppError::Forbidden("Employer access required".to_string()));
    }
    if !principal.is_approved() {
        return Err(AppError::Forbidden("Employer is not approved".to_string()));
    }

    Ok(next.run(req).await)
}
