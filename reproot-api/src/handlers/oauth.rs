//! Google OAuth bridge: consent redirect and the callback that exchanges
//! the authorization code, then hands a session token to the frontend.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::AppState;
use reproot_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GoogleTokenResponse {
    pub access_token: String,
    pub id_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
}

/// Google ID token claims.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GoogleIdTokenClaims {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub aud: String,
    pub iss: String,
    pub exp: i64,
}

/// GET /api/auth/google: redirect to Google's consent screen.
pub async fn google_redirect(State(state): State<AppState>) -> Redirect {
    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&prompt=select_account",
        urlencoding::encode(&state.config.google.client_id),
        urlencoding::encode(&state.config.google.redirect_uri),
    );

    Redirect::to(&auth_url)
}

/// GET /api/auth/google/callback: exchange the code, link or create the
/// principal, and bounce back to the frontend with token and user in the
/// query string.
#[tracing::instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Redirect, AppError> {
    let frontend = &state.config.security.frontend_url;

    if let Some(error) = query.error {
        tracing::warn!(error = %error, "Google OAuth error");
        return Ok(auth_failed_redirect(frontend));
    }

    let code = match query.code {
        Some(code) => code,
        None => return Ok(auth_failed_redirect(frontend)),
    };

    let claims = match authenticate_with_google(&state, &code).await {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!(error = %e, "Google authentication failed");
            return Ok(auth_failed_redirect(frontend));
        }
    };

    let email = claims
        .email
        .ok_or_else(|| AppError::Validation("Email not provided by Google".to_string()))?;
    let display_name = claims.name.unwrap_or_else(|| email.clone());

    let (token, principal) = match state
        .auth
        .oauth_login(&email, &display_name, &claims.sub)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "OAuth login failed");
            return Ok(auth_failed_redirect(frontend));
        }
    };

    let user_json = serde_json::to_string(&principal)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize user: {}", e)))?;

    // Token and user travel in the query string; the frontend picks them up
    // on its oauth-callback page.
    let redirect_url = format!(
        "{}/oauth-callback?token={}&user={}",
        frontend,
        urlencoding::encode(&token),
        urlencoding::encode(&user_json),
    );

    Ok(Redirect::to(&redirect_url))
}

fn auth_failed_redirect(frontend_url: &str) -> Redirect {
    Redirect::to(&format!("{}/oauth-callback?error=auth-failed", frontend_url))
}

async fn authenticate_with_google(
    state: &AppState,
    code: &str,
) -> Result<GoogleIdTokenClaims, AppError> {
    let tokens = exchange_code_for_tokens(state, code).await?;

    let id_token = tokens
        .id_token
        .ok_or_else(|| AppError::Validation("No ID token in Google response".to_string()))?;

    let claims = decode_google_id_token(&id_token)?;

    // Audience must be our client id; anything else is a forged or
    // misdirected token.
    if claims.aud != state.config.google.client_id {
        return Err(AppError::InvalidCredential);
    }

    Ok(claims)
}

async fn exchange_code_for_tokens(
    state: &AppState,
    code: &str,
) -> Result<GoogleTokenResponse, AppError> {
    let response = state
        .http
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("code", code),
            ("client_id", &state.config.google.client_id),
            ("client_secret", &state.config.google.client_secret),
            ("redirect_uri", &state.config.google.redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to contact Google: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(error = %error_text, "Google token exchange failed");
        return Err(AppError::Internal(anyhow::anyhow!(
            "Google token exchange failed"
        )));
    }

    response
        .json::<GoogleTokenResponse>()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to parse Google response: {}", e)))
}

/// Decode the ID token payload without signature verification; the token
/// arrives over TLS directly from Google's token endpoint.
fn decode_google_id_token(id_token: &str) -> Result<GoogleIdTokenClaims, AppError> {
    let parts: Vec<&str> = id_token.split('.').collect();
    if parts.len() != 3 {
        return Err(AppError::Validation("Invalid ID token format".to_string()));
    }

    let payload = base64_url_decode(parts[1])
        .map_err(|_| AppError::Validation("Failed to decode token payload".to_string()))?;

    serde_json::from_str::<GoogleIdTokenClaims>(&payload)
        .map_err(|e| AppError::Validation(format!("Failed to parse token claims: {}", e)))
}

fn base64_url_decode(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    let bytes = URL_SAFE_NO_PAD.decode(input)?;
    Ok(String::from_utf8(bytes)?)
}
