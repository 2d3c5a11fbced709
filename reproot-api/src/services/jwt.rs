use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use reproot_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

/// JWT service for token generation and validation
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    verification_token_expiry_minutes: i64,
    session_token_expiry_days: i64,
}

/// Claims carried by every token the service signs.
///
/// Session and verification tokens share this shape; only the lifetime
/// differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            verification_token_expiry_minutes: config.verification_token_expiry_minutes,
            session_token_expiry_days: config.session_token_expiry_days,
        }
    }

    /// Short-lived token embedded in the verification email link.
    pub fn generate_verification_token(&self, user_id: &str) -> Result<String, AppError> {
        self.sign(user_id, Duration::minutes(self.verification_token_expiry_minutes))
    }

    /// Session token returned on a successful login.
    pub fn generate_session_token(&self, user_id: &str) -> Result<String, AppError> {
        self.sign(user_id, Duration::days(self.session_token_expiry_days))
    }

    fn sign(&self, user_id: &str, lifetime: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode token: {}", e)))
    }

    /// Validate and decode a token.
    ///
    /// An expired token and a forged or malformed one map to distinct
    /// error codes so clients can prompt for a resend rather than a
    /// re-login.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AppError::ExpiredCredential)
            }
            Err(_) => Err(AppError::InvalidCredential),
        }
    }

    pub fn session_token_expiry_seconds(&self) -> i64 {
        self.session_token_expiry_days * 24 * 60 * 60
    }
}
