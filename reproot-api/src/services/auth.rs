use std::sync::Arc;

use rand::Rng;
use reproot_core::error::AppError;

use crate::models::{OtpChallenge, Principal, Role, SanitizedPrincipal};
use crate::services::email::Mailer;
use crate::services::jwt::JwtService;
use crate::store::PortalStore;
use crate::utils::password::{hash_password, verify_password, Password};

/// Core authentication flows: registration, login, email verification and
/// the OTP-based password reset.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn PortalStore>,
    mailer: Arc<dyn Mailer>,
    jwt: JwtService,
    otp_expiry_minutes: i64,
    frontend_url: String,
}

pub struct RegistrationOutcome {
    pub principal: SanitizedPrincipal,
    pub verification_token: String,
}

/// A login either produces a session, or bounces an unapproved
/// institution admin / employer without issuing a token.
pub enum LoginOutcome {
    Success {
        token: String,
        principal: SanitizedPrincipal,
    },
    NotApproved {
        status: String,
    },
}

impl AuthService {
    pub fn new(
        store: Arc<dyn PortalStore>,
        mailer: Arc<dyn Mailer>,
        jwt: JwtService,
        otp_expiry_minutes: i64,
        frontend_url: String,
    ) -> Self {
        Self {
            store,
            mailer,
            jwt,
            otp_expiry_minutes,
            frontend_url,
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Register a principal in the given role: pending, unverified, with a
    /// verification mail carrying a short-lived token. The welcome mail is
    /// best-effort and never fails the registration.
    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<RegistrationOutcome, AppError> {
        let email = Self::normalize_email(email);

        if self.store.find_principal_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&Password::new(password.to_string()))?;
        let principal = Principal::new(
            display_name.trim().to_string(),
            email.clone(),
            password_hash,
            role,
        );

        let verification_token = self.jwt.generate_verification_token(&principal.id)?;

        // Verification mail failure aborts the registration; nothing is
        // persisted for an address we could not reach.
        self.mailer
            .send_verification_email(&email, &verification_token, &self.frontend_url)
            .await?;

        self.store.insert_principal(&principal).await?;

        let mailer = Arc::clone(&self.mailer);
        let welcome_to = email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome_email(&welcome_to).await {
                tracing::warn!(error = %e, to = %welcome_to, "Welcome email failed");
            }
        });

        tracing::info!(principal_id = %principal.id, role = %principal.role.as_str(), "Principal registered");

        Ok(RegistrationOutcome {
            principal: principal.sanitized(),
            verification_token,
        })
    }

    /// Unified password login for every role.
    ///
    /// Institution admins and employers are bounced by approval status
    /// before the password is even checked, so an unapproved account learns
    /// nothing about its credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let email = Self::normalize_email(email);

        let principal = self
            .store
            .find_principal_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if matches!(principal.role, Role::InstitutionAdmin | Role::Employer)
            && !principal.is_approved()
        {
            return Ok(LoginOutcome::NotApproved {
                status: principal.approval_status.as_str().to_string(),
            });
        }

        let hash = principal
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(&Password::new(password.to_string()), hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !principal.is_verified {
            return Err(AppError::Unauthorized(
                "Please verify your email to login".to_string(),
            ));
        }

        let token = self.jwt.generate_session_token(&principal.id)?;
        tracing::info!(principal_id = %principal.id, "Login succeeded");

        Ok(LoginOutcome::Success {
            token,
            principal: principal.sanitized(),
        })
    }

    /// Issue a fresh OTP to a verified principal and mail it.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let email = Self::normalize_email(email);

        let principal = self
            .store
            .find_principal_by_email(&email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("User with this email does not exist".to_string())
            })?;

        if !principal.is_verified {
            return Err(AppError::Validation(
                "Please verify your email before requesting OTP".to_string(),
            ));
        }

        let code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
        let challenge = OtpChallenge::new(code.clone(), self.otp_expiry_minutes);

        self.store
            .set_otp(&principal.id, Some(challenge))
            .await?;
        self.mailer.send_otp_email(&email, &code).await?;

        tracing::info!(principal_id = %principal.id, "OTP issued");
        Ok(())
    }

    /// Consume an OTP. Expiry is checked before the code comparison, so a
    /// stale challenge reports as expired even when the code matches.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), AppError> {
        let email = Self::normalize_email(email);

        let principal = self
            .store
            .find_principal_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !principal.is_verified {
            return Err(AppError::Validation(
                "Please verify your email before verifying OTP".to_string(),
            ));
        }

        let challenge = principal
            .otp
            .as_ref()
            .ok_or_else(|| AppError::Validation("Invalid OTP".to_string()))?;

        if challenge.is_expired() {
            return Err(AppError::OtpExpired);
        }

        if challenge.code != code {
            return Err(AppError::Validation("Invalid OTP".to_string()));
        }

        // Single-use: a matching code clears the challenge.
        self.store.set_otp(&principal.id, None).await?;
        Ok(())
    }

    /// Set a new password after a successful OTP round-trip.
    pub async fn change_password(
        &self,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AppError> {
        if new_password != confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let email = Self::normalize_email(email);

        let principal = self
            .store
            .find_principal_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !principal.is_verified {
            return Err(AppError::Validation(
                "Please verify your email before changing password".to_string(),
            ));
        }

        let hash = hash_password(&Password::new(new_password.to_string()))?;
        self.store.set_password_hash(&principal.id, &hash).await?;

        tracing::info!(principal_id = %principal.id, "Password changed");
        Ok(())
    }

    /// Google sign-in: link by email when the address already has a local
    /// account, otherwise create a verified, password-less student.
    pub async fn oauth_login(
        &self,
        email: &str,
        display_name: &str,
        google_id: &str,
    ) -> Result<(String, SanitizedPrincipal), AppError> {
        let email = Self::normalize_email(email);

        let principal = match self.store.find_principal_by_email(&email).await? {
            Some(existing) => {
                if existing.google_id.is_none() {
                    self.store.link_google(&existing.id, google_id).await?;
                    tracing::info!(principal_id = %existing.id, "Linked Google account");
                }
                self.store
                    .find_principal_by_id(&existing.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            }
            None => {
                let created = Principal::new_google(
                    display_name.trim().to_string(),
                    email.clone(),
                    google_id.to_string(),
                );
                self.store.insert_principal(&created).await?;

                let mailer = Arc::clone(&self.mailer);
                let welcome_to = email.clone();
                tokio::spawn(async move {
                    if let Err(e) = mailer.send_welcome_email(&welcome_to).await {
                        tracing::warn!(error = %e, to = %welcome_to, "Welcome email failed");
                    }
                });

                tracing::info!(principal_id = %created.id, "Principal created via Google");
                created
            }
        };

        let token = self.jwt.generate_session_token(&principal.id)?;
        Ok((token, principal.sanitized()))
    }
}
