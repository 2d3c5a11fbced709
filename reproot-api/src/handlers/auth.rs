//! Authentication handlers: registration, login, email verification and the
//! OTP password-reset flow.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::dtos::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    NotApprovedResponse, OkResponse, RegisterRequest, RegisterResponse, VerifyOtpRequest,
};
use crate::middleware::AuthPrincipal;
use crate::models::Role;
use crate::services::LoginOutcome;
use crate::AppState;
use reproot_core::error::AppError;

/// POST /api/auth/student/register
pub async fn register_student(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    register(state, req, Role::Student, "Student registered successfully and verification email sent").await
}

/// POST /api/auth/institution/register
pub async fn register_institution(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    register(
        state,
        req,
        Role::InstitutionAdmin,
        "Institution registered successfully. Awaiting approval by super admin",
    )
    .await
}

/// POST /api/auth/employer/register
pub async fn register_employer(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    register(
        state,
        req,
        Role::Employer,
        "Employer registered successfully. Awaiting approval by super admin",
    )
    .await
}

async fn register(
    state: AppState,
    req: RegisterRequest,
    role: Role,
    message: &str,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    req.validate()?;

    let outcome = state
        .auth
        .register(&req.name, &req.email, &req.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: message.to_string(),
            user: outcome.principal,
            token: outcome.verification_token,
        }),
    ))
}

/// POST /api/auth/verify: redeem the emailed verification token.
pub async fn verify_email(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
) -> Result<Json<MessageResponse>, AppError> {
    // The token was already validated by require_auth; the claims identify
    // the principal to mark verified.
    state
        .store
        .find_principal_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    state.store.set_verified(&claims.sub).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Email verified successfully".to_string(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    req.validate()?;

    match state.auth.login(&req.email, &req.password).await? {
        LoginOutcome::Success { token, principal } => {
            let message = format!("Welcome {}", principal.name);
            Ok(Json(LoginResponse {
                success: true,
                message,
                user: principal,
                token,
            })
            .into_response())
        }
        LoginOutcome::NotApproved { status } => Ok(Json(NotApprovedResponse {
            success: false,
            redirect: "not-approved".to_string(),
            message: format!("Account is {}. Awaiting super admin approval", status),
        })
        .into_response()),
    }
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    state.auth.forgot_password(&req.email).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "OTP sent to email".to_string(),
    }))
}

/// POST /api/auth/verify-otp/:email
pub async fn verify_otp(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    state.auth.verify_otp(&email, &req.otp).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}

/// POST /api/auth/change-password/:email
pub async fn change_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    state
        .auth
        .change_password(&email, &req.new_password, &req.confirm_password)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password changed successfully".to_string(),
    }))
}

/// GET /api/auth/user-auth: token validity probe.
pub async fn user_auth() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

/// GET /api/auth/admin-auth: super-admin probe, guard does the work.
pub async fn admin_auth() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}
