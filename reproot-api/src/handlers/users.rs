//! User administration: listings, profile management, approval workflow and
//! company details.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::dtos::auth::MessageResponse;
use crate::dtos::users::{
    ApprovalStatusRequest, ApproveStudentRequest, CompanyProfileRequest, CompanyProfileResponse,
    ProfileResponse, PrincipalResponse, UpdateProfileRequest, UserDetailResponse, UserListResponse,
};
use crate::middleware::AuthPrincipal;
use crate::models::{CompanyProfile, Role, StudentProfile};
use crate::AppState;
use reproot_core::error::AppError;

/// GET /api/users/get-users: all students, sanitized.
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, AppError> {
    let users = state.approval.list_by_role(Role::Student).await?;
    Ok(Json(UserListResponse {
        success: true,
        message: "Users fetched successfully".to_string(),
        users,
    }))
}

/// GET /api/users/get-institution-admins
pub async fn get_institution_admins(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.approval.list_by_role(Role::InstitutionAdmin).await?;
    Ok(Json(UserListResponse {
        success: true,
        message: "Institution admins fetched successfully".to_string(),
        users,
    }))
}

/// GET /api/users/get-employers
pub async fn get_employers(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.approval.list_by_role(Role::Employer).await?;
    Ok(Json(UserListResponse {
        success: true,
        message: "Employers fetched successfully".to_string(),
        users,
    }))
}

/// GET /api/users/get-user/:id: public detail view with student profile.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let principal = state
        .store
        .find_principal_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = state.store.find_student_profile(&id).await?;

    Ok(Json(UserDetailResponse {
        success: true,
        user: principal.sanitized(),
        profile,
    }))
}

/// PUT /api/users/update-user/:id: owner-only profile upsert.
pub async fn update_user(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    req.validate()?;

    if claims.sub != id {
        return Err(AppError::Forbidden(
            "Cannot update another user's profile".to_string(),
        ));
    }

    state
        .store
        .find_principal_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    state.store.set_display_name(&id, req.name.trim()).await?;

    let profile = StudentProfile::new(
        id.clone(),
        req.bio,
        req.location,
        req.education.into_iter().map(Into::into).collect(),
        req.skills,
    );
    let profile = state.store.upsert_student_profile(&profile).await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        profile,
    }))
}

/// PUT /api/users/instAdmin-status/:id
pub async fn set_institution_admin_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApprovalStatusRequest>,
) -> Result<Json<PrincipalResponse>, AppError> {
    req.validate()?;

    let user = state
        .approval
        .set_approval_status(&id, Role::InstitutionAdmin, &req.approval_status)
        .await?;

    Ok(Json(PrincipalResponse {
        success: true,
        message: "Approval status updated".to_string(),
        user,
    }))
}

/// PUT /api/users/employee-status/:id
pub async fn set_employer_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApprovalStatusRequest>,
) -> Result<Json<PrincipalResponse>, AppError> {
    req.validate()?;

    let user = state
        .approval
        .set_approval_status(&id, Role::Employer, &req.approval_status)
        .await?;

    Ok(Json(PrincipalResponse {
        success: true,
        message: "Approval status updated".to_string(),
        user,
    }))
}

/// POST /api/users/student/approve-student
pub async fn approve_student(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
    Json(req): Json<ApproveStudentRequest>,
) -> Result<Json<PrincipalResponse>, AppError> {
    req.validate()?;

    let user = state
        .approval
        .approve_student_by_email(&claims.sub, &req.email)
        .await?;

    Ok(Json(PrincipalResponse {
        success: true,
        message: "Student approved and institution set".to_string(),
        user,
    }))
}

/// GET /api/users/student/my-students
pub async fn my_students(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state
        .approval
        .list_students_of_institution(&claims.sub)
        .await?;

    Ok(Json(UserListResponse {
        success: true,
        message: "Approved students fetched successfully".to_string(),
        users,
    }))
}

/// DELETE /api/users/delete-user/:uid
pub async fn delete_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.approval.delete_principal(&uid).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}

/// PUT /api/users/employer-details/:id: upsert company profile.
pub async fn upsert_company_profile(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
    Path(id): Path<String>,
    Json(req): Json<CompanyProfileRequest>,
) -> Result<(StatusCode, Json<CompanyProfileResponse>), AppError> {
    req.validate()?;

    if claims.sub != id {
        return Err(AppError::Forbidden(
            "Cannot update another employer's details".to_string(),
        ));
    }

    state
        .store
        .find_principal_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let company = CompanyProfile::new(id, req.company_name, req.description, req.others);
    let company = state.store.upsert_company_profile(&company).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompanyProfileResponse {
            success: true,
            message: "Employer details saved successfully".to_string(),
            company,
        }),
    ))
}

/// GET /api/users/employer-details/:id
pub async fn get_company_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyProfileResponse>, AppError> {
    let company = state
        .store
        .find_company_profile(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employer details not found".to_string()))?;

    Ok(Json(CompanyProfileResponse {
        success: true,
        message: "Employer details fetched successfully".to_string(),
        company,
    }))
}
