//! Job posts: creation by employers, browsing, applications.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::dtos::jobs::{
    ApplyRequest, Candidate, CandidateListResponse, CreateJobPostRequest, JobPostListResponse,
    JobPostResponse,
};
use crate::middleware::AuthPrincipal;
use crate::models::JobPost;
use crate::AppState;
use reproot_core::error::AppError;

/// POST /api/jobs/create-job-post/:id: requires the employer's company
/// profile; the company name is denormalized onto the post.
pub async fn create_job_post(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
    Path(id): Path<String>,
    Json(req): Json<CreateJobPostRequest>,
) -> Result<(StatusCode, Json<JobPostResponse>), AppError> {
    req.validate()?;

    if claims.sub != id {
        return Err(AppError::Forbidden(
            "Cannot post jobs for another employer".to_string(),
        ));
    }

    let company = state
        .store
        .find_company_profile(&id)
        .await?
        .ok_or_else(|| {
            AppError::Validation("Company details are required before posting jobs".to_string())
        })?;

    let post = JobPost::new(
        id,
        company.company_name,
        req.title,
        req.description,
        req.location,
        req.employment_type,
        req.experience_level,
        req.industry,
        req.salary,
        req.required_skills,
        req.application_deadline,
        req.education_level,
    );
    state.store.insert_job_post(&post).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobPostResponse {
            success: true,
            message: "Job post created successfully".to_string(),
            job_post: post,
        }),
    ))
}

/// GET /api/jobs/get-job/:id: one employer's posts.
pub async fn get_employer_job_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobPostListResponse>, AppError> {
    let job_posts = state.store.list_job_posts_by_employer(&id).await?;

    Ok(Json(JobPostListResponse {
        success: true,
        message: "Job posts fetched successfully".to_string(),
        job_posts,
    }))
}

/// GET /api/jobs/get-jobs: every post.
pub async fn get_all_job_posts(
    State(state): State<AppState>,
) -> Result<Json<JobPostListResponse>, AppError> {
    let job_posts = state.store.list_job_posts().await?;

    Ok(Json(JobPostListResponse {
        success: true,
        message: "Job posts fetched successfully".to_string(),
        job_posts,
    }))
}

/// POST /api/jobs/apply: the caller applies to a post; duplicates conflict.
pub async fn apply(
    State(state): State<AppState>,
    AuthPrincipal(claims): AuthPrincipal,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<JobPostResponse>, AppError> {
    req.validate()?;

    let job = state
        .store
        .find_job_post(&req.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if job.has_applicant(&claims.sub) {
        return Err(AppError::Conflict(
            "You have already applied for this job".to_string(),
        ));
    }

    state.store.add_job_applicant(&job.id, &claims.sub).await?;

    let updated = state
        .store
        .find_job_post(&job.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(JobPostResponse {
        success: true,
        message: "Successfully applied for the job".to_string(),
        job_post: updated,
    }))
}

/// GET /api/jobs/applied-candidates/:job_id: candidates joined with their
/// student profiles.
pub async fn applied_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let job = state
        .store
        .find_job_post(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if job.applied_candidates.is_empty() {
        return Ok(Json(CandidateListResponse {
            success: true,
            message: "No candidates have applied yet".to_string(),
            total_candidates: 0,
            candidates: Vec::new(),
        }));
    }

    let principals = state
        .store
        .find_principals_by_ids(&job.applied_candidates)
        .await?;
    let profiles = state
        .store
        .find_student_profiles_by_users(&job.applied_candidates)
        .await?;

    let candidates: Vec<Candidate> = principals
        .into_iter()
        .map(|p| {
            let details = profiles.iter().find(|d| d.user == p.id).cloned();
            Candidate {
                user: p.sanitized(),
                details,
            }
        })
        .collect();

    Ok(Json(CandidateListResponse {
        success: true,
        message: "Applied candidates fetched successfully".to_string(),
        total_candidates: candidates.len(),
        candidates,
    }))
}
