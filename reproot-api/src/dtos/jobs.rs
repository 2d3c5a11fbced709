use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{EmploymentType, ExperienceLevel, JobPost, SanitizedPrincipal, StudentProfile};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobPostRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be under 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be under 2000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Location must be under 100 characters"))]
    pub location: String,

    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,

    #[validate(length(min = 1, message = "Industry is required"))]
    pub industry: String,

    #[validate(length(min = 1, message = "Salary is required"))]
    pub salary: String,

    #[validate(length(min = 1, message = "At least one skill is required"))]
    pub required_skills: Vec<String>,

    pub application_deadline: DateTime<Utc>,

    #[validate(length(min = 1, message = "Education level is required"))]
    pub education_level: String,
}

#[derive(Debug, Serialize)]
pub struct JobPostResponse {
    pub success: bool,
    pub message: String,
    pub job_post: JobPost,
}

#[derive(Debug, Serialize)]
pub struct JobPostListResponse {
    pub success: bool,
    pub message: String,
    pub job_posts: Vec<JobPost>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(min = 1, message = "Job id is required"))]
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub user: SanitizedPrincipal,
    pub details: Option<StudentProfile>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub success: bool,
    pub message: String,
    pub total_candidates: usize,
    pub candidates: Vec<Candidate>,
}
