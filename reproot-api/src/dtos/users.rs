use chrono::Datelike;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{
    CompanyProfile, Education, EducationLevel, SanitizedPrincipal, StudentProfile,
};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 10, max = 150, message = "Bio must be 10 to 150 characters"))]
    pub bio: String,

    #[validate(length(min = 1, max = 100, message = "Location must be under 100 characters"))]
    pub location: String,

    #[validate(custom(function = validate_education))]
    pub education: Vec<EducationEntry>,

    #[validate(custom(function = validate_skills))]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EducationEntry {
    pub level: EducationLevel,
    pub institution_name: String,
    pub institution_location: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(default)]
    pub degree: Option<String>,
}

impl From<EducationEntry> for Education {
    fn from(e: EducationEntry) -> Self {
        Education {
            level: e.level,
            institution_name: e.institution_name,
            institution_location: e.institution_location,
            start_year: e.start_year,
            end_year: e.end_year,
            degree: e.degree,
        }
    }
}

fn validate_education(entries: &[EducationEntry]) -> Result<(), ValidationError> {
    let current_year = chrono::Utc::now().year();
    for entry in entries {
        if entry.institution_name.trim().is_empty() || entry.institution_location.trim().is_empty()
        {
            return Err(ValidationError::new("incomplete_education_entry"));
        }
        if entry.level != EducationLevel::School
            && entry.degree.as_deref().map_or(true, |d| d.trim().is_empty())
        {
            return Err(ValidationError::new("degree_required"));
        }
        if entry.start_year < 1900
            || entry.start_year > current_year + 10
            || entry.end_year < 1900
            || entry.end_year > current_year + 10
            || entry.start_year > entry.end_year
        {
            return Err(ValidationError::new("invalid_years"));
        }
    }
    Ok(())
}

fn validate_skills(skills: &[String]) -> Result<(), ValidationError> {
    if skills.iter().any(|s| s.trim().is_empty()) {
        return Err(ValidationError::new("empty_skill"));
    }
    if skills.iter().any(|s| s.len() > 50) {
        return Err(ValidationError::new("skill_too_long"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub message: String,
    pub users: Vec<SanitizedPrincipal>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub success: bool,
    pub user: SanitizedPrincipal,
    pub profile: Option<StudentProfile>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApprovalStatusRequest {
    #[validate(length(min = 1, message = "Approval status is required"))]
    pub approval_status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApproveStudentRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub success: bool,
    pub message: String,
    pub user: SanitizedPrincipal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Company name must be under 100 characters"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 500, message = "Description must be under 500 characters"))]
    pub description: String,

    #[validate(length(max = 500, message = "Others must be under 500 characters"))]
    pub others: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyProfileResponse {
    pub success: bool,
    pub message: String,
    pub company: CompanyProfile,
}
