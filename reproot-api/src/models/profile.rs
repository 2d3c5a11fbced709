//! Student and company profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    School,
    Undergraduate,
    Postgraduate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub level: EducationLevel,
    pub institution_name: String,
    pub institution_location: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Required unless `level` is School.
    #[serde(default)]
    pub degree: Option<String>,
}

/// Extended student profile, one per principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub bio: String,
    pub location: String,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl StudentProfile {
    pub fn new(
        user: String,
        bio: String,
        location: String,
        education: Vec<Education>,
        skills: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            bio,
            location,
            education,
            skills,
            updated_at: Utc::now(),
        }
    }
}

/// Employer company details, one per employer principal. The company name is
/// denormalized onto job posts at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub employer: String,
    pub company_name: String,
    pub description: String,
    #[serde(default)]
    pub others: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyProfile {
    pub fn new(
        employer: String,
        company_name: String,
        description: String,
        others: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employer,
            company_name,
            description,
            others,
            updated_at: Utc::now(),
        }
    }
}
