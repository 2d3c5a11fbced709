//! Job post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub employer: String,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub industry: String,
    pub salary: String,
    pub required_skills: Vec<String>,
    pub application_deadline: DateTime<Utc>,
    pub education_level: String,
    /// Principal ids of students who applied.
    #[serde(default)]
    pub applied_candidates: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPost {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employer: String,
        company_name: String,
        title: String,
        description: String,
        location: String,
        employment_type: EmploymentType,
        experience_level: ExperienceLevel,
        industry: String,
        salary: String,
        required_skills: Vec<String>,
        application_deadline: DateTime<Utc>,
        education_level: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employer,
            title,
            company_name,
            description,
            location,
            employment_type,
            experience_level,
            industry,
            salary,
            required_skills,
            application_deadline,
            education_level,
            applied_candidates: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_applicant(&self, principal_id: &str) -> bool {
        self.applied_candidates.iter().any(|c| c == principal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_type_uses_display_labels() {
        assert_eq!(
            serde_json::to_string(&EmploymentType::FullTime).unwrap(),
            "\"Full-time\""
        );
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::Entry).unwrap(),
            "\"Entry Level\""
        );
    }
}
