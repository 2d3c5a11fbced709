//! In-memory store used by the integration tests. Mirrors the MongoDB
//! implementation's semantics, including the unique-email constraint.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reproot_core::error::AppError;

use crate::models::{
    ApprovalStatus, CompanyProfile, JobPost, OtpChallenge, Principal, Role, StudentProfile,
};

use super::PortalStore;

#[derive(Default)]
pub struct MemoryStore {
    principals: Mutex<HashMap<String, Principal>>,
    student_profiles: Mutex<HashMap<String, StudentProfile>>,
    company_profiles: Mutex<HashMap<String, CompanyProfile>>,
    job_posts: Mutex<HashMap<String, JobPost>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, AppError> {
        let principals = self.principals.lock().unwrap();
        Ok(principals.values().find(|p| p.email == email).cloned())
    }

    async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, AppError> {
        let principals = self.principals.lock().unwrap();
        Ok(principals.get(id).cloned())
    }

    async fn insert_principal(&self, principal: &Principal) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if principals.values().any(|p| p.email == principal.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        principals.insert(principal.id.clone(), principal.clone());
        Ok(())
    }

    async fn list_principals_by_role(&self, role: Role) -> Result<Vec<Principal>, AppError> {
        let principals = self.principals.lock().unwrap();
        Ok(principals
            .values()
            .filter(|p| p.role == role)
            .cloned()
            .collect())
    }

    async fn find_principals_by_ids(&self, ids: &[String]) -> Result<Vec<Principal>, AppError> {
        let principals = self.principals.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| principals.get(id).cloned())
            .collect())
    }

    async fn delete_principal(&self, id: &str) -> Result<bool, AppError> {
        let mut principals = self.principals.lock().unwrap();
        Ok(principals.remove(id).is_some())
    }

    async fn set_verified(&self, id: &str) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.is_verified = true;
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.password_hash = Some(hash.to_string());
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn set_display_name(&self, id: &str, name: &str) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.display_name = name.to_string();
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn set_otp(&self, id: &str, otp: Option<OtpChallenge>) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.otp = otp;
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn link_google(&self, id: &str, google_id: &str) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.google_id = Some(google_id.to_string());
            p.is_verified = true;
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn set_approval_status(
        &self,
        id: &str,
        status: ApprovalStatus,
    ) -> Result<Option<Principal>, AppError> {
        let mut principals = self.principals.lock().unwrap();
        Ok(principals.get_mut(id).map(|p| {
            p.approval_status = status;
            p.updated_at = chrono::Utc::now();
            p.clone()
        }))
    }

    async fn approve_student(&self, id: &str, institution_id: &str) -> Result<(), AppError> {
        let mut principals = self.principals.lock().unwrap();
        if let Some(p) = principals.get_mut(id) {
            p.institution = Some(institution_id.to_string());
            p.approval_status = ApprovalStatus::Approved;
            p.is_verified = true;
            p.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn list_students_of_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<Principal>, AppError> {
        let principals = self.principals.lock().unwrap();
        Ok(principals
            .values()
            .filter(|p| {
                p.institution.as_deref() == Some(institution_id)
                    && p.approval_status == ApprovalStatus::Approved
            })
            .cloned()
            .collect())
    }

    async fn find_student_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<StudentProfile>, AppError> {
        let profiles = self.student_profiles.lock().unwrap();
        Ok(profiles.get(user_id).cloned())
    }

    async fn upsert_student_profile(
        &self,
        profile: &StudentProfile,
    ) -> Result<StudentProfile, AppError> {
        let mut profiles = self.student_profiles.lock().unwrap();
        let mut stored = profile.clone();
        if let Some(existing) = profiles.get(&profile.user) {
            stored.id = existing.id.clone();
        }
        profiles.insert(stored.user.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_student_profiles_by_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentProfile>, AppError> {
        let profiles = self.student_profiles.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn find_company_profile(
        &self,
        employer_id: &str,
    ) -> Result<Option<CompanyProfile>, AppError> {
        let profiles = self.company_profiles.lock().unwrap();
        Ok(profiles.get(employer_id).cloned())
    }

    async fn upsert_company_profile(
        &self,
        profile: &CompanyProfile,
    ) -> Result<CompanyProfile, AppError> {
        let mut profiles = self.company_profiles.lock().unwrap();
        let mut stored = profile.clone();
        if let Some(existing) = profiles.get(&profile.employer) {
            stored.id = existing.id.clone();
        }
        profiles.insert(stored.employer.clone(), stored.clone());
        Ok(stored)
    }

    async fn insert_job_post(&self, post: &JobPost) -> Result<(), AppError> {
        let mut posts = self.job_posts.lock().unwrap();
        posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn find_job_post(&self, id: &str) -> Result<Option<JobPost>, AppError> {
        let posts = self.job_posts.lock().unwrap();
        Ok(posts.get(id).cloned())
    }

    async fn list_job_posts(&self) -> Result<Vec<JobPost>, AppError> {
        let posts = self.job_posts.lock().unwrap();
        Ok(posts.values().cloned().collect())
    }

    async fn list_job_posts_by_employer(
        &self,
        employer_id: &str,
    ) -> Result<Vec<JobPost>, AppError> {
        let posts = self.job_posts.lock().unwrap();
        Ok(posts
            .values()
            .filter(|p| p.employer == employer_id)
            .cloned()
            .collect())
    }

    async fn add_job_applicant(&self, job_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut posts = self.job_posts.lock().unwrap();
        if let Some(post) = posts.get_mut(job_id) {
            if !post.applied_candidates.iter().any(|c| c == user_id) {
                post.applied_candidates.push(user_id.to_string());
                post.updated_at = chrono::Utc::now();
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
