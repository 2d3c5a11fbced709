//! Credential store: persisted principals, profiles and job posts.
//!
//! `PortalStore` is the seam between handlers/services and persistence.
//! `MongoStore` is the production implementation; `MemoryStore` backs the
//! integration tests.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use reproot_core::error::AppError;

use crate::models::{
    ApprovalStatus, CompanyProfile, JobPost, OtpChallenge, Principal, Role, StudentProfile,
};

#[async_trait]
pub trait PortalStore: Send + Sync {
    // ---- principals ----

    /// Lookup by lowercase-normalized email. Callers normalize first.
    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, AppError>;
    async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, AppError>;
    async fn insert_principal(&self, principal: &Principal) -> Result<(), AppError>;
    async fn list_principals_by_role(&self, role: Role) -> Result<Vec<Principal>, AppError>;
    async fn find_principals_by_ids(&self, ids: &[String]) -> Result<Vec<Principal>, AppError>;
    async fn delete_principal(&self, id: &str) -> Result<bool, AppError>;

    async fn set_verified(&self, id: &str) -> Result<(), AppError>;
    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<(), AppError>;
    async fn set_display_name(&self, id: &str, name: &str) -> Result<(), AppError>;
    async fn set_otp(&self, id: &str, otp: Option<OtpChallenge>) -> Result<(), AppError>;
    async fn link_google(&self, id: &str, google_id: &str) -> Result<(), AppError>;

    /// Free assignment among the three statuses; returns the updated record.
    async fn set_approval_status(
        &self,
        id: &str,
        status: ApprovalStatus,
    ) -> Result<Option<Principal>, AppError>;

    /// Bind a student to an institution: sets `institution`, approves and
    /// verifies in one single-document write.
    async fn approve_student(&self, id: &str, institution_id: &str) -> Result<(), AppError>;

    /// Approved students bound to the given institution admin.
    async fn list_students_of_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<Principal>, AppError>;

    // ---- profiles ----

    async fn find_student_profile(&self, user_id: &str)
        -> Result<Option<StudentProfile>, AppError>;
    /// Insert-or-update keyed on `user`. An existing document keeps its `_id`;
    /// the returned profile is the stored one.
    async fn upsert_student_profile(
        &self,
        profile: &StudentProfile,
    ) -> Result<StudentProfile, AppError>;
    async fn find_student_profiles_by_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentProfile>, AppError>;

    async fn find_company_profile(
        &self,
        employer_id: &str,
    ) -> Result<Option<CompanyProfile>, AppError>;
    /// Insert-or-update keyed on `employer`, same `_id` stability contract as
    /// [`Self::upsert_student_profile`].
    async fn upsert_company_profile(
        &self,
        profile: &CompanyProfile,
    ) -> Result<CompanyProfile, AppError>;

    // ---- job posts ----

    async fn insert_job_post(&self, post: &JobPost) -> Result<(), AppError>;
    async fn find_job_post(&self, id: &str) -> Result<Option<JobPost>, AppError>;
    async fn list_job_posts(&self) -> Result<Vec<JobPost>, AppError>;
    async fn list_job_posts_by_employer(&self, employer_id: &str)
        -> Result<Vec<JobPost>, AppError>;
    async fn add_job_applicant(&self, job_id: &str, user_id: &str) -> Result<(), AppError>;

    // ---- liveness ----

    async fn health_check(&self) -> Result<(), AppError>;
}
