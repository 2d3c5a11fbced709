//! MongoDB implementation of the portal store.
//!
//! Every write is a single-document update scoped by primary key or the
//! unique email index; no multi-document transactions.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use reproot_core::error::AppError;

use crate::models::{
    ApprovalStatus, CompanyProfile, JobPost, OtpChallenge, Principal, Role, StudentProfile,
};

use super::PortalStore;

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    /// Create the unique email index; idempotent across restarts.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.principals().create_index(email_index, None).await?;

        let profile_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.student_profiles()
            .create_index(profile_index, None)
            .await?;

        let company_index = IndexModel::builder()
            .keys(doc! { "employer": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.company_profiles()
            .create_index(company_index, None)
            .await?;

        Ok(())
    }

    fn principals(&self) -> Collection<Principal> {
        self.db.collection("principals")
    }

    fn student_profiles(&self) -> Collection<StudentProfile> {
        self.db.collection("student_profiles")
    }

    fn company_profiles(&self) -> Collection<CompanyProfile> {
        self.db.collection("company_profiles")
    }

    fn job_posts(&self) -> Collection<JobPost> {
        self.db.collection("job_posts")
    }

    fn now_bson() -> Bson {
        // Timestamps round-trip through serde the same way the models do.
        to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null)
    }
}

#[async_trait]
impl PortalStore for MongoStore {
    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, AppError> {
        Ok(self
            .principals()
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, AppError> {
        Ok(self.principals().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_principal(&self, principal: &Principal) -> Result<(), AppError> {
        self.principals()
            .insert_one(principal, None)
            .await
            .map_err(|e| {
                // Surface the unique-index violation as a Conflict.
                if is_duplicate_key(&e) {
                    AppError::Conflict("Email already exists".to_string())
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn list_principals_by_role(&self, role: Role) -> Result<Vec<Principal>, AppError> {
        let cursor = self
            .principals()
            .find(doc! { "role": role.as_str() }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_principals_by_ids(&self, ids: &[String]) -> Result<Vec<Principal>, AppError> {
        let cursor = self
            .principals()
            .find(doc! { "_id": { "$in": ids } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_principal(&self, id: &str) -> Result<bool, AppError> {
        let result = self.principals().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn set_verified(&self, id: &str) -> Result<(), AppError> {
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "is_verified": true, "updated_at": Self::now_bson() } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, hash: &str) -> Result<(), AppError> {
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "password_hash": hash, "updated_at": Self::now_bson() } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn set_display_name(&self, id: &str, name: &str) -> Result<(), AppError> {
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "display_name": name, "updated_at": Self::now_bson() } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn set_otp(&self, id: &str, otp: Option<OtpChallenge>) -> Result<(), AppError> {
        let otp_bson = match otp {
            Some(ref challenge) => to_bson(challenge)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("OTP serialization: {}", e)))?,
            None => Bson::Null,
        };
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "otp": otp_bson, "updated_at": Self::now_bson() } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn link_google(&self, id: &str, google_id: &str) -> Result<(), AppError> {
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "google_id": google_id,
                    "is_verified": true,
                    "updated_at": Self::now_bson(),
                } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn set_approval_status(
        &self,
        id: &str,
        status: ApprovalStatus,
    ) -> Result<Option<Principal>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .principals()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "approval_status": status.as_str(),
                    "updated_at": Self::now_bson(),
                } },
                options,
            )
            .await?)
    }

    async fn approve_student(&self, id: &str, institution_id: &str) -> Result<(), AppError> {
        self.principals()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "institution": institution_id,
                    "approval_status": ApprovalStatus::Approved.as_str(),
                    "is_verified": true,
                    "updated_at": Self::now_bson(),
                } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn list_students_of_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<Principal>, AppError> {
        let cursor = self
            .principals()
            .find(
                doc! {
                    "institution": institution_id,
                    "approval_status": ApprovalStatus::Approved.as_str(),
                },
                None,
            )
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_student_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<StudentProfile>, AppError> {
        Ok(self
            .student_profiles()
            .find_one(doc! { "user": user_id }, None)
            .await?)
    }

    async fn upsert_student_profile(
        &self,
        profile: &StudentProfile,
    ) -> Result<StudentProfile, AppError> {
        // $setOnInsert keeps the stored _id stable across repeat updates;
        // replacing the whole document would trip Mongo's immutable _id check.
        let education = to_bson(&profile.education)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Education serialization: {}", e)))?;
        let skills = to_bson(&profile.skills)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Skills serialization: {}", e)))?;

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        self.student_profiles()
            .find_one_and_update(
                doc! { "user": &profile.user },
                doc! {
                    "$set": {
                        "bio": &profile.bio,
                        "location": &profile.location,
                        "education": education,
                        "skills": skills,
                        "updated_at": Self::now_bson(),
                    },
                    "$setOnInsert": { "_id": &profile.id },
                },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::Database(anyhow::anyhow!("Profile upsert returned no document"))
            })
    }

    async fn find_student_profiles_by_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentProfile>, AppError> {
        let cursor = self
            .student_profiles()
            .find(doc! { "user": { "$in": user_ids } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_company_profile(
        &self,
        employer_id: &str,
    ) -> Result<Option<CompanyProfile>, AppError> {
        Ok(self
            .company_profiles()
            .find_one(doc! { "employer": employer_id }, None)
            .await?)
    }

    async fn upsert_company_profile(
        &self,
        profile: &CompanyProfile,
    ) -> Result<CompanyProfile, AppError> {
        let others = to_bson(&profile.others)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Profile serialization: {}", e)))?;

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        self.company_profiles()
            .find_one_and_update(
                doc! { "employer": &profile.employer },
                doc! {
                    "$set": {
                        "company_name": &profile.company_name,
                        "description": &profile.description,
                        "others": others,
                        "updated_at": Self::now_bson(),
                    },
                    "$setOnInsert": { "_id": &profile.id },
                },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::Database(anyhow::anyhow!("Profile upsert returned no document"))
            })
    }

    async fn insert_job_post(&self, post: &JobPost) -> Result<(), AppError> {
        self.job_posts().insert_one(post, None).await?;
        Ok(())
    }

    async fn find_job_post(&self, id: &str) -> Result<Option<JobPost>, AppError> {
        Ok(self.job_posts().find_one(doc! { "_id": id }, None).await?)
    }

    async fn list_job_posts(&self) -> Result<Vec<JobPost>, AppError> {
        let cursor = self.job_posts().find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_job_posts_by_employer(
        &self,
        employer_id: &str,
    ) -> Result<Vec<JobPost>, AppError> {
        let cursor = self
            .job_posts()
            .find(doc! { "employer": employer_id }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_job_applicant(&self, job_id: &str, user_id: &str) -> Result<(), AppError> {
        self.job_posts()
            .update_one(
                doc! { "_id": job_id },
                doc! {
                    "$addToSet": { "applied_candidates": user_id },
                    "$set": { "updated_at": Self::now_bson() },
                },
                None,
            )
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == 11000
    )
}
