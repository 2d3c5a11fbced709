use std::sync::Arc;

use reproot_core::error::AppError;

use crate::models::{ApprovalStatus, Role, SanitizedPrincipal};
use crate::store::PortalStore;

/// Approval workflow: free status assignment for institution admins and
/// employers by the super admin, and student approval by an approved
/// institution admin.
#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn PortalStore>,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self { store }
    }

    /// Assign any of the three statuses to the target. No transition graph;
    /// any status can follow any other.
    /// The status route names a kind of principal, so the target must carry
    /// that role; a student or super_admin id is not a valid target.
    pub async fn set_approval_status(
        &self,
        target_id: &str,
        target_role: Role,
        status: &str,
    ) -> Result<SanitizedPrincipal, AppError> {
        let status = ApprovalStatus::parse(status).ok_or_else(|| {
            AppError::Validation(
                "Invalid approval status. Must be one of: pending, approved, rejected".to_string(),
            )
        })?;

        self.store
            .find_principal_by_id(target_id)
            .await?
            .filter(|p| p.role == target_role)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let updated = self
            .store
            .set_approval_status(target_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            principal_id = %updated.id,
            status = %updated.approval_status.as_str(),
            "Approval status updated"
        );
        Ok(updated.sanitized())
    }

    /// Approve a student by email on behalf of an institution admin.
    ///
    /// The admin is re-read from the store: it must exist, hold the
    /// institution_admin role and itself be approved. Approving an
    /// already-approved student is a conflict and mutates nothing.
    pub async fn approve_student_by_email(
        &self,
        admin_id: &str,
        email: &str,
    ) -> Result<SanitizedPrincipal, AppError> {
        let admin = self
            .store
            .find_principal_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Institution admin not found".to_string()))?;

        if admin.role != Role::InstitutionAdmin || !admin.is_approved() {
            return Err(AppError::Forbidden(
                "Institution admin is not approved".to_string(),
            ));
        }

        let email = email.trim().to_lowercase();
        let student = self
            .store
            .find_principal_by_email(&email)
            .await?
            .filter(|p| p.role == Role::Student)
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        if student.approval_status == ApprovalStatus::Approved {
            return Err(AppError::Conflict(
                "Student is already approved".to_string(),
            ));
        }

        self.store.approve_student(&student.id, &admin.id).await?;

        let approved = self
            .store
            .find_principal_by_id(&student.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        tracing::info!(
            student_id = %approved.id,
            institution_id = %admin.id,
            "Student approved"
        );
        Ok(approved.sanitized())
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<SanitizedPrincipal>, AppError> {
        let principals = self.store.list_principals_by_role(role).await?;
        Ok(principals.into_iter().map(|p| p.sanitized()).collect())
    }

    pub async fn list_students_of_institution(
        &self,
        admin_id: &str,
    ) -> Result<Vec<SanitizedPrincipal>, AppError> {
        let students = self.store.list_students_of_institution(admin_id).await?;
        Ok(students.into_iter().map(|p| p.sanitized()).collect())
    }

    pub async fn delete_principal(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_principal(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(principal_id = %id, "Principal deleted");
        Ok(())
    }
}
