//! Principal model - every authenticable account, with a role discriminant.
//!
//! Students, institution admins, employers and the super admin share one
//! collection; `role` decides which fields are meaningful.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    InstitutionAdmin,
    Employer,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::InstitutionAdmin => "institution_admin",
            Role::Employer => "employer",
            Role::SuperAdmin => "super_admin",
        }
    }
}

/// Tri-state gate controlling whether a non-student principal may
/// authenticate, or whether a student may be bound to an institution.
/// Transitions are a free assignment among the three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Parse a client-supplied status, validating enum membership.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// One-time password attached to a principal, single-use, 10 minute window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub fn new(code: String, ttl_minutes: i64) -> Self {
        Self {
            code,
            expires_at: Utc::now() + Duration::minutes(ttl_minutes),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "_id")]
    pub id: String,

    pub display_name: String,

    /// Unique, lowercase-normalized before insert/lookup.
    pub email: String,

    /// Argon2 hash; absent for OAuth-only accounts.
    pub password_hash: Option<String>,

    pub role: Role,

    #[serde(default)]
    pub is_verified: bool,

    pub approval_status: ApprovalStatus,

    #[serde(default)]
    pub google_id: Option<String>,

    /// Id of the approving institution admin; set only on student approval.
    #[serde(default)]
    pub institution: Option<String>,

    #[serde(default)]
    pub otp: Option<OtpChallenge>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(display_name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            display_name,
            email,
            password_hash: Some(password_hash),
            role,
            is_verified: false,
            approval_status: ApprovalStatus::Pending,
            google_id: None,
            institution: None,
            otp: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Principal created from a Google profile: no local password, email
    /// already verified by the provider.
    pub fn new_google(display_name: String, email: String, google_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            display_name,
            email,
            password_hash: None,
            role: Role::Student,
            is_verified: true,
            approval_status: ApprovalStatus::Pending,
            google_id: Some(google_id),
            institution: None,
            otp: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }

    /// Response shape without credential material.
    pub fn sanitized(&self) -> SanitizedPrincipal {
        SanitizedPrincipal {
            id: self.id.clone(),
            name: self.display_name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_verified: self.is_verified,
            approval_status: self.approval_status,
            institution: self.institution.clone(),
        }
    }
}

/// Principal as exposed over the API (no hash, no OTP, no google id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizedPrincipal {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub approval_status: ApprovalStatus,
    pub institution: Option<String>,
}
