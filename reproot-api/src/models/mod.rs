mod job_post;
mod principal;
mod profile;

pub use job_post::{EmploymentType, ExperienceLevel, JobPost};
pub use principal::{ApprovalStatus, OtpChallenge, Principal, Role, SanitizedPrincipal};
pub use profile::{CompanyProfile, Education, EducationLevel, StudentProfile};
