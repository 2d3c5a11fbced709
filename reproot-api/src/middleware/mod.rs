pub mod auth;
pub mod guard;

pub use auth::{require_auth, AuthPrincipal};
pub use guard::{require_employer, require_institution_admin, require_super_admin};
