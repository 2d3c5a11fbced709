pub mod approval;
pub mod auth;
pub mod email;
pub mod jwt;

pub use approval::ApprovalService;
pub use auth::{AuthService, LoginOutcome, RegistrationOutcome};
pub use email::{MailKind, Mailer, MockMailer, SentMail, SmtpMailer};
pub use jwt::{JwtService, TokenClaims};
