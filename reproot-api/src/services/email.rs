use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use reproot_core::error::AppError;
use std::time::Duration;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Verification link embedding the short-lived token.
    async fn send_verification_email(
        &self,
        to_email: &str,
        verification_token: &str,
        frontend_url: &str,
    ) -> Result<(), AppError>;

    /// One-time code for the password reset flow.
    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError>;

    /// Greeting sent once after the email address is confirmed.
    async fn send_welcome_email(&self, to_email: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    mailer: SmtpTransport,
    from_email: String,
}

impl SmtpMailer {
    pub fn new(config: &crate::config::GmailConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(config.user.clone(), config.app_password.clone());

        let mailer = SmtpTransport::relay("smtp.gmail.com")
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(587)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!("Mailer initialized with Gmail SMTP");

        Ok(Self {
            mailer,
            from_email: config.user.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(self.from_email.parse().map_err(
                |e: lettre::address::AddressError| AppError::Internal(e.into()),
            )?)
            .to(to_email.parse().map_err(
                |e: lettre::address::AddressError| AppError::Internal(e.into()),
            )?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::Internal(e.into()))?;

        // lettre's SmtpTransport is blocking; keep it off the async runtime.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e.to_string(), to = %to_email, "Failed to send email");
                Err(AppError::Email(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_email(
        &self,
        to_email: &str,
        verification_token: &str,
        frontend_url: &str,
    ) -> Result<(), AppError> {
        let verification_link = format!("{}/verify/{}", frontend_url, verification_token);

        let html_body = format!(
            r###"<html>
                <body style="font-family: Arial, sans-serif;">
                    <h2>Verify your email address</h2>
                    <p>Thank you for registering with RepRoot. Please verify your email address to complete your registration.</p>
                    <p>
                        <a href="{}" style="background-color: #3498db; color: white; padding: 14px 20px; text-decoration: none; border-radius: 4px;">
                            Verify Email
                        </a>
                    </p>
                    <p style="color: #666; font-size: 12px;">
                        This link will expire in 10 minutes. If you didn't request this, please ignore this email.
                    </p>
                </body>
            </html>
            "###,
            verification_link
        );

        let plain_body = format!(
            "Verify your email address\n\nThank you for registering with RepRoot. Please visit the following link to verify your email address:\n\n{}\n\nThis link will expire in 10 minutes. If you didn't request this, please ignore this email.",
            verification_link
        );

        self.send_email(to_email, "Verify Your Email Address", &plain_body, &html_body)
            .await
    }

    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        let plain_body = format!("Your OTP code is {}. It is valid for 10 minutes.", code);
        let html_body = format!(
            r###"<html>
                <body style="font-family: Arial, sans-serif;">
                    <h2>Password reset code</h2>
                    <p>Your OTP code is <strong>{}</strong>. It is valid for 10 minutes.</p>
                    <p style="color: #666; font-size: 12px;">
                        If you didn't request this, please ignore this email.
                    </p>
                </body>
            </html>
            "###,
            code
        );

        self.send_email(to_email, "Your OTP Code", &plain_body, &html_body)
            .await
    }

    async fn send_welcome_email(&self, to_email: &str) -> Result<(), AppError> {
        let plain_body = "Welcome to RepRoot!\n\nRepRoot is the platform where you can find your dream job and connect with top employers. To get started, log in to your dashboard and complete your profile.\n\nBest regards,\nThe RepRoot Team".to_string();
        let html_body = r###"<html>
                <body style="font-family: Arial, sans-serif;">
                    <h1>Welcome to <span style="color: #3498db;">RepRoot</span>!</h1>
                    <p>RepRoot is the platform where you can find your dream job and connect with top employers. We're excited to have you on board!</p>
                    <p>To get started, log in to your dashboard and complete your profile. The more complete your profile, the better your chances of getting noticed by top companies.</p>
                    <p style="font-size: 14px; color: #888;">
                        Best regards,<br/>
                        The RepRoot Team
                    </p>
                </body>
            </html>
            "###
        .to_string();

        self.send_email(to_email, "Welcome to RepRoot!", &plain_body, &html_body)
            .await
    }
}

/// Recording mailer for tests: captures every send instead of delivering.
#[derive(Default)]
pub struct MockMailer {
    outbox: std::sync::Mutex<Vec<SentMail>>,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub kind: MailKind,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MailKind {
    Verification,
    Otp,
    Welcome,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.outbox.lock().unwrap().clone()
    }

    pub fn last_payload_to(&self, email: &str, kind: MailKind) -> Option<String> {
        self.outbox
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == email && m.kind == kind)
            .map(|m| m.payload.clone())
            .next_back()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_verification_email(
        &self,
        to_email: &str,
        verification_token: &str,
        _frontend_url: &str,
    ) -> Result<(), AppError> {
        self.outbox.lock().unwrap().push(SentMail {
            to: to_email.to_string(),
            kind: MailKind::Verification,
            payload: verification_token.to_string(),
        });
        Ok(())
    }

    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        self.outbox.lock().unwrap().push(SentMail {
            to: to_email.to_string(),
            kind: MailKind::Otp,
            payload: code.to_string(),
        });
        Ok(())
    }

    async fn send_welcome_email(&self, to_email: &str) -> Result<(), AppError> {
        self.outbox.lock().unwrap().push(SentMail {
            to: to_email.to_string(),
            kind: MailKind::Welcome,
            payload: String::new(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_mailer_creation() {
        let config = crate::config::GmailConfig {
            user: "test@gmail.com".to_string(),
            app_password: "test_password".to_string(),
        };

        let mailer = SmtpMailer::new(&config);
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn test_mock_mailer_records_sends() {
        let mailer = MockMailer::new();
        mailer
            .send_otp_email("a@example.com", "123456")
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, MailKind::Otp);
        assert_eq!(
            mailer.last_payload_to("a@example.com", MailKind::Otp),
            Some("123456".to_string())
        );
    }
}
