use reproot_core::config as core_config;
use reproot_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub google: GoogleOAuthConfig,
    pub gmail: GmailConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of the short-lived token mailed out for email verification.
    pub verification_token_expiry_minutes: i64,
    /// Lifetime of the session token returned on login.
    pub session_token_expiry_days: i64,
    pub otp_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailConfig {
    pub user: String,
    pub app_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub frontend_url: String,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::Config(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = PortalConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("reproot-api"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("reproot"), is_prod)?,
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", None, is_prod)?,
                verification_token_expiry_minutes: get_env(
                    "JWT_VERIFICATION_TOKEN_EXPIRY_MINUTES",
                    Some("10"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::Config(anyhow::anyhow!(e.to_string()))
                })?,
                session_token_expiry_days: get_env(
                    "JWT_SESSION_TOKEN_EXPIRY_DAYS",
                    Some("3"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::Config(anyhow::anyhow!(e.to_string()))
                })?,
                otp_expiry_minutes: get_env("OTP_EXPIRY_MINUTES", Some("10"), is_prod)?
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        AppError::Config(anyhow::anyhow!(e.to_string()))
                    })?,
            },
            google: GoogleOAuthConfig {
                client_id: get_env("GOOGLE_CLIENT_ID", Some(""), is_prod)?,
                client_secret: get_env("GOOGLE_CLIENT_SECRET", Some(""), is_prod)?,
                redirect_uri: get_env(
                    "GOOGLE_REDIRECT_URI",
                    Some("http://localhost:8080/api/auth/google/callback"),
                    is_prod,
                )?,
            },
            gmail: GmailConfig {
                user: get_env("GMAIL_USER", Some(""), is_prod)?,
                app_password: get_env("GMAIL_APP_PASSWORD", Some(""), is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"), is_prod)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                frontend_url: get_env("FRONTEND_URL", Some("http://localhost:3000"), is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == Environment::Prod
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.secret.is_empty() {
            return Err(AppError::Config(anyhow::anyhow!("JWT_SECRET must be set")));
        }

        if self.jwt.verification_token_expiry_minutes <= 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "JWT_VERIFICATION_TOKEN_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.jwt.session_token_expiry_days <= 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "JWT_SESSION_TOKEN_EXPIRY_DAYS must be positive"
            )));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::Config(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
