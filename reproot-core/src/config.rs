//! Base settings shared by every RepRoot binary. Service-specific
//! configuration layers on top of this in the service crate.

use crate::error::AppError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Layered load: an optional `reproot` config file, then `REPROOT__*`
    /// environment variables on top.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("reproot").required(false))
            .add_source(config::Environment::with_prefix("REPROOT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
