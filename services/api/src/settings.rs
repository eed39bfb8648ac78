//! Service settings loaded from `PLANNER_*` environment variables

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

/// Where documents are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Postgres,
    Memory,
}

/// Credentials of the administrator created at start-up when missing
#[derive(Debug, Clone, PartialEq)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub storage: Storage,
    pub jwt_secret: String,
    pub token_expiry_seconds: u64,
    pub login_max_attempts: u32,
    pub login_window_seconds: u64,
    pub login_ban_seconds: u64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub admin_email: Option<String>,
}

impl Settings {
    /// Load settings from the environment on top of the defaults
    ///
    /// # Environment Variables
    /// - `PLANNER_HOST` (default: 0.0.0.0), `PLANNER_PORT` (default: 3001)
    /// - `PLANNER_STORAGE`: `postgres` or `memory` (default: postgres)
    /// - `PLANNER_JWT_SECRET`: token signing secret (required)
    /// - `PLANNER_TOKEN_EXPIRY_SECONDS` (default: 3600)
    /// - `PLANNER_LOGIN_MAX_ATTEMPTS`, `PLANNER_LOGIN_WINDOW_SECONDS`,
    ///   `PLANNER_LOGIN_BAN_SECONDS` (default: 5, 300, 900)
    /// - `PLANNER_ADMIN_USERNAME`, `PLANNER_ADMIN_PASSWORD`, `PLANNER_ADMIN_EMAIL`
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("storage", "postgres")?
            .set_default("token_expiry_seconds", 3600)?
            .set_default("login_max_attempts", 5)?
            .set_default("login_window_seconds", 300)?
            .set_default("login_ban_seconds", 900)?
            .add_source(Environment::with_prefix("PLANNER").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("PLANNER_JWT_SECRET must not be empty".into()));
        }

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limiter(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: self.login_max_attempts,
            window_seconds: self.login_window_seconds,
            ban_duration_seconds: self.login_ban_seconds,
        }
    }

    /// Admin credentials, if all three were configured
    pub fn admin_bootstrap(&self) -> Option<AdminBootstrap> {
        match (&self.admin_username, &self.admin_password, &self.admin_email) {
            (Some(username), Some(password), Some(email)) => Some(AdminBootstrap {
                username: username.clone(),
                password: password.clone(),
                email: email.clone(),
            }),
            _ => None,
        }
    }
}
