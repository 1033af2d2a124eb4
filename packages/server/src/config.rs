use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub email_user: String,
    pub email_pass: String,
    pub mail_from: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub cloudinary_folder: String,
    /// Client-side analytics key; passed through, never used server-side.
    pub posthog_key: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let email_user = env::var("EMAIL_USER").context("EMAIL_USER must be set")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid number")?,
            email_pass: env::var("EMAIL_PASS").context("EMAIL_PASS must be set")?,
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| email_user.clone()),
            email_user,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .context("CLOUDINARY_CLOUD_NAME must be set")?,
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY")
                .context("CLOUDINARY_API_KEY must be set")?,
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET")
                .context("CLOUDINARY_API_SECRET must be set")?,
            cloudinary_folder: env::var("CLOUDINARY_FOLDER")
                .unwrap_or_else(|_| "dev_events".to_string()),
            posthog_key: env::var("POSTHOG_KEY").ok().filter(|k| !k.is_empty()),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    /// Database settings only, for tooling that never sends mail or uploads.
    pub fn database_from_env() -> Result<(String, u32)> {
        let _ = dotenv();
        let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid number")?;
        Ok((url, max))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
