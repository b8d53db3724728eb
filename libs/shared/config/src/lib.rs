use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    /// Shared secret for the voice-agent webhook. Empty means the
    /// signature check is disabled.
    pub vapi_webhook_secret: String,
    pub cors_origins: Option<String>,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| {
                warn!("DATABASE_URL not set, using empty value");
                String::new()
            }),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            vapi_webhook_secret: env::var("VAPI_WEBHOOK_SECRET").unwrap_or_else(|_| {
                warn!("VAPI_WEBHOOK_SECRET not set, webhook signature check disabled");
                String::new()
            }),
            cors_origins: env::var("CORS_ORIGINS").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| {
                warn!("BIND_ADDR not set, using default");
                "0.0.0.0:3000".to_string()
            }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.jwt_secret.is_empty()
    }

    /// Comma-separated CORS_ORIGINS split into a list; empty when unset.
    pub fn origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_list_splits_and_trims() {
        let config = AppConfig {
            database_url: String::new(),
            jwt_secret: String::new(),
            vapi_webhook_secret: String::new(),
            cors_origins: Some("http://localhost:5173, https://app.example.org ,".to_string()),
            bind_addr: "0.0.0.0:3000".to_string(),
        };
        assert_eq!(
            config.origins_list(),
            vec!["http://localhost:5173", "https://app.example.org"]
        );
    }

    #[test]
    fn origins_list_empty_when_unset() {
        let config = AppConfig {
            database_url: String::new(),
            jwt_secret: String::new(),
            vapi_webhook_secret: String::new(),
            cors_origins: None,
            bind_addr: "0.0.0.0:3000".to_string(),
        };
        assert!(config.origins_list().is_empty());
    }
}
