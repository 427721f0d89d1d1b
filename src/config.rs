use anyhow::Context;
use std::env;

/// Process configuration, resolved once at startup. Anything required to
/// serve a request (database, token signing secret) fails here rather than
/// on the first request that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_jwt_secret_fails_at_startup() {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/storefront");
            env::remove_var("JWT_SECRET");
        }
        assert!(AppConfig::from_env().is_err());

        unsafe { env::set_var("JWT_SECRET", "startup-secret") };
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.jwt_secret, "startup-secret");
        assert_eq!(config.port, 3000);
    }
}
