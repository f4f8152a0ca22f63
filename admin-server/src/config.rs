//! Server configuration
//!
//! Read once at startup from the environment (a `.env` file is loaded first
//! by `main`).
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | `DATABASE_URL` | - | required |
//! | `HTTP_PORT` | `8080` | |
//! | `ENVIRONMENT` | `development` | `development` / `staging` / `production` |
//! | `JWT_SECRET` | dev placeholder | required outside development |
//! | `JWT_EXPIRATION_MINUTES` | `1440` | |
//! | `S3_BUCKET` | `admin-media` | region comes from the AWS default chain |
//! | `OPENPAY_MERCHANT_ID` | dev placeholder | required outside development |
//! | `OPENPAY_PRIVATE_KEY` | dev placeholder | required outside development |
//! | `OPENPAY_SANDBOX` | `true` | |
//! | `LOG_LEVEL` | `info` | |
//! | `LOG_DIR` | - | enables daily rolling log files |
//! | `LOG_JSON` | `false` | JSON console output |

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    /// Bucket for product images and uploaded files
    pub s3_bucket: String,
    pub openpay_merchant_id: String,
    pub openpay_private_key: String,
    pub openpay_sandbox: bool,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(
        var: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match var(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let jwt_secret = Self::require_secret(&var, "JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".into());
        }

        Ok(Self {
            database_url: var("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret,
            jwt_expiration_minutes: var("JWT_EXPIRATION_MINUTES")
                .and_then(|m| m.parse().ok())
                .unwrap_or(1440),
            s3_bucket: var("S3_BUCKET").unwrap_or_else(|| "admin-media".into()),
            openpay_merchant_id: Self::require_secret(&var, "OPENPAY_MERCHANT_ID", &environment)?,
            openpay_private_key: Self::require_secret(&var, "OPENPAY_PRIVATE_KEY", &environment)?,
            openpay_sandbox: var("OPENPAY_SANDBOX")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR").filter(|s| !s.is_empty()),
            log_json: var("LOG_JSON").is_some_and(|v| v == "true" || v == "1"),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/admin")]).unwrap();
        assert!(config.is_development());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.jwt_expiration_minutes, 1440);
        assert!(config.openpay_sandbox);
        assert_eq!(config.jwt_secret, "dev-JWT_SECRET-not-for-production");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_production_requires_secrets() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db/admin"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = load(&[
            ("DATABASE_URL", "postgres://db/admin"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("32"));
    }

    #[test]
    fn test_production_config() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/admin"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("OPENPAY_MERCHANT_ID", "m123"),
            ("OPENPAY_PRIVATE_KEY", "sk_live"),
            ("OPENPAY_SANDBOX", "false"),
            ("HTTP_PORT", "9000"),
        ])
        .unwrap();
        assert!(!config.is_development());
        assert!(!config.openpay_sandbox);
        assert_eq!(config.http_port, 9000);
    }
}
