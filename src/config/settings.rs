use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use tracing::warn;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("insecure production configuration: {0}")]
    Insecure(String),
}

/// Signing configuration for access tokens. Both fields are mandatory.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: Algorithm,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl JwtSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required("JWT_SECRET_KEY")?;
        let algorithm = parse_algorithm(&required("JWT_ALGORITHM")?)?;
        Ok(Self { secret, algorithm })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt: JwtSettings,
    pub cors_origins: CorsOrigins,
    pub host: IpAddr,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub environment: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtSettings::from_env()?;

        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        let host = optional_parsed("HOST", "127.0.0.1".parse().ok())?;
        let port = optional_parsed("PORT", Some(8080))?;
        let max_upload_bytes = optional_parsed("MAX_UPLOAD_BYTES", Some(DEFAULT_MAX_UPLOAD_BYTES))?;

        Ok(Self {
            database_url,
            jwt,
            cors_origins,
            host,
            port,
            max_upload_bytes,
            environment: current_environment(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Production deployments must not run with placeholder secrets or a
    /// wildcard CORS policy.
    pub fn validate_production(&self) -> Result<(), ConfigError> {
        if !self.is_production() {
            if self.cors_origins == CorsOrigins::Any {
                warn!("CORS_ORIGINS allows any origin (development only)");
            }
            return Ok(());
        }

        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::Insecure(
                "JWT_SECRET_KEY must be at least 32 bytes in production".into(),
            ));
        }

        let lowered = self.jwt.secret.to_ascii_lowercase();
        if lowered.contains("example") || lowered.contains("changeme") || lowered.contains("default")
        {
            return Err(ConfigError::Insecure(
                "JWT_SECRET_KEY appears to be a default value".into(),
            ));
        }

        if self.cors_origins == CorsOrigins::Any {
            return Err(ConfigError::Insecure(
                "CORS_ORIGINS must list explicit origins in production".into(),
            ));
        }

        Ok(())
    }
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional_parsed<T>(name: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        }
        _ => default.ok_or(ConfigError::Missing(name)),
    }
}

/// Only the HMAC family is accepted; the key is a shared secret.
pub fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim()).map_err(|e| ConfigError::Invalid {
        name: "JWT_ALGORITHM",
        reason: e.to_string(),
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            reason: format!("{other:?} needs an asymmetric key; use HS256, HS384 or HS512"),
        }),
    }
}

pub fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}
