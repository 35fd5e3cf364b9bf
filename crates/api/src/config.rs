use std::net::{AddrParseError, IpAddr, SocketAddr};

use crate::auth::jwt::JwtConfig;

/// HTTP server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS (comma-separated in `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    /// Whole-request deadline. Must exceed `GENERATION_TIMEOUT_SECS` so a slow
    /// backend surfaces as `GenerationUnavailable` rather than a bare 408.
    pub request_timeout_secs: u64,
    /// Grace period for closing the pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body. Every callable takes a small JSON object.
    pub max_body_bytes: usize,
    pub jwt: JwtConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} has an invalid value: {raw:?}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `90`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `MAX_BODY_BYTES`        | `65536`                 |
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 90),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            max_body_bytes: env_or("MAX_BODY_BYTES", 64 * 1024),
            jwt: JwtConfig::from_env(),
        }
    }

    /// Socket address to bind, from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
