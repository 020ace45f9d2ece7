use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    /// Path patterns exempt from token verification (health probes, docs).
    pub auth_whitelist: PathWhitelist,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set")
            .into();

        let access_token_ttl_secs: i64 = env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or("86400".to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_SECS must be a valid number");

        let auth_whitelist = PathWhitelist::parse(&env::var("AUTH_WHITELIST").unwrap_or_default());

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:3001".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        Self {
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            auth_whitelist,
            bind_addr,
            cors_origin,
        }
    }
}

/// Request paths exempt from token verification.
///
/// A pattern ending in `/**` matches the prefix itself and anything below
/// it; every other pattern must match exactly.
#[derive(Debug, Clone, Default)]
pub struct PathWhitelist {
    patterns: Vec<String>,
}

impl PathWhitelist {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated pattern list, ignoring empty entries.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim).filter(|p| !p.is_empty()))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| match pattern.strip_suffix("/**") {
                Some(prefix) => {
                    path == prefix
                        || path
                            .strip_prefix(prefix)
                            .is_some_and(|rest| rest.starts_with('/'))
                }
                None => path == pattern,
            })
    }
}
