//! Test utilities for unit and HTTP-level integration tests.
//!
//! Builders here construct app state directly instead of reading the
//! process environment, so tests stay hermetic and parallel-safe.

use std::sync::Arc;

use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    infra::config::{AppConfig, PathWhitelist},
};

/// Shared signing secret for tests that need matching issue/verify sides.
pub const TEST_SECRET: &str = "test-signing-secret";

/// Build an `AppConfig` for tests, with overrides applied on top of
/// defaults.
pub fn test_config(overrides: impl FnOnce(&mut AppConfig)) -> AppConfig {
    let mut config = AppConfig {
        jwt_secret: SecretString::from(TEST_SECRET.to_string()),
        access_token_ttl: Duration::hours(1),
        auth_whitelist: PathWhitelist::default(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: "http://localhost:3000".parse().unwrap(),
    };
    overrides(&mut config);
    config
}

pub fn test_app_state(overrides: impl FnOnce(&mut AppConfig)) -> AppState {
    AppState {
        config: Arc::new(test_config(overrides)),
    }
}
