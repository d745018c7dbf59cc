//! Test helper utilities shared by the unit test modules.

use crate::config::{Credentials, SuiteConfig};
use crate::retry::RetryPolicy;
use crate::types::{ApiResponse, ResponseBody};
use std::path::PathBuf;
use std::time::Duration;

pub const VALID_EMAIL: &str = "owner@example.com";
pub const VALID_PASSWORD: &str = "correct-horse";
pub const INVALID_EMAIL: &str = "ghost@example.com";
pub const INVALID_PASSWORD: &str = "nope";

/// Suite configuration pointing at the repository's fixture images
pub fn create_test_suite_config() -> SuiteConfig {
    SuiteConfig::new(
        Credentials::new(VALID_EMAIL, VALID_PASSWORD),
        Credentials::new(INVALID_EMAIL, INVALID_PASSWORD),
    )
    .with_fixtures_dir(fixtures_dir())
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/images")
}

/// Fast retry policy so failing tests do not wait on real backoff
pub fn create_fast_test_retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        backoff_multiplier: 2.0,
        total_timeout: Duration::from_millis(500),
        request_timeout: Duration::from_millis(100),
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse::new(status, ResponseBody::Json(body))
}

pub fn text_response(status: u16, body: &str) -> ApiResponse {
    ApiResponse::new(status, ResponseBody::Text(body.to_string()))
}

/// What the service answers to a refused key request
pub fn user_not_found_response() -> ApiResponse {
    text_response(
        403,
        "<!doctype html><title>403 Forbidden</title><h1>Forbidden</h1>\
         <p>This user wasn&#x27;t found in database</p>",
    )
}
