use crate::error::{ApiError, ApiResult};
use crate::logging::log_debug;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";
pub const DEFAULT_FIXTURES_DIR: &str = "tests/images";

/// Connection settings for [`PetFriendsClient`](crate::client::PetFriendsClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub retry_policy: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Validate client configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigurationError`] if the base URL is empty or
    /// does not use http(s), or if the retry policy allows zero attempts.
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::configuration_error("PetFriends base URL is required"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::configuration_error(format!(
                "PetFriends base URL must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.retry_policy.max_attempts == 0 {
            return Err(ApiError::configuration_error(
                "Retry policy must allow at least one attempt",
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Load client configuration from environment variables
    ///
    /// Reads `PETFRIENDS_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> ApiResult<Self> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("PETFRIENDS_BASE_URL") {
            config.base_url = base_url;
        }

        config.validate()?;

        log_debug!(
            base_url = %config.base_url,
            max_attempts = config.retry_policy.max_attempts,
            "PetFriends client configuration loaded"
        );

        Ok(config)
    }
}

/// An email/password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Passwords never reach logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Fixtures injected into every scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Account the service accepts
    pub valid: Credentials,
    /// Account the service rejects
    pub invalid: Credentials,
    /// Directory holding `dog.jpg` and `lol.txt`
    pub fixtures_dir: PathBuf,
}

impl SuiteConfig {
    pub const DEFAULT_INVALID_EMAIL: &'static str = "nobody@example.invalid";
    pub const DEFAULT_INVALID_PASSWORD: &'static str = "wrong-password";

    pub fn new(valid: Credentials, invalid: Credentials) -> Self {
        Self {
            valid,
            invalid,
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
        }
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    /// Validate suite configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigurationError`] if any credential is empty,
    /// or if the invalid email or password equals its valid counterpart.
    pub fn validate(&self) -> ApiResult<()> {
        if self.valid.email.is_empty() || self.valid.password.is_empty() {
            return Err(ApiError::configuration_error(
                "Valid PetFriends email and password are required",
            ));
        }
        if self.invalid.email.is_empty() || self.invalid.password.is_empty() {
            return Err(ApiError::configuration_error(
                "Invalid PetFriends email and password must not be empty",
            ));
        }
        // Each negative scenario swaps in one invalid field, so each must differ
        if self.invalid.email == self.valid.email {
            return Err(ApiError::configuration_error(
                "Invalid email must differ from the valid email",
            ));
        }
        if self.invalid.password == self.valid.password {
            return Err(ApiError::configuration_error(
                "Invalid password must differ from the valid password",
            ));
        }
        Ok(())
    }

    /// Load suite configuration from environment variables
    ///
    /// `PETFRIENDS_VALID_EMAIL` and `PETFRIENDS_VALID_PASSWORD` are required.
    /// `PETFRIENDS_INVALID_EMAIL`, `PETFRIENDS_INVALID_PASSWORD` and
    /// `PETFRIENDS_FIXTURES_DIR` fall back to defaults.
    pub fn from_env() -> ApiResult<Self> {
        let valid = Credentials::new(
            required_env("PETFRIENDS_VALID_EMAIL")?,
            required_env("PETFRIENDS_VALID_PASSWORD")?,
        );
        let invalid = Credentials::new(
            std::env::var("PETFRIENDS_INVALID_EMAIL")
                .unwrap_or_else(|_| Self::DEFAULT_INVALID_EMAIL.to_string()),
            std::env::var("PETFRIENDS_INVALID_PASSWORD")
                .unwrap_or_else(|_| Self::DEFAULT_INVALID_PASSWORD.to_string()),
        );

        let mut config = Self::new(valid, invalid);
        if let Ok(dir) = std::env::var("PETFRIENDS_FIXTURES_DIR") {
            config.fixtures_dir = PathBuf::from(dir);
        }

        config.validate()?;

        log_debug!(
            valid_email = %config.valid.email,
            invalid_email = %config.invalid.email,
            fixtures_dir = %config.fixtures_dir.display(),
            "Suite configuration loaded and validated"
        );

        Ok(config)
    }
}

fn required_env(name: &str) -> ApiResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::configuration_error(format!("{name} is not set"))),
    }
}
