//! # petfriends-contract
//!
//! Client and black-box contract suite for the PetFriends pet-adoption REST API.
//!
//! ## Key Features
//!
//! - **Uniform client**: every endpoint returns `(status, parsed body)`, so
//!   negative cases can assert on 4xx codes as ordinary data
//! - **Contract scenarios**: authentication, listing, creation, photo upload
//!   and update checks, including invalid-input cases
//! - **Isolation**: each case creates and deletes the pets it needs
//! - **Structured outcomes**: pass, fail, precondition failed, known issue
//! - **Resilience**: transport failures retried with exponential backoff
//!
//! ## Example
//!
//! ```rust,no_run
//! use petfriends_contract::{ClientConfig, PetFriendsApi, PetFriendsClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PetFriendsClient::new(ClientConfig::default())?;
//! let response = client.get_api_key("me@example.com", "secret").await?;
//! if let Some(key) = response.auth_key() {
//!     println!("got key {}", key.key);
//! }
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod retry;
pub mod scenarios;
pub mod types;

#[cfg(test)]
pub mod tests;

pub use client::{PetFriendsApi, PetFriendsClient};
pub use config::{ClientConfig, Credentials, SuiteConfig};
pub use error::{ApiError, ApiResult};
pub use report::{CaseReport, SuiteReport, Summary};
pub use retry::RetryPolicy;
pub use scenarios::{Case, ContractSuite, Outcome, OutcomeKind, Scenario};
pub use types::{ApiResponse, AuthKey, NewPet, Pet, PetField, PetListFilter, ResponseBody};
