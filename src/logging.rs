//! Logging utilities for petfriends-contract
//!
//! Re-exports tracing macros with log_* naming so call sites read the same
//! across the client, the scenarios and the runner.

pub use tracing::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
