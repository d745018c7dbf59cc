use crate::error::ApiError;
use crate::types::ApiResponse;
use serde::Serialize;
use std::fmt;

/// Result of running one scenario case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The service honoured the contract
    Passed,

    /// The service broke the contract
    Failed { reason: String },

    /// The case could not run because its setup did not hold.
    ///
    /// Points at the environment (account, fixtures, service availability)
    /// rather than at the contract.
    PreconditionFailed { reason: String },

    /// The service is known to deviate here and the deviation was observed.
    ///
    /// Reported separately so it stays visible without failing the run.
    KnownIssue {
        expected: u16,
        observed: u16,
        note: String,
    },

    /// The service could not be asked, or its answer could not be read
    Errored { error: String },
}

/// Discriminant of [`Outcome`], used for tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Passed,
    Failed,
    PreconditionFailed,
    KnownIssue,
    Errored,
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn precondition_failed(reason: impl Into<String>) -> Self {
        Outcome::PreconditionFailed {
            reason: reason.into(),
        }
    }

    /// `Passed` when the status matches, `Failed` otherwise
    pub fn expect_status(response: &ApiResponse, expected: u16) -> Self {
        if response.status == expected {
            Outcome::Passed
        } else {
            Outcome::failed(format!(
                "expected status {expected}, got {} with body {}",
                response.status,
                truncate(&response.body.to_string(), 200)
            ))
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Passed => OutcomeKind::Passed,
            Outcome::Failed { .. } => OutcomeKind::Failed,
            Outcome::PreconditionFailed { .. } => OutcomeKind::PreconditionFailed,
            Outcome::KnownIssue { .. } => OutcomeKind::KnownIssue,
            Outcome::Errored { .. } => OutcomeKind::Errored,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Whether this outcome should fail the run
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. } | Outcome::Errored { .. })
    }
}

impl From<ApiError> for Outcome {
    fn from(error: ApiError) -> Self {
        Outcome::Errored {
            error: error.to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASSED"),
            Outcome::Failed { reason } => write!(f, "FAILED: {reason}"),
            Outcome::PreconditionFailed { reason } => {
                write!(f, "PRECONDITION FAILED: {reason}")
            }
            Outcome::KnownIssue {
                expected,
                observed,
                note,
            } => write!(
                f,
                "KNOWN ISSUE: expected {expected}, observed {observed} ({note})"
            ),
            Outcome::Errored { error } => write!(f, "ERROR: {error}"),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
