//! Run reports: one entry per case plus a summary.

use crate::scenarios::{Outcome, OutcomeKind, Scenario};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub scenario: Scenario,
    pub case: String,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Counts per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub precondition_failed: usize,
    pub known_issues: usize,
    pub errored: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cases: Vec<CaseReport>,
    ) -> Self {
        Self {
            started_at,
            finished_at,
            cases,
        }
    }

    pub fn summary(&self) -> Summary {
        self.cases
            .iter()
            .fold(Summary::default(), |mut summary, case| {
                summary.total += 1;
                match case.outcome.kind() {
                    OutcomeKind::Passed => summary.passed += 1,
                    OutcomeKind::Failed => summary.failed += 1,
                    OutcomeKind::PreconditionFailed => summary.precondition_failed += 1,
                    OutcomeKind::KnownIssue => summary.known_issues += 1,
                    OutcomeKind::Errored => summary.errored += 1,
                }
                summary
            })
    }

    /// Whether any case failed or errored. Known issues and precondition
    /// failures are reported but do not count.
    pub fn has_failures(&self) -> bool {
        self.cases.iter().any(|case| case.outcome.is_failure())
    }

    pub fn cases_of(&self, scenario: Scenario) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(move |case| case.scenario == scenario)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{:<90} {}", case.case, case.outcome)?;
        }

        let summary = self.summary();
        write!(
            f,
            "\n{} cases: {} passed, {} failed, {} errored, {} precondition failed, {} known issues ({} ms)",
            summary.total,
            summary.passed,
            summary.failed,
            summary.errored,
            summary.precondition_failed,
            summary.known_issues,
            (self.finished_at - self.started_at).num_milliseconds()
        )
    }
}
