// src/report.rs
// =============================================================================
// The output envelopes shared by every checker and adapter.
//
// - Report: what a checker returns (criteria, per-sub-check results,
//   recommendations, url, overall status)
// - ToolResult: what an external scanner or the browser adapter returns
//   (an opaque third-party payload instead of our own criteria)
//
// Both serialize to JSON. Nothing here carries timestamps or hash-ordered
// maps, so the same input always serializes to the same bytes.
// =============================================================================

use crate::error::EngineError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Overall verdict of a checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Heuristics ran and produced findings
    Tested,
    /// Nothing risky to report
    Safe,
    /// Red flags found that a human should look at
    NeedsReview,
    /// Cannot be judged statically; needs hands-on testing
    NeedsTesting,
    /// The page could not be evaluated
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Tested => "TESTED",
            Status::Safe => "SAFE",
            Status::NeedsReview => "NEEDS_REVIEW",
            Status::NeedsTesting => "NEEDS_TESTING",
            Status::Error => "ERROR",
        }
    }
}

/// Sub-check results in the order the checker declared them
///
/// Serialized as a JSON object; a Vec keeps the key order stable where a
/// HashMap would not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResults(Vec<(String, String)>);

impl CheckResults {
    pub fn new() -> Self {
        CheckResults(Vec::new())
    }

    /// Append a sub-check; replaces the value if the key is already present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CheckResults {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut results = CheckResults::new();
        for (key, value) in iter {
            results.insert(key, value);
        }
        results
    }
}

impl Serialize for CheckResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The canonical output of every checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Criterion IDs this checker covers, e.g. "2.2.1"
    pub criteria: Vec<String>,
    /// Sub-check name -> verdict marker plus explanation
    pub results: CheckResults,
    /// Remediation advice; never empty
    pub recommendations: Vec<String>,
    /// The normalized URL that was evaluated
    pub url: String,
    /// Single overall verdict
    pub status: Status,
}

impl Report {
    /// True for the two verdicts that need no follow-up
    pub fn is_clean(&self) -> bool {
        matches!(self.status, Status::Tested | Status::Safe)
    }
}

/// Outcome discriminant of a ToolResult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    DependencyMissing,
    ExecutionError,
}

/// What an external tool or the browser handed back
///
/// Untagged so the payload appears as-is: parsed JSON, `{"stdout": ...}`
/// for non-JSON output, `{"error": ...}` for failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    /// The tool printed JSON; this is it
    Parsed(serde_json::Value),
    /// The tool succeeded but printed something other than JSON
    Raw { stdout: String },
    /// The binary or library needed to run the tool is absent
    DependencyMissing { error: String },
    /// The tool ran and failed, timed out or could not be spawned
    ExecutionError { error: String },
}

impl ToolOutcome {
    pub fn status(&self) -> ToolStatus {
        match self {
            ToolOutcome::Parsed(_) | ToolOutcome::Raw { .. } => ToolStatus::Ok,
            ToolOutcome::DependencyMissing { .. } => ToolStatus::DependencyMissing,
            ToolOutcome::ExecutionError { .. } => ToolStatus::ExecutionError,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ToolOutcome::DependencyMissing { error } | ToolOutcome::ExecutionError { error } => {
                Some(error)
            }
            _ => None,
        }
    }
}

impl From<EngineError> for ToolOutcome {
    fn from(err: EngineError) -> Self {
        if err.is_dependency_missing() {
            ToolOutcome::DependencyMissing {
                error: err.to_string(),
            }
        } else {
            ToolOutcome::ExecutionError {
                error: err.to_string(),
            }
        }
    }
}

/// Output envelope of the external tool and browser adapters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub tool: String,
    pub url: String,
    pub status: ToolStatus,
    pub result: ToolOutcome,
}

impl ToolResult {
    pub fn new(tool: impl Into<String>, url: impl Into<String>, result: ToolOutcome) -> Self {
        ToolResult {
            tool: tool.into(),
            url: url.into(),
            status: result.status(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ToolStatus::Ok
    }
}

/// Output of the comprehensive-assessment placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub result: String,
}
