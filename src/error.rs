// src/error.rs
// =============================================================================
// Error taxonomy for the evaluation engine.
//
// None of these errors ever reach a caller of a checker or adapter: they are
// caught at that boundary and folded into a Report or ToolResult. Inside the
// engine they travel as ordinary Result values so `?` works everywhere.
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while evaluating a page or running a tool
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Network failure, timeout or non-success HTTP status on the initial fetch
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The fetched body could not be decoded or held no document
    #[error("failed to parse document: {reason}")]
    Parse { reason: String },

    /// A required binary or optional library is not available
    #[error("{dependency} not found. {hint}")]
    DependencyMissing { dependency: String, hint: String },

    /// An external process exited non-zero, timed out or could not be spawned
    #[error("{tool} failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// Any other fault raised while evaluating heuristics
    #[error("unexpected error: {0}")]
    Unclassified(String),
}

impl EngineError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        EngineError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(reason: impl ToString) -> Self {
        EngineError::Parse {
            reason: reason.to_string(),
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl ToString) -> Self {
        EngineError::ToolExecution {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    /// True when the failure is an absent binary/library rather than a fault
    pub fn is_dependency_missing(&self) -> bool {
        matches!(self, EngineError::DependencyMissing { .. })
    }
}

/// Result type used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_missing_message_names_binary() {
        let err = EngineError::DependencyMissing {
            dependency: "npx".to_string(),
            hint: "Node.js is required.".to_string(),
        };
        assert_eq!(err.to_string(), "npx not found. Node.js is required.");
        assert!(err.is_dependency_missing());
    }

    #[test]
    fn test_fetch_message() {
        let err = EngineError::fetch("https://example.com", "Request timed out");
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com: Request timed out"
        );
        assert!(!err.is_dependency_missing());
    }
}
