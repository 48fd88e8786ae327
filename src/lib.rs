// src/lib.rs
// =============================================================================
// wcag-guardian: heuristic WCAG 2.2 checks plus adapters for third-party
// accessibility scanners.
//
// Modules:
// - checker: The registry of criterion checkers and their heuristics
// - fetch: URL normalization, page retrieval and parsing
// - tools: External CLI scanners and headless-browser snapshots
// - report: Report / ToolResult envelopes
// - engine: Engine facade bundling configuration and collaborators
// - config / error: Constants, overrides and the error taxonomy
//
// Every public operation returns a Report or ToolResult, even on failure.
// =============================================================================

pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod report;
pub mod tools;

pub use checker::{find, registry, Checker};
pub use config::EngineConfig;
pub use engine::{assess_website, Engine};
pub use error::{EngineError, EngineResult};
pub use report::{Assessment, CheckResults, Report, Status, ToolOutcome, ToolResult, ToolStatus};
pub use tools::ExternalTool;
