// src/config.rs
// =============================================================================
// Static configuration for the engine.
//
// The engine has no config files and reads no environment variables; every
// knob is a constant with an optional override through EngineConfig (the CLI
// maps its --*-timeout flags onto it).
// =============================================================================

use std::time::Duration;

/// Timeout for the single GET that retrieves the page under audit
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for an external CLI scanner run
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(180);

/// Timeout for navigating and snapshotting in the headless browser
pub const BROWSER_TIMEOUT: Duration = Duration::from_secs(60);

/// Identifying header sent with every fetch
pub const USER_AGENT: &str = "Mozilla/5.0 (WCAG-audit)";

/// Maximum number of characters kept in a document's text sample
pub const TEXT_SAMPLE_CAP: usize = 15_000;

/// Runtime configuration shared by the engine's collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub fetch_timeout: Duration,
    pub tool_timeout: Duration,
    pub browser_timeout: Duration,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            fetch_timeout: FETCH_TIMEOUT,
            tool_timeout: TOOL_TIMEOUT,
            browser_timeout: BROWSER_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_browser_timeout(mut self, timeout: Duration) -> Self {
        self.browser_timeout = timeout;
        self
    }
}
