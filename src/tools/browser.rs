// src/tools/browser.rs
// =============================================================================
// Accessibility-tree snapshots from a headless browser.
//
// BrowserLauncher / BrowserSession are the seam. HeadlessChromium is the real
// implementation (chromiumoxide, behind the `browser` cargo feature); without
// the feature it reports a missing dependency so callers still get a
// ToolResult.
//
// Whatever happens during the snapshot, the session is closed before
// capture_accessibility_tree returns.
// =============================================================================

use crate::error::{EngineError, EngineResult};
use crate::fetch::normalize_url;
use crate::report::{ToolOutcome, ToolResult};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

const TOOL_NAME: &str = "chromedevtools-accessibility-tree";

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> EngineResult<Box<dyn BrowserSession>>;
}

/// A running browser that can snapshot one page at a time
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url` and return its full accessibility tree as JSON
    async fn snapshot(&mut self, url: &str) -> EngineResult<Value>;

    /// Shut the browser down and release its process
    async fn close(&mut self) -> EngineResult<()>;
}

/// Captures the accessibility tree of `url`
///
/// `timeout` bounds the launch and the snapshot separately. Closing is not
/// bounded; a failed close is logged and does not change the result.
pub async fn capture_accessibility_tree(
    url: &str,
    launcher: &dyn BrowserLauncher,
    timeout: Duration,
) -> ToolResult {
    let url = normalize_url(url);
    info!("Capturing accessibility tree of {}", url);

    let outcome = match tokio::time::timeout(timeout, launcher.launch()).await {
        Err(_) => timed_out(timeout).into(),
        Ok(Err(e)) => e.into(),
        Ok(Ok(mut session)) => {
            let snapshot = tokio::time::timeout(timeout, session.snapshot(&url)).await;

            if let Err(e) = session.close().await {
                warn!("Browser did not close cleanly: {}", e);
            }

            match snapshot {
                Ok(Ok(tree)) => ToolOutcome::Parsed(tree),
                Ok(Err(e)) => e.into(),
                Err(_) => timed_out(timeout).into(),
            }
        }
    };

    if let Some(error) = outcome.error() {
        warn!("No accessibility tree for {}: {}", url, error);
    }

    ToolResult::new(TOOL_NAME, url, outcome)
}

fn timed_out(timeout: Duration) -> EngineError {
    EngineError::tool(TOOL_NAME, format!("timed out after {:?}", timeout))
}

/// Waits on a page's lifecycle event names until the navigated document
/// reports `networkIdle`
///
/// Idle events seen before the new document's `init` belong to the previous
/// page and are skipped.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub(crate) async fn wait_for_network_idle<S>(mut lifecycle: S) -> EngineResult<()>
where
    S: Stream<Item = String> + Unpin,
{
    let mut navigated = false;
    while let Some(name) = lifecycle.next().await {
        match name.as_str() {
            "init" => navigated = true,
            "networkIdle" if navigated => return Ok(()),
            _ => {}
        }
    }
    Err(EngineError::tool(
        "chromium",
        "page closed before the network went idle",
    ))
}

/// Launches a local headless Chromium
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessChromium;

#[cfg(not(feature = "browser"))]
#[async_trait]
impl BrowserLauncher for HeadlessChromium {
    async fn launch(&self) -> EngineResult<Box<dyn BrowserSession>> {
        Err(EngineError::DependencyMissing {
            dependency: "chromiumoxide".to_string(),
            hint: "Rebuild with `--features browser` and install Chromium to capture accessibility trees."
                .to_string(),
        })
    }
}

#[cfg(feature = "browser")]
mod chromium {
    use super::{wait_for_network_idle, BrowserLauncher, BrowserSession, HeadlessChromium};
    use crate::error::{EngineError, EngineResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::cdp::browser_protocol::accessibility::{EnableParams, GetFullAxTreeParams};
    use chromiumoxide::cdp::browser_protocol::page::{
        EventLifecycleEvent, SetLifecycleEventsEnabledParams,
    };
    use futures::StreamExt;
    use log::debug;
    use serde_json::Value;
    use tokio::task::JoinHandle;

    struct ChromiumSession {
        browser: Browser,
        events: JoinHandle<()>,
    }

    #[async_trait]
    impl BrowserLauncher for HeadlessChromium {
        async fn launch(&self) -> EngineResult<Box<dyn BrowserSession>> {
            // build() fails when no Chromium executable can be found
            let config = BrowserConfig::builder().build().map_err(|e| {
                EngineError::DependencyMissing {
                    dependency: "Chromium".to_string(),
                    hint: format!("Install Chrome or Chromium to capture accessibility trees ({}).", e),
                }
            })?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| EngineError::tool("chromium", format!("failed to launch: {}", e)))?;

            // The CDP connection only makes progress while its handler is polled
            let events = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
                debug!("Chromium event loop exited");
            });

            Ok(Box::new(ChromiumSession { browser, events }))
        }
    }

    #[async_trait]
    impl BrowserSession for ChromiumSession {
        async fn snapshot(&mut self, url: &str) -> EngineResult<Value> {
            // Subscribe on a blank page first so no lifecycle event of the
            // real navigation is missed
            let page = self
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| EngineError::tool("chromium", format!("failed to open page: {}", e)))?;
            let lifecycle = page
                .event_listener::<EventLifecycleEvent>()
                .await
                .map_err(|e| EngineError::tool("chromium", format!("lifecycle listener failed: {}", e)))?;
            page.execute(SetLifecycleEventsEnabledParams::new(true))
                .await
                .map_err(|e| EngineError::tool("chromium", format!("lifecycle events failed: {}", e)))?;

            page.goto(url)
                .await
                .map_err(|e| EngineError::fetch(url, e))?;

            let names = lifecycle.map(|event| event.name.clone());
            futures::pin_mut!(names);
            wait_for_network_idle(names).await?;
            debug!("{} reached network idle", url);

            page.execute(EnableParams::default())
                .await
                .map_err(|e| EngineError::tool("chromium", format!("Accessibility.enable failed: {}", e)))?;
            let tree = page
                .execute(GetFullAxTreeParams::default())
                .await
                .map_err(|e| EngineError::tool("chromium", format!("getFullAXTree failed: {}", e)))?;

            debug!("Accessibility tree of {} has {} nodes", url, tree.nodes.len());
            serde_json::to_value(&tree.nodes).map_err(|e| EngineError::Unclassified(e.to_string()))
        }

        async fn close(&mut self) -> EngineResult<()> {
            let closed = self
                .browser
                .close()
                .await
                .map(|_| ())
                .map_err(|e| EngineError::tool("chromium", format!("close failed: {}", e)));
            // Reap the child even when the close command failed
            let _ = self.browser.wait().await;
            self.events.abort();
            closed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ToolStatus;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy)]
    enum Behaviour {
        Tree,
        Fail,
        Hang,
    }

    struct FakeSession {
        behaviour: Behaviour,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn snapshot(&mut self, _url: &str) -> EngineResult<Value> {
            match self.behaviour {
                Behaviour::Tree => Ok(json!([{"nodeId": "1", "role": {"value": "RootWebArea"}}])),
                Behaviour::Fail => Err(EngineError::fetch("https://example.com", "net::ERR_NAME_NOT_RESOLVED")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(Value::Null)
                }
            }
        }

        async fn close(&mut self) -> EngineResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeLauncher {
        behaviour: Behaviour,
        closes: Arc<AtomicUsize>,
    }

    impl FakeLauncher {
        fn new(behaviour: Behaviour) -> Self {
            FakeLauncher {
                behaviour,
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        async fn launch(&self) -> EngineResult<Box<dyn BrowserSession>> {
            Ok(Box::new(FakeSession {
                behaviour: self.behaviour,
                closes: self.closes.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn test_snapshot_success_closes_session() {
        let launcher = FakeLauncher::new(Behaviour::Tree);
        let result = capture_accessibility_tree("example.com", &launcher, Duration::from_secs(5)).await;
        assert_eq!(result.tool, "chromedevtools-accessibility-tree");
        assert_eq!(result.url, "https://example.com");
        assert!(result.is_ok());
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_error_closes_session() {
        let launcher = FakeLauncher::new(Behaviour::Fail);
        let result = capture_accessibility_tree("example.com", &launcher, Duration::from_secs(5)).await;
        assert_eq!(result.status, ToolStatus::ExecutionError);
        assert!(result.result.error().unwrap().contains("ERR_NAME_NOT_RESOLVED"));
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_timeout_closes_session() {
        let launcher = FakeLauncher::new(Behaviour::Hang);
        let result =
            capture_accessibility_tree("example.com", &launcher, Duration::from_millis(50)).await;
        assert_eq!(result.status, ToolStatus::ExecutionError);
        assert_eq!(
            result.result.error(),
            Some("chromedevtools-accessibility-tree failed: timed out after 50ms")
        );
        assert_eq!(launcher.closes(), 1);
    }

    fn lifecycle(names: &[&str]) -> impl Stream<Item = String> + Unpin {
        futures::stream::iter(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_network_idle_after_navigation() {
        let events = lifecycle(&["init", "DOMContentLoaded", "load", "networkAlmostIdle", "networkIdle"]);
        assert_eq!(wait_for_network_idle(events).await, Ok(()));
    }

    #[tokio::test]
    async fn test_idle_from_previous_document_is_ignored() {
        // The blank page's idle arrives first; the real page never settles
        let events = lifecycle(&["networkIdle", "init", "load"]);
        assert!(wait_for_network_idle(events).await.is_err());

        let events = lifecycle(&["networkIdle", "init", "load", "networkIdle"]);
        assert!(wait_for_network_idle(events).await.is_ok());
    }

    #[tokio::test]
    async fn test_network_idle_wait_is_bounded_by_timeout() {
        let never = futures::stream::pending::<String>();
        let waited =
            tokio::time::timeout(Duration::from_millis(20), wait_for_network_idle(never)).await;
        assert!(waited.is_err());
    }

    #[cfg(not(feature = "browser"))]
    #[tokio::test]
    async fn test_without_browser_feature_dependency_is_missing() {
        let result =
            capture_accessibility_tree("example.com", &HeadlessChromium, Duration::from_secs(1)).await;
        assert_eq!(result.status, ToolStatus::DependencyMissing);
        assert!(result.result.error().unwrap().contains("--features browser"));
    }
}
