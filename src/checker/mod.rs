// src/checker/mod.rs
// =============================================================================
// This module holds the checker registry.
//
// Submodules:
// - canned: Stand-in checkers with fixed, content-independent results
// - timing: WCAG 2.2.x timing controls
// - readable: WCAG 3.1.x language and readability
// - text_stats: Word/syllable/sentence statistics for the readability checker
// - predictable: WCAG 3.2.x predictable behaviour
// - input_assistance: WCAG 3.3.x form input assistance
//
// Every checker is a `Checker` value: a name, its fixed criteria and an
// `Evaluation`. Canned and computed checkers sit behind the same type, so a
// canned one can grow real heuristics later without changing the Report.
// =============================================================================

mod canned;
mod input_assistance;
mod predictable;
mod readable;
mod text_stats;
mod timing;

use crate::error::{EngineError, EngineResult};
use crate::fetch::{normalize_url, DocumentContext, DocumentSource};
use crate::report::{CheckResults, Report, Status};
use log::{info, warn};

/// Results, advice and verdict produced by one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub results: CheckResults,
    pub recommendations: Vec<String>,
    pub status: Status,
}

/// A fixed outcome returned for any URL
#[derive(Debug, Clone, Copy)]
pub struct CannedOutcome {
    pub results: &'static [(&'static str, &'static str)],
    pub recommendations: &'static [&'static str],
    pub status: Status,
}

impl CannedOutcome {
    fn to_outcome(self) -> Outcome {
        Outcome {
            results: self.results.iter().copied().collect(),
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            status: self.status,
        }
    }
}

/// Heuristic run against a parsed document
pub type EvaluateFn = fn(&DocumentContext) -> EngineResult<Outcome>;

/// Builds the ERROR outcome (same result keys) when evaluation fails
pub type DegradeFn = fn(&EngineError) -> Outcome;

/// How a checker arrives at its outcome
#[derive(Clone, Copy)]
pub enum Evaluation {
    /// Placeholder pending real heuristics; never fetches
    Canned(CannedOutcome),
    /// Fetches the page once and applies heuristics to it
    Computed {
        evaluate: EvaluateFn,
        degrade: DegradeFn,
    },
}

/// One entry of the registry
#[derive(Clone, Copy)]
pub struct Checker {
    /// Stable name used to select the checker, e.g. "timing_controls"
    pub name: &'static str,
    /// One-line summary for listings
    pub description: &'static str,
    /// Criterion IDs covered, in display order
    pub criteria: &'static [&'static str],
    pub evaluation: Evaluation,
}

impl Checker {
    pub fn is_canned(&self) -> bool {
        matches!(self.evaluation, Evaluation::Canned(_))
    }

    /// Evaluates a URL and always returns a Report
    ///
    /// Fetch, parse and heuristic failures come back as an ERROR Report
    /// with the same result keys as a successful one.
    pub async fn run(&self, url: &str, source: &dyn DocumentSource) -> Report {
        let url = normalize_url(url);
        info!("Running {} checker on {}", self.name, url);

        let outcome = match self.evaluation {
            Evaluation::Canned(canned) => canned.to_outcome(),
            Evaluation::Computed { evaluate, degrade } => {
                match evaluate_url(&url, source, evaluate).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("{} checker could not evaluate {}: {}", self.name, url, e);
                        degrade(&e)
                    }
                }
            }
        };

        Report {
            criteria: self.criteria.iter().map(|c| c.to_string()).collect(),
            results: outcome.results,
            recommendations: outcome.recommendations,
            url,
            status: outcome.status,
        }
    }
}

// Fetch once, parse once, evaluate; the context dies with this call
async fn evaluate_url(
    url: &str,
    source: &dyn DocumentSource,
    evaluate: EvaluateFn,
) -> EngineResult<Outcome> {
    let markup = source.fetch(url).await?;
    let context = DocumentContext::parse(markup)?;
    evaluate(&context)
}

/// Every checker, in the order callers should present them
pub static REGISTRY: [Checker; 12] = [
    canned::KEYBOARD,
    timing::CHECKER,
    canned::SEIZURE_PREVENTION,
    canned::NAVIGATION_STRUCTURE,
    canned::INPUT_MODALITIES,
    canned::FOCUS_NOT_OBSCURED,
    canned::FOCUS_APPEARANCE,
    canned::DRAGGING_MOVEMENTS,
    canned::TARGET_SIZE_MINIMUM,
    readable::CHECKER,
    predictable::CHECKER,
    input_assistance::CHECKER,
];

pub fn registry() -> &'static [Checker] {
    &REGISTRY
}

/// Looks a checker up by its stable name
pub fn find(name: &str) -> Option<&'static Checker> {
    REGISTRY.iter().find(|checker| checker.name == name)
}

/// Renders a count of affected elements with the verdict marker used for
/// failures, e.g. "❌ 2 elements change context on focus"
pub(crate) fn count_flag(count: usize, subject: &str) -> String {
    format!("❌ {} {}", count, subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingSource, FixtureSource};
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<_> = registry().iter().map(|c| c.name).collect();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("timing_controls").unwrap().criteria[0], "2.2.1");
        assert!(find("no_such_checker").is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_gives_error_report_for_every_computed_checker() {
        let source = FailingSource;
        for checker in registry().iter().filter(|c| !c.is_canned()) {
            let report = checker.run("example.com", &source).await;
            assert_eq!(report.status, Status::Error, "{}", checker.name);
            assert_eq!(report.url, "https://example.com");
            assert!(!report.results.is_empty(), "{}", checker.name);
            assert!(
                report.results.values().all(|v| !v.trim().is_empty()),
                "{} has an empty result",
                checker.name
            );
            assert!(!report.recommendations.is_empty(), "{}", checker.name);
        }
    }

    #[tokio::test]
    async fn test_degraded_report_keeps_result_keys() {
        let page = FixtureSource::new("<html lang=\"en\"><body><p>Hi there.</p></body></html>");
        for checker in registry().iter().filter(|c| !c.is_canned()) {
            let ok = checker.run("example.com", &page).await;
            let failed = checker.run("example.com", &FailingSource).await;
            let ok_keys: Vec<_> = ok.results.keys().collect();
            let failed_keys: Vec<_> = failed.results.keys().collect();
            assert_eq!(ok_keys, failed_keys, "{}", checker.name);
        }
    }

    #[tokio::test]
    async fn test_empty_document_degrades_instead_of_failing() {
        let page = FixtureSource::new("");
        let report = find("predictability").unwrap().run("example.com", &page).await;
        assert_eq!(report.status, Status::Error);
        assert!(report.results.values().all(|v| v.starts_with("❌ Error")));
    }

    #[tokio::test]
    async fn test_same_markup_gives_identical_reports() {
        let html = r#"<html lang="en"><body>
            <nav><a href="/help">Help</a></nav>
            <form onsubmit="window.location='/x'"><input name="q"></form>
            <p>The WHO and the UN met. It was fine.</p>
        </body></html>"#;
        let page = FixtureSource::new(html);
        for checker in registry() {
            let first = serde_json::to_string(&checker.run("example.com", &page).await).unwrap();
            let second = serde_json::to_string(&checker.run("example.com", &page).await).unwrap();
            assert_eq!(first, second, "{}", checker.name);
        }
    }
}
