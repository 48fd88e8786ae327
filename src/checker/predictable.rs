// src/checker/predictable.rs
// =============================================================================
// WCAG 3.2.x predictable behaviour.
//
// Each sub-check flags on its own; the overall status stays TESTED unless
// the page could not be evaluated.
// =============================================================================

use super::{count_flag, Checker, Evaluation, Outcome};
use crate::error::{EngineError, EngineResult};
use crate::fetch::DocumentContext;
use crate::report::{CheckResults, Status};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use std::collections::HashSet;

// Script that moves the browser somewhere else
static NAVIGATION_JS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)location\.href|window\.location|document\.location")
        .expect("navigation pattern is valid")
});

static HELP_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)help|faq|support").expect("help pattern is valid"));

const RECOMMENDATIONS: &[&str] = &[
    "Avoid changing pages automatically on focus or input events.",
    "Use <nav> landmarks and keep navigation order stable.",
    "Label components consistently across the site.",
    "Ensure context changes occur only after explicit user action (e.g., button click).",
    "Provide a persistent Help / FAQ link on every page.",
];

const KEYS: [&str; 6] = [
    "on_focus",
    "on_input",
    "consistent_navigation",
    "consistent_identification",
    "change_on_request",
    "consistent_help",
];

pub(super) const CHECKER: Checker = Checker {
    name: "predictability",
    description: "Context changes on focus/input, consistent navigation, labels and help",
    criteria: &["3.2.1", "3.2.2", "3.2.3", "3.2.4", "3.2.5", "3.2.6"],
    evaluation: Evaluation::Computed { evaluate, degrade },
};

fn evaluate(ctx: &DocumentContext) -> EngineResult<Outcome> {
    let mut results = CheckResults::new();

    // 3.2.1 On Focus
    let focus_nav = ctx
        .select("[onfocus]")?
        .iter()
        .filter(|el| handler_navigates(el, &["onfocus"]))
        .count();
    results.insert(
        "on_focus",
        if focus_nav == 0 {
            "✅ No focus-triggered navigation".to_string()
        } else {
            count_flag(focus_nav, "elements change context on focus")
        },
    );

    // 3.2.2 On Input
    let input_nav = ctx
        .select("[oninput], [onchange]")?
        .iter()
        .filter(|el| handler_navigates(el, &["oninput", "onchange"]))
        .count();
    results.insert(
        "on_input",
        if input_nav == 0 {
            "✅ No input-triggered context change".to_string()
        } else {
            count_flag(input_nav, "elements change context on input")
        },
    );

    // 3.2.3 Consistent Navigation
    results.insert(
        "consistent_navigation",
        if ctx.exists("nav")? {
            "✅ <nav> landmarks present"
        } else {
            "⚠️ No explicit <nav> landmarks detected"
        },
    );

    // 3.2.4 Consistent Identification
    let mut seen = HashSet::new();
    let duplicate_labels = ctx
        .select("button")?
        .iter()
        .map(|button| button.text().collect::<String>().trim().to_lowercase())
        .any(|label| !seen.insert(label));
    results.insert(
        "consistent_identification",
        if duplicate_labels {
            "⚠️ Duplicate button labels might cause confusion"
        } else {
            "✅ Component labelling appears consistent"
        },
    );

    // 3.2.5 Change on Request: a confirm() in the handler counts as user consent
    let auto_submit = ctx
        .select("form[onsubmit]")?
        .iter()
        .filter(|form| {
            let handler = form.value().attr("onsubmit").unwrap_or("");
            NAVIGATION_JS.is_match(handler) && !handler.contains("confirm(")
        })
        .count();
    results.insert(
        "change_on_request",
        if auto_submit == 0 {
            "✅ No unsolicited context changes detected".to_string()
        } else {
            count_flag(
                auto_submit,
                "forms submit automatically without user confirmation",
            )
        },
    );

    // 3.2.6 Consistent Help
    let help_link = ctx
        .select("a")?
        .iter()
        .any(|link| HELP_TEXT.is_match(&link.text().collect::<String>()));
    results.insert(
        "consistent_help",
        if help_link {
            "✅ Help links found"
        } else {
            "⚠️ No help links detected"
        },
    );

    Ok(Outcome {
        results,
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        status: Status::Tested,
    })
}

fn degrade(err: &EngineError) -> Outcome {
    let message = format!("❌ Error: {}", err);
    Outcome {
        results: KEYS.iter().map(|key| (*key, message.as_str())).collect(),
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        status: Status::Error,
    }
}

// True if any of the named event-handler attributes navigates away
fn handler_navigates(element: &ElementRef<'_>, attributes: &[&str]) -> bool {
    let script = attributes
        .iter()
        .filter_map(|name| element.value().attr(name))
        .collect::<Vec<_>>()
        .join(" ");
    NAVIGATION_JS.is_match(&script)
}
