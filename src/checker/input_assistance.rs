// src/checker/input_assistance.rs
// =============================================================================
// WCAG 3.3.x input assistance.
//
// Looks at every form control (input, textarea, select) and the forms around
// them. Sub-checks flag independently; there is no aggregate verdict beyond
// TESTED, or ERROR when the page could not be evaluated.
// =============================================================================

use super::{count_flag, Checker, Evaluation, Outcome};
use crate::error::{EngineError, EngineResult};
use crate::fetch::DocumentContext;
use crate::report::{CheckResults, Status};
use scraper::ElementRef;
use std::collections::HashSet;

// Input types that are never shown as a field and need no label
const LABEL_EXEMPT_TYPES: &[&str] = &["hidden", "submit", "button", "reset", "image"];

const RECOMMENDATIONS: &[&str] = &[
    "Provide programmatically associated labels for every form control.",
    "Use inline validation (aria-invalid) and descriptive error messages.",
    "Confirm critical transactions before final submission.",
    "Offer help text via aria-describedby or visible instructions.",
    "Enable autocomplete and avoid redundant data entry.",
    "Provide passkey / MFA / passwordless authentication options.",
];

const KEYS: [&str; 9] = [
    "error_identification",
    "labels_instructions",
    "error_suggestion",
    "error_prevention_critical",
    "help",
    "error_prevention_all",
    "redundant_entry",
    "accessible_auth_minimum",
    "accessible_auth_enhanced",
];

pub(super) const CHECKER: Checker = Checker {
    name: "input_assistance",
    description: "Form labels, error identification and prevention, help and authentication",
    criteria: &[
        "3.3.1", "3.3.2", "3.3.3", "3.3.4", "3.3.5", "3.3.6", "3.3.7", "3.3.8", "3.3.9",
    ],
    evaluation: Evaluation::Computed { evaluate, degrade },
};

fn evaluate(ctx: &DocumentContext) -> EngineResult<Outcome> {
    let controls = ctx.select("input, textarea, select")?;
    let mut results = CheckResults::new();

    // 3.3.1 Error Identification
    let aria_invalid = controls
        .iter()
        .any(|el| el.value().attr("aria-invalid") == Some("true"));
    results.insert(
        "error_identification",
        if aria_invalid {
            "✅ aria-invalid markers present"
        } else {
            "⚠️ No inline validation attributes found"
        },
    );

    // 3.3.2 Labels or Instructions
    let labelled_ids: HashSet<&str> = ctx
        .select("label[for]")?
        .iter()
        .filter_map(|label| label.value().attr("for"))
        .collect();
    let unlabeled = controls
        .iter()
        .filter(|el| needs_label(el) && !is_labelled(el, &labelled_ids))
        .count();
    results.insert(
        "labels_instructions",
        if unlabeled == 0 {
            "✅ All form controls have labels".to_string()
        } else {
            count_flag(unlabeled, "controls missing labels")
        },
    );

    // 3.3.3 Error Suggestion
    results.insert(
        "error_suggestion",
        if ctx.markup().to_lowercase().contains("error") {
            "✅ Potential error message elements found"
        } else {
            "⚠️ Could not detect automatic error suggestion patterns"
        },
    );

    // 3.3.4 Error Prevention (Legal, Financial, Data)
    let confirmed_forms = ctx.select("form[onsubmit]")?.iter().any(|form| {
        form.value()
            .attr("onsubmit")
            .map(|handler| handler.contains("confirm("))
            .unwrap_or(false)
    });
    results.insert(
        "error_prevention_critical",
        if confirmed_forms {
            "✅ Confirmation prompts present"
        } else {
            "⚠️ No confirmation prompts detected for critical forms"
        },
    );

    // 3.3.5 Help
    results.insert(
        "help",
        if ctx.exists("[aria-describedby]")? {
            "✅ Help descriptors present"
        } else {
            "⚠️ No help descriptors detected"
        },
    );

    // 3.3.6 Error Prevention (All)
    let autocomplete_off = controls
        .iter()
        .any(|el| el.value().attr("autocomplete") == Some("off"));
    results.insert(
        "error_prevention_all",
        if autocomplete_off {
            "⚠️ Some inputs disable autocomplete"
        } else {
            "✅ Autocomplete available on inputs"
        },
    );

    // 3.3.7 Redundant Entry
    let redundant = duplicate_names(&controls);
    results.insert(
        "redundant_entry",
        if redundant.is_empty() {
            "✅ No obvious redundant fields".to_string()
        } else {
            format!("⚠️ Possible redundant entry fields: {}", redundant.join(", "))
        },
    );

    // 3.3.8 / 3.3.9 Accessible Authentication
    let password_fields = controls
        .iter()
        .any(|el| el.value().attr("type") == Some("password"));
    results.insert(
        "accessible_auth_minimum",
        if password_fields {
            "⚠️ Password fields present – ensure alternative authentication methods"
        } else {
            "✅ No password-only authentication detected"
        },
    );
    results.insert(
        "accessible_auth_enhanced",
        "⚠️ Unable to verify enhanced authentication heuristics",
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

fn needs_label(control: &ElementRef<'_>) -> bool {
    let kind = control
        .value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .unwrap_or_default();
    !LABEL_EXEMPT_TYPES.contains(&kind.as_str())
}

// label[for=id], aria-label(ledby), or wrapped in a <label>
fn is_labelled(control: &ElementRef<'_>, labelled_ids: &HashSet<&str>) -> bool {
    let el = control.value();
    if el.attr("id").map(|id| labelled_ids.contains(id)).unwrap_or(false) {
        return true;
    }
    if el.attr("aria-label").is_some() || el.attr("aria-labelledby").is_some() {
        return true;
    }
    control.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|parent| parent.name() == "label")
            .unwrap_or(false)
    })
}

// Names used by more than one control, in first-seen order
fn duplicate_names<'a>(controls: &[ElementRef<'a>]) -> Vec<&'a str> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for control in controls {
        let name = match control.value().attr("name") {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };
        match counts.iter_mut().find(|(seen, _)| *seen == name) {
            Some(entry) => entry.1 += 1,
            None => counts.push((name, 1)),
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect()
}
