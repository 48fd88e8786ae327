// src/checker/timing.rs
// =============================================================================
// WCAG 2.2.x timing controls.
//
// Red flags, any of which makes the page NEEDS_REVIEW:
// - <meta http-equiv="refresh"> (page reloads or redirects on its own)
// - <video autoplay> / <audio autoplay>
// - <marquee>
// - setTimeout( / setInterval( anywhere in the markup
// =============================================================================

use super::{Checker, Evaluation, Outcome};
use crate::error::{EngineError, EngineResult};
use crate::fetch::DocumentContext;
use crate::report::{CheckResults, Status};
use once_cell::sync::Lazy;
use regex::Regex;

static TIMER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)set(Timeout|Interval)\s*\(").expect("timer pattern is valid")
});

pub(super) const CHECKER: Checker = Checker {
    name: "timing_controls",
    description: "Timeouts, auto-playing or moving content and page refreshes",
    criteria: &["2.2.1", "2.2.2", "2.2.3", "2.2.4", "2.2.5", "2.2.6"],
    evaluation: Evaluation::Computed { evaluate, degrade },
};

#[derive(Debug, Default, Clone, Copy)]
struct TimingSignals {
    meta_refresh: bool,
    autoplay_media: bool,
    marquee: bool,
    js_timers: bool,
}

impl TimingSignals {
    fn detect(ctx: &DocumentContext) -> EngineResult<Self> {
        let meta_refresh = ctx.select("meta")?.iter().any(|meta| {
            meta.value()
                .attr("http-equiv")
                .map(|v| v.trim().eq_ignore_ascii_case("refresh"))
                .unwrap_or(false)
        });

        Ok(TimingSignals {
            meta_refresh,
            autoplay_media: ctx.exists("video[autoplay], audio[autoplay]")?,
            marquee: ctx.exists("marquee")?,
            js_timers: TIMER_CALL.is_match(ctx.markup()),
        })
    }

    fn any(&self) -> bool {
        self.meta_refresh || self.autoplay_media || self.marquee || self.js_timers
    }
}

fn evaluate(ctx: &DocumentContext) -> EngineResult<Outcome> {
    let signals = TimingSignals::detect(ctx)?;
    let mut results = CheckResults::new();

    results.insert(
        "timing_adjustable",
        if signals.js_timers {
            "⚠️ Potential JavaScript timeouts present (setTimeout/setInterval detected)"
        } else {
            "✅ No automatic timeouts detected"
        },
    );
    results.insert(
        "pause_stop_hide",
        if signals.autoplay_media {
            "⚠️ Auto-playing media detected (video/audio with autoplay)"
        } else {
            "✅ No auto-playing media found"
        },
    );
    results.insert(
        "no_timing",
        if signals.js_timers || signals.meta_refresh {
            "⚠️ Possible timing-dependent interactions (meta refresh or JS timers)"
        } else {
            "✅ No timing-dependent interactions detected"
        },
    );
    results.insert(
        "interruptions",
        if signals.meta_refresh {
            "⚠️ Meta refresh tag may interrupt user flow"
        } else {
            "✅ No automatic interruptions detected"
        },
    );
    results.insert(
        "re_authenticating",
        "⚠️ Session timeout behaviour not determinable via static scan – needs manual verification",
    );
    results.insert(
        "timeouts",
        if signals.meta_refresh {
            "⚠️ Implement timeout warnings / extend option"
        } else {
            "✅ No timeout warnings needed"
        },
    );

    let mut recommendations = Vec::new();
    if signals.meta_refresh {
        recommendations.push(
            "Remove or extend any meta refresh to at least 20 hours OR provide a user-extendable control."
                .to_string(),
        );
    }
    if signals.js_timers {
        recommendations.push(
            "Ensure JavaScript timeouts are adjustable, can be turned off, or extended by the user."
                .to_string(),
        );
    }
    if signals.autoplay_media || signals.marquee {
        recommendations.push(
            "Provide user controls to pause, stop or hide any auto-moving / autoplaying content that lasts more than 5 seconds."
                .to_string(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push(
            "No major timing-related issues detected – continue to monitor dynamic components."
                .to_string(),
        );
    }

    let status = if signals.any() {
        Status::NeedsReview
    } else {
        Status::Tested
    };

    Ok(Outcome {
        results,
        recommendations,
        status,
    })
}

fn degrade(err: &EngineError) -> Outcome {
    let results = vec![
        ("timing_adjustable", format!("⚠️ Unable to fetch page to test ({})", err)),
        ("pause_stop_hide", "⚠️ Unknown – page fetch failed".to_string()),
        ("no_timing", "⚠️ Unknown – page fetch failed".to_string()),
        ("interruptions", "⚠️ Unknown – page fetch failed".to_string()),
        ("re_authenticating", "⚠️ Manual verification required".to_string()),
        ("timeouts", "⚠️ Manual verification required".to_string()),
    ];

    Outcome {
        results: results.into_iter().collect(),
        recommendations: vec![
            "Ensure the execution environment has internet access and can reach the target site.".to_string(),
            "Perform a manual review of timing controls on the target site.".to_string(),
        ],
        status: Status::Error,
    }
}
