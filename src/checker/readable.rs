// src/checker/readable.rs
// =============================================================================
// WCAG 3.1.x readable content.
//
// - 3.1.1 / 3.1.2: <html lang> present, cross-checked against the language
//   detected in the text sample; secondary lang attributes
// - 3.1.3: share of difficult (3+ syllable) words, flagged at 5%
// - 3.1.4: distinct ALL-CAPS abbreviations, flagged above 10
// - 3.1.5: Flesch reading ease, flagged below 60
// - 3.1.6: <ruby> or SSML <phoneme> pronunciation cues
// =============================================================================

use super::text_stats::TextStats;
use super::{Checker, Evaluation, Outcome};
use crate::error::{EngineError, EngineResult};
use crate::fetch::DocumentContext;
use crate::report::{CheckResults, Status};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use whatlang::Lang;

const DIFFICULT_WORD_PERCENT_LIMIT: f64 = 5.0;
const ABBREVIATION_LIMIT: usize = 10;
const READING_EASE_FLOOR: f64 = 60.0;

static ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,6}s?\b").expect("abbreviation pattern is valid"));

const RECOMMENDATIONS: &[&str] = &[
    "Ensure <html lang> is set and matches detected language.",
    "Add lang attributes for passages in other languages.",
    "Explain jargon/idioms & provide glossary for abbreviations.",
    "Target Flesch score ≥ 60 (about grade 8).",
    "Provide pronunciation guides (e.g., ruby, phoneme).",
];

const KEYS: [&str; 6] = [
    "language_of_page",
    "language_of_parts",
    "unusual_words",
    "abbreviations",
    "reading_level",
    "pronunciation",
];

pub(super) const CHECKER: Checker = Checker {
    name: "readability",
    description: "Page language, unusual words, abbreviations, reading level and pronunciation",
    criteria: &["3.1.1", "3.1.2", "3.1.3", "3.1.4", "3.1.5", "3.1.6"],
    evaluation: Evaluation::Computed { evaluate, degrade },
};

fn evaluate(ctx: &DocumentContext) -> EngineResult<Outcome> {
    let sample = ctx.text_sample();

    let page_lang = ctx
        .select("html")?
        .first()
        .and_then(|html| html.value().attr("lang"))
        .map(|lang| lang.trim().to_lowercase())
        .unwrap_or_default();

    let stats = TextStats::analyze(sample);

    let mut results = CheckResults::new();
    results.insert("language_of_page", language_of_page(&page_lang, sample));
    results.insert("language_of_parts", language_of_parts(ctx, &page_lang)?);
    results.insert("unusual_words", unusual_words(&stats));
    results.insert("abbreviations", abbreviations(sample));
    results.insert("reading_level", reading_level(&stats));
    results.insert("pronunciation", pronunciation(ctx)?);

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

fn language_of_page(page_lang: &str, sample: &str) -> String {
    if page_lang.is_empty() {
        return "❌ Missing html lang attribute".to_string();
    }

    let mut verdict = format!("✅ html lang attribute set to '{}'", page_lang);

    // Detection failing (empty or too-short text) only annotates this sub-check
    match detect_language(sample) {
        Some(detected) if detected != primary_subtag(page_lang) => {
            verdict.push_str(&format!(" (Warning: detected '{}')", detected));
        }
        Some(_) => {}
        None => verdict.push_str(" (Warning: detected 'unknown')"),
    }

    verdict
}

fn language_of_parts(ctx: &DocumentContext, page_lang: &str) -> EngineResult<String> {
    let parts = ctx
        .select("[lang]")?
        .iter()
        .filter(|el| {
            el.value()
                .attr("lang")
                .map(|lang| lang.trim().to_lowercase() != page_lang)
                .unwrap_or(false)
        })
        .count();

    Ok(if parts > 0 {
        format!("✅ {} elements have correct secondary lang attributes", parts)
    } else {
        "⚠️ No secondary lang attributes detected (verify if needed)".to_string()
    })
}

fn unusual_words(stats: &TextStats) -> String {
    let percent = stats.difficult_word_percent();
    if percent < DIFFICULT_WORD_PERCENT_LIMIT {
        format!("✅ Difficult-word ratio {:.1}% (acceptable)", percent)
    } else {
        format!("⚠️ Difficult-word ratio high ({:.1}%)", percent)
    }
}

fn abbreviations(sample: &str) -> String {
    let unique: BTreeSet<&str> = ABBREVIATION.find_iter(sample).map(|m| m.as_str()).collect();
    if unique.len() <= ABBREVIATION_LIMIT {
        format!("✅ Few abbreviations detected ({})", unique.len())
    } else {
        format!("⚠️ Many abbreviations detected ({})", unique.len())
    }
}

fn reading_level(stats: &TextStats) -> String {
    let ease = stats.flesch_reading_ease();
    let grade = stats.flesch_kincaid_grade().max(0.0);
    if ease >= READING_EASE_FLOOR {
        format!("✅ Readability ≈ grade {:.0} (Flesch {:.0})", grade, ease)
    } else {
        format!("⚠️ Readability difficult – grade {:.0} (Flesch {:.0})", grade, ease)
    }
}

fn pronunciation(ctx: &DocumentContext) -> EngineResult<String> {
    let has_ruby = ctx.exists("ruby")?;
    let has_ssml = ctx.markup().contains("<phoneme");
    Ok(if has_ruby || has_ssml {
        "✅ Pronunciation cues present (ruby/phoneme)".to_string()
    } else {
        "⚠️ No pronunciation aids detected".to_string()
    })
}

// "en-US" -> "en"
fn primary_subtag(lang: &str) -> &str {
    lang.split(|c| c == '-' || c == '_').next().unwrap_or(lang)
}

fn detect_language(sample: &str) -> Option<&'static str> {
    if sample.trim().is_empty() {
        return None;
    }
    whatlang::detect(sample).map(|info| iso_639_1(info.lang()))
}

// whatlang speaks ISO 639-3; html lang attributes use 639-1 where one exists
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Ell => "el",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "nb",
        Lang::Fin => "fi",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::test_support::FixtureSource;

    async fn run(html: &str) -> Report {
        CHECKER.run("example.com", &FixtureSource::new(html)).await
    }

    fn page(lang: &str, body: &str) -> String {
        format!("<html lang=\"{}\"><body><p>{}</p></body></html>", lang, body)
    }

    #[tokio::test]
    async fn test_unusual_words_flagged_without_reading_level() {
        // 22 words, 5 distinct three-syllable words, short sentences
        let body = "The dog ate a banana. The cat saw an elephant. We ate a tomato. \
                    I like my potato. It is an animal.";
        let report = run(&page("en", body)).await;
        assert_eq!(report.status, Status::Tested);
        assert!(report.results.get("unusual_words").unwrap().starts_with("⚠️"));
        assert!(report.results.get("reading_level").unwrap().starts_with("✅"));
    }

    #[tokio::test]
    async fn test_reading_level_flagged_without_unusual_words() {
        // One 40-word sentence of two-syllable words
        let body = format!("{}.", "happy water paper garden window ".repeat(8).trim());
        let report = run(&page("en", &body)).await;
        assert!(report.results.get("unusual_words").unwrap().starts_with("✅"));
        assert!(report.results.get("reading_level").unwrap().starts_with("⚠️"));
    }

    #[tokio::test]
    async fn test_both_flags_can_fire_together() {
        let body = format!("{}.", "banana elephant tomato potato animal ".repeat(4).trim());
        let report = run(&page("en", &body)).await;
        assert!(report.results.get("unusual_words").unwrap().starts_with("⚠️"));
        assert!(report.results.get("reading_level").unwrap().starts_with("⚠️"));
    }

    #[tokio::test]
    async fn test_missing_lang() {
        let report = run("<html><body><p>Hello there.</p></body></html>").await;
        assert_eq!(
            report.results.get("language_of_page"),
            Some("❌ Missing html lang attribute")
        );
    }

    #[tokio::test]
    async fn test_lang_without_text_degrades_only_language_of_page() {
        let report = run("<html lang=\"en\"><body></body></html>").await;
        assert_eq!(report.status, Status::Tested);
        assert_eq!(
            report.results.get("language_of_page"),
            Some("✅ html lang attribute set to 'en' (Warning: detected 'unknown')")
        );
    }

    #[tokio::test]
    async fn test_secondary_lang_parts() {
        let html = r#"<html lang="en"><body>
            <p>Welcome.</p><p lang="fr">Bienvenue.</p><blockquote lang="de">Willkommen.</blockquote>
        </body></html>"#;
        let report = run(html).await;
        assert_eq!(
            report.results.get("language_of_parts"),
            Some("✅ 2 elements have correct secondary lang attributes")
        );
    }

    #[tokio::test]
    async fn test_many_abbreviations() {
        let body = "NASA ESA UN WHO FBI CIA NSA IBM BBC CNN HTML CSS met today.";
        let report = run(&page("en", body)).await;
        assert_eq!(
            report.results.get("abbreviations"),
            Some("⚠️ Many abbreviations detected (12)")
        );
    }

    #[tokio::test]
    async fn test_pronunciation_cues() {
        let with_ruby = run("<html lang=\"ja\"><body><ruby>漢<rt>kan</rt></ruby></body></html>").await;
        assert!(with_ruby.results.get("pronunciation").unwrap().starts_with("✅"));

        let without = run(&page("en", "Plain text.")).await;
        assert_eq!(
            without.results.get("pronunciation"),
            Some("⚠️ No pronunciation aids detected")
        );
    }

    #[test]
    fn test_abbreviation_limit_is_inclusive() {
        let ten = "NASA ESA UN WHO FBI CIA NSA IBM BBC CNN met today.";
        assert_eq!(abbreviations(ten), "✅ Few abbreviations detected (10)");

        let eleven = "NASA ESA UN WHO FBI CIA NSA IBM BBC CNN HTML met today.";
        assert_eq!(abbreviations(eleven), "⚠️ Many abbreviations detected (11)");
    }

    #[test]
    fn test_difficult_word_ratio_at_limit_is_flagged() {
        // 1 difficult word in 20
        let stats = TextStats::analyze(
            "I ate a banana. The cat sat on the mat. The dog ran to me. We had fun in sun.",
        );
        assert_eq!(stats.words, 20);
        assert_eq!(stats.difficult_words, 1);
        assert_eq!(unusual_words(&stats), "⚠️ Difficult-word ratio high (5.0%)");

        let below = TextStats {
            words: 21,
            ..stats
        };
        assert_eq!(unusual_words(&below), "✅ Difficult-word ratio 4.8% (acceptable)");
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(primary_subtag("en-us"), "en");
        assert_eq!(primary_subtag("fr"), "fr");
    }

    #[test]
    fn test_detect_language_on_empty_text() {
        assert_eq!(detect_language("   "), None);
    }
}
