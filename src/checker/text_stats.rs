// src/checker/text_stats.rs
// =============================================================================
// English text statistics for the readability checker.
//
// All counts are heuristics: sentences are terminal punctuation marks,
// syllables are vowel groups with a silent-e correction. Good enough to rank
// pages, not to grade prose.
// =============================================================================

use std::collections::HashSet;

// Words with at least this many syllables count as difficult
const DIFFICULT_SYLLABLES: usize = 3;

/// Counts derived from a text sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    /// Distinct words of three or more syllables
    pub difficult_words: usize,
}

impl TextStats {
    pub fn analyze(text: &str) -> Self {
        let mut syllables = 0;
        let mut words = 0;
        let mut difficult: HashSet<String> = HashSet::new();

        for token in text.split_whitespace() {
            words += 1;
            let word = normalize_word(token);
            let count = count_word_syllables(&word);
            syllables += count;
            if count >= DIFFICULT_SYLLABLES {
                difficult.insert(word);
            }
        }

        let sentences = text
            .chars()
            .filter(|c| *c == '.' || *c == '!' || *c == '?')
            .count();

        TextStats {
            words,
            sentences,
            syllables,
            difficult_words: difficult.len(),
        }
    }

    /// Difficult words as a percentage of all words
    pub fn difficult_word_percent(&self) -> f64 {
        self.difficult_words as f64 / self.words.max(1) as f64 * 100.0
    }

    /// Flesch reading ease: higher is easier, 60+ is plain English
    ///
    /// Formula: 206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)
    pub fn flesch_reading_ease(&self) -> f64 {
        206.835 - 1.015 * self.words_per_sentence() - 84.6 * self.syllables_per_word()
    }

    /// Flesch-Kincaid grade level
    ///
    /// Formula: 0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59
    pub fn flesch_kincaid_grade(&self) -> f64 {
        0.39 * self.words_per_sentence() + 11.8 * self.syllables_per_word() - 15.59
    }

    fn words_per_sentence(&self) -> f64 {
        self.words.max(1) as f64 / self.sentences.max(1) as f64
    }

    fn syllables_per_word(&self) -> f64 {
        self.syllables.max(1) as f64 / self.words.max(1) as f64
    }
}

// Lowercase alphabetic characters only
fn normalize_word(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Syllables in an already-normalized word (English heuristic)
pub(crate) fn count_word_syllables(word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }

    if word.chars().count() <= 3 {
        return 1;
    }

    let vowels = ['a', 'e', 'i', 'o', 'u', 'y'];
    let mut count = 0;
    let mut prev_vowel = false;

    for ch in word.chars() {
        let is_vowel = vowels.contains(&ch);
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }

    // Silent e, except the "-le" ending ("table", "simple")
    if word.ends_with('e') && !word.ends_with("le") && count > 1 {
        count -= 1;
    }

    count.max(1)
}
