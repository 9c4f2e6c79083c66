//! Heuristic scoring of a section's generated text.

/// Positive-sentiment markers that nudge a section score upward.
const SENTIMENT_KEYWORDS: [&str; 4] = ["excellent", "strong", "impressive", "good"];

const BASE_SCORE: u32 = 50;
const KEYWORD_BONUS: u32 = 5;

/// Scores a section's text on a 0-100 scale.
///
/// Starts from a neutral base and adds a fixed bonus for each sentiment
/// keyword present in the text (case-insensitive substring match, counted at
/// most once per keyword). Pure and deterministic.
pub fn score_section(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let bonus = SENTIMENT_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count() as u32
        * KEYWORD_BONUS;
    (BASE_SCORE + bonus).min(100)
}
