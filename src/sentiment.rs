//! Sentiment Scoring
//!
//! Keyword-lexicon polarity scorer. Scores a message in [-1, 1] by
//! counting positive and negative keyword hits over the lowercased
//! text. Fast, no model call, and trivially swappable behind the
//! `SentimentScorer` trait.

/// Scores raw text with a polarity value in [-1, 1].
///
/// Negative values lean negative, positive values lean positive,
/// 0.0 is neutral (or no signal).
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Static keyword lists — zero allocation
const POSITIVE_KEYWORDS: &[&str] = &[
    "good", "great", "love", "happy", "thanks", "thank you", "awesome", "wonderful",
    "excellent", "amazing", "nice", "perfect", "fantastic", "glad", "pleased",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "hate", "awful", "sad", "angry", "horrible", "worst",
    "annoying", "broken", "frustrated", "disappointed", "useless", "wrong",
];

/// Lexicon-based polarity scorer
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();

        let positive = POSITIVE_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count() as f64;
        let negative = NEGATIVE_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count() as f64;

        if positive + negative == 0.0 {
            0.0
        } else {
            (positive - negative) / (positive + negative)
        }
    }
}
