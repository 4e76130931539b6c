//! Intent Classifier
//!
//! Maps a user message to one of a small closed set of intent labels
//! using substring keyword matching. First match wins; greeting is
//! checked before goodbye, so a message containing both is a greeting.

use serde::{Deserialize, Serialize};

/// Coarse classification of user message purpose
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Greeting,
    Goodbye,
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Goodbye => "goodbye",
            Intent::Default => "default",
        }
    }
}

/// Static keyword lists — zero allocation
const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon"];

const GOODBYE_KEYWORDS: &[&str] = &["bye", "goodbye", "see you", "farewell"];

/// Keyword-based intent classifier
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a message by substring containment over the lowercased text.
    ///
    /// No trimming or tokenization happens first, so "highway" matches
    /// the "hi" keyword. Pure and infallible.
    pub fn classify(message: &str) -> Intent {
        let lower = message.to_lowercase();

        if GREETING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Intent::Greeting
        } else if GOODBYE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Intent::Goodbye
        } else {
            Intent::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_messages() {
        let cases = vec![
            "Hello there!",
            "hi, how are you?",
            "HEY you",
            "good morning everyone",
            "I said good afternoon",
        ];

        for c in cases {
            assert_eq!(IntentClassifier::classify(c), Intent::Greeting, "{}", c);
        }
    }

    #[test]
    fn test_goodbye_messages() {
        let cases = vec![
            "Goodbye for now.",
            "bye!",
            "see you tomorrow",
            "Farewell, friend",
        ];

        for c in cases {
            assert_eq!(IntentClassifier::classify(c), Intent::Goodbye, "{}", c);
        }
    }

    #[test]
    fn test_default_messages() {
        let cases = vec![
            "What is the weather like?",
            "tell me a joke",
            "",
        ];

        for c in cases {
            assert_eq!(IntentClassifier::classify(c), Intent::Default, "{}", c);
        }
    }

    #[test]
    fn test_greeting_wins_over_goodbye() {
        assert_eq!(
            IntentClassifier::classify("hello and goodbye"),
            Intent::Greeting
        );
        assert_eq!(
            IntentClassifier::classify("bye bye, good morning crew"),
            Intent::Greeting
        );
    }

    #[test]
    fn test_substring_containment() {
        // Keywords match anywhere in the text, not at word boundaries.
        assert_eq!(IntentClassifier::classify("this"), Intent::Greeting);
        assert_eq!(IntentClassifier::classify("maybe later"), Intent::Default);
    }
}
