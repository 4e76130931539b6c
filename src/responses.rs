//! Response Selector
//!
//! Holds the canned response lists for each intent and picks one
//! uniformly at random. The random source is supplied by the caller
//! so tests can pin a seed and assert exact output.

use crate::error::{ChatbotError, Result};
use crate::intent::Intent;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Canned response tables, keyed by intent
pub struct ResponseSelector {
    responses: HashMap<Intent, Vec<String>>,
}

impl ResponseSelector {
    /// Build the selector with the stock response lists.
    pub fn new() -> Self {
        let mut responses = HashMap::new();

        responses.insert(
            Intent::Greeting,
            vec![
                "Hello! How can I help you today?".to_string(),
                "Hi there! What can I do for you?".to_string(),
                "Greetings! How may I assist you?".to_string(),
            ],
        );
        responses.insert(
            Intent::Goodbye,
            vec![
                "Goodbye! Have a great day!".to_string(),
                "See you later!".to_string(),
                "Take care!".to_string(),
            ],
        );
        responses.insert(
            Intent::Default,
            vec![
                "I understand. Can you tell me more?".to_string(),
                "That's interesting. What else would you like to know?".to_string(),
                "I'm here to help. Could you be more specific?".to_string(),
            ],
        );

        Self { responses }
    }

    /// Build a selector with a custom response table.
    pub fn with_responses(responses: HashMap<Intent, Vec<String>>) -> Self {
        Self { responses }
    }

    /// Pick one response for the intent, uniformly at random.
    ///
    /// Every intent the classifier can produce has a configured list, so
    /// `UnknownIntent` signals a programming defect rather than bad input.
    pub fn select<R: Rng + ?Sized>(&self, intent: Intent, rng: &mut R) -> Result<String> {
        self.responses
            .get(&intent)
            .and_then(|pool| pool.choose(rng))
            .cloned()
            .ok_or_else(|| ChatbotError::UnknownIntent(intent.as_str().to_string()))
    }

    /// All configured responses for an intent, if any.
    pub fn responses_for(&self, intent: Intent) -> Option<&[String]> {
        self.responses.get(&intent).map(Vec::as_slice)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}
