//! Chatbot Framework
//!
//! A minimal conversational web service:
//! - Classifies messages into intents by keyword matching
//! - Picks a canned response at random for the intent
//! - Scores message sentiment with a keyword lexicon
//! - Persists every exchange to SQLite
//! - Serves HTTP endpoints and a WebSocket channel, plus
//!   conversation history and aggregate analytics

pub mod api;
pub mod error;
pub mod intent;
pub mod responses;
pub mod sentiment;
pub mod service;
pub mod store;

pub use error::{ChatbotError, Result};

// Re-export common types
pub use intent::{Intent, IntentClassifier};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use service::{ConversationService, ExchangeResult};
pub use store::{ConversationRecord, ConversationStats, ConversationStore};
