//! Conversation Store
//!
//! Append-only persistence for chat exchanges plus the read queries the
//! API exposes: per-user history and aggregate analytics. Backed by a
//! single shared SQLite pool; every operation is one atomic statement.

use crate::error::{ChatbotError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// A fully persisted exchange. Immutable once stored — the store exposes
/// no update or delete operations.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub sentiment: f64,
    pub timestamp: DateTime<Utc>,
}

/// Caller-supplied fields of an exchange; `id` and `timestamp` are
/// assigned by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub user_id: String,
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub sentiment: f64,
}

/// Aggregate analytics over the whole table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConversationStats {
    pub total_count: i64,
    /// Mean sentiment rounded to 3 decimal places; 0.0 on an empty store.
    pub average_sentiment: f64,
    /// Records whose UTC calendar date is today.
    pub count_today: i64,
}

/// Shared handle over the conversations table
#[derive(Clone)]
pub struct ConversationStore {
    pool: SqlitePool,
}

impl ConversationStore {
    /// Open (or create) the database file and initialize the schema.
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Conversation store ready: {}", path.as_ref().display());
        Ok(store)
    }

    /// In-memory store for tests.
    ///
    /// A single never-recycled connection, otherwise the pool would hand
    /// out a fresh empty database per connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the conversations table and indexes if absent.
    /// Idempotent; safe to call on every process start.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id TEXT NOT NULL,
              session_id TEXT NOT NULL,
              message TEXT NOT NULL,
              response TEXT NOT NULL,
              sentiment REAL NOT NULL,
              timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_conversations_user_time
            ON conversations (user_id, timestamp);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist one exchange, assigning its `id` and `timestamp`.
    ///
    /// Timestamps are UTC, stored as RFC 3339 text with millisecond
    /// precision so SQLite's date functions can read them directly.
    pub async fn append(&self, exchange: NewExchange) -> Result<ConversationRecord> {
        let timestamp = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO conversations (user_id, session_id, message, response, sentiment, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&exchange.user_id)
        .bind(&exchange.session_id)
        .bind(&exchange.message)
        .bind(&exchange.response)
        .bind(exchange.sentiment)
        .bind(encode_timestamp(timestamp))
        .execute(&self.pool)
        .await?;

        Ok(ConversationRecord {
            id: result.last_insert_rowid(),
            user_id: exchange.user_id,
            session_id: exchange.session_id,
            message: exchange.message,
            response: exchange.response,
            sentiment: exchange.sentiment,
            timestamp,
        })
    }

    /// The most recent `limit` records for a user, newest first.
    /// An unknown user simply gets an empty list.
    pub async fn list_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<ConversationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, session_id, message, response, sentiment, timestamp
            FROM conversations
            WHERE user_id = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let raw: String = row.try_get("timestamp")?;
                Ok(ConversationRecord {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    session_id: row.try_get("session_id")?,
                    message: row.try_get("message")?,
                    response: row.try_get("response")?,
                    sentiment: row.try_get("sentiment")?,
                    timestamp: decode_timestamp(&raw)?,
                })
            })
            .collect()
    }

    /// Aggregate analytics over all records.
    ///
    /// "Today" is the current UTC date; SQLite's `date('now')` is UTC and
    /// the stored timestamps are UTC, so the comparison is consistent.
    pub async fn aggregate_stats(&self) -> Result<ConversationStats> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await?;

        let average: Option<f64> = sqlx::query_scalar("SELECT AVG(sentiment) FROM conversations")
            .fetch_one(&self.pool)
            .await?;

        let count_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM conversations WHERE date(timestamp) = date('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        let average_sentiment = (average.unwrap_or(0.0) * 1000.0).round() / 1000.0;

        Ok(ConversationStats {
            total_count,
            average_sentiment,
            count_today,
        })
    }
}

fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChatbotError::CorruptRecord(format!("bad timestamp {:?}: {}", raw, e)))
}
