//! Relational store for analysis sessions and generated trends.
//!
//! Backed by a sqlx SQLite pool. The pool is opened once at startup, cloned
//! into every request handler, and closed on shutdown.

use crate::error::StoreError;
use crate::models::{AnalysisSession, AnalyzeRequest, GeneratedTrend, StoredTrend};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::{debug, info};

const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS analysis_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_name TEXT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    platforms TEXT NOT NULL,
    categories TEXT NOT NULL,
    regions TEXT NOT NULL,
    created_at DATETIME NOT NULL
)
"#;

const CREATE_TRENDS: &str = r#"
CREATE TABLE IF NOT EXISTS ai_generated_trends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL,
    trend_name TEXT NOT NULL,
    trend_description TEXT,
    platform TEXT NOT NULL,
    category TEXT NOT NULL,
    region TEXT NOT NULL,
    velocity_count_per_hour INTEGER NOT NULL,
    virality_score INTEGER NOT NULL,
    sentiment_positive INTEGER NOT NULL,
    sentiment_negative INTEGER NOT NULL,
    sentiment_neutral INTEGER NOT NULL,
    is_emerging_topic BOOLEAN NOT NULL,
    impact_level TEXT NOT NULL,
    confidence_score INTEGER NOT NULL,
    ai_insights TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    FOREIGN KEY(session_id) REFERENCES analysis_sessions(id)
)
"#;

const CREATE_TRENDS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_trends_session_velocity
    ON ai_generated_trends (session_id, velocity_count_per_hour DESC)
"#;

/// Handle to the session and trend tables.
#[derive(Debug, Clone)]
pub struct TrendStore {
    pool: SqlitePool,
}

impl TrendStore {
    /// Open the database at `url` and create the tables if they are missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!("Initializing database at: {}", url);

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.bootstrap().await?;

        Ok(store)
    }

    async fn bootstrap(&self) -> Result<(), StoreError> {
        for statement in [CREATE_SESSIONS, CREATE_TRENDS, CREATE_TRENDS_INDEX] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Insert a new session row and return it with its assigned id.
    pub async fn create_session(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<AnalysisSession, StoreError> {
        let session = sqlx::query_as::<_, AnalysisSession>(
            r#"
            INSERT INTO analysis_sessions
                (session_name, start_date, end_date, platforms, categories, regions, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, session_name, start_date, end_date, platforms, categories, regions, created_at
            "#,
        )
        .bind(&request.session_name)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(Json(&request.platforms))
        .bind(Json(&request.categories))
        .bind(Json(&request.regions))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!("Created session {} ({})", session.session_name, session.id);
        Ok(session)
    }

    /// Insert `trends` for `session_id`, one row each, in order.
    ///
    /// All rows go through one transaction: either every row is committed or
    /// none is.
    pub async fn insert_trends(
        &self,
        session_id: i64,
        trends: &[GeneratedTrend],
    ) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let created_at = Utc::now();

        for trend in trends {
            sqlx::query(
                r#"
                INSERT INTO ai_generated_trends
                    (session_id, trend_name, trend_description, platform, category, region,
                     velocity_count_per_hour, virality_score, sentiment_positive, sentiment_negative,
                     sentiment_neutral, is_emerging_topic, impact_level, confidence_score, ai_insights,
                     created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(session_id)
            .bind(&trend.trend_name)
            .bind(&trend.trend_description)
            .bind(&trend.platform)
            .bind(&trend.category)
            .bind(&trend.region)
            .bind(i64::from(trend.velocity))
            .bind(trend.virality_score)
            .bind(i64::from(trend.sentiment.positive))
            .bind(i64::from(trend.sentiment.negative))
            .bind(i64::from(trend.sentiment.neutral))
            .bind(trend.emerging_topic)
            .bind(trend.impact_level.to_string())
            .bind(trend.confidence_score)
            .bind(&trend.ai_insights)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!("Stored {} trends for session {}", trends.len(), session_id);
        Ok(trends.len())
    }

    /// Load every trend of a session, highest velocity first.
    pub async fn load_trends(&self, session_id: i64) -> Result<Vec<StoredTrend>, StoreError> {
        let trends = sqlx::query_as::<_, StoredTrend>(
            r#"
            SELECT id, session_id, trend_name, trend_description, platform, category, region,
                   velocity_count_per_hour, virality_score, sentiment_positive, sentiment_negative,
                   sentiment_neutral, is_emerging_topic, impact_level, confidence_score, ai_insights,
                   created_at
            FROM ai_generated_trends
            WHERE session_id = ?
            ORDER BY velocity_count_per_hour DESC, id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trends)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }

    #[cfg(test)]
    pub(crate) async fn session_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM analysis_sessions")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    #[cfg(test)]
    pub(crate) async fn trend_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM ai_generated_trends")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Make every trend insert named `trend_name` abort.
    #[cfg(test)]
    pub(crate) async fn reject_trends_named(&self, trend_name: &str) {
        let trigger = format!(
            "CREATE TRIGGER reject_trend BEFORE INSERT ON ai_generated_trends \
             WHEN NEW.trend_name = '{}' \
             BEGIN SELECT RAISE(ABORT, 'rejected trend'); END",
            trend_name
        );
        sqlx::query(&trigger).execute(&self.pool).await.unwrap();
    }
}

/// Parse a session id taken from a URL path.
pub fn parse_session_id(raw: &str) -> Result<i64, StoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StoreError::InvalidSessionId(raw.to_string()))
}

/// An in-memory store for tests. A single connection keeps one database.
#[cfg(test)]
pub(crate) async fn memory_store() -> TrendStore {
    TrendStore::connect("sqlite::memory:", 1).await.unwrap()
}
