//! Data models for the trend intelligence service.
//!
//! This module contains the request and response payloads of the HTTP API,
//! the typed records produced by the LLM generation steps, and the rows
//! read back from the store.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact level attached to trends and insights.
///
/// The LLM is asked for one of the three known levels. Anything that is not
/// exactly one of them, including other casings, is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Other(String),
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::Low => write!(f, "Low"),
            ImpactLevel::Medium => write!(f, "Medium"),
            ImpactLevel::High => write!(f, "High"),
            ImpactLevel::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ImpactLevel {
    fn from(s: &str) -> Self {
        match s {
            "Low" => ImpactLevel::Low,
            "Medium" => ImpactLevel::Medium,
            "High" => ImpactLevel::High,
            _ => ImpactLevel::Other(s.to_string()),
        }
    }
}

impl From<String> for ImpactLevel {
    fn from(s: String) -> Self {
        ImpactLevel::from(s.as_str())
    }
}

impl From<ImpactLevel> for String {
    fn from(level: ImpactLevel) -> Self {
        level.to_string()
    }
}

/// Body of `POST /api/analyze-trends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub session_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

impl AnalyzeRequest {
    /// The generation parameters carried by this request.
    pub fn trend_query(&self) -> TrendQuery {
        TrendQuery {
            platforms: self.platforms.clone(),
            categories: self.categories.clone(),
            regions: self.regions.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Parameters embedded into the trend generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendQuery {
    pub platforms: Vec<String>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Sentiment split of a trend, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

/// One trend record as returned by the generation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTrend {
    pub trend_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_description: Option<String>,
    pub platform: String,
    pub category: String,
    pub region: String,
    /// Occurrences per hour.
    pub velocity: u32,
    pub virality_score: i64,
    pub sentiment: Sentiment,
    pub emerging_topic: bool,
    pub impact_level: ImpactLevel,
    pub confidence_score: i64,
    pub ai_insights: String,
}

/// One strategic insight derived from a batch of trends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicInsight {
    pub trend: String,
    pub insight: String,
    pub impact: ImpactLevel,
    pub confidence: f64,
}

/// Successful body of `POST /api/analyze-trends`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub success: bool,
    pub session_id: i64,
    pub trends: Vec<GeneratedTrend>,
    pub insights: Vec<StrategicInsight>,
}

/// A persisted analysis session.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AnalysisSession {
    pub id: i64,
    pub session_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub platforms: sqlx::types::Json<Vec<String>>,
    pub categories: sqlx::types::Json<Vec<String>>,
    pub regions: sqlx::types::Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// A persisted trend row, serialized with its column names.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredTrend {
    pub id: i64,
    pub session_id: i64,
    pub trend_name: String,
    pub trend_description: Option<String>,
    pub platform: String,
    pub category: String,
    pub region: String,
    pub velocity_count_per_hour: i64,
    pub virality_score: i64,
    pub sentiment_positive: i64,
    pub sentiment_negative: i64,
    pub sentiment_neutral: i64,
    pub is_emerging_topic: bool,
    pub impact_level: String,
    pub confidence_score: i64,
    pub ai_insights: String,
    pub created_at: DateTime<Utc>,
}

/// Rounded sentiment means across a session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentRatio {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_velocity: i64,
    pub avg_virality: f64,
    pub sentiment_ratio: SentimentRatio,
    pub emerging_topics: usize,
}

/// A row of the top trending table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTrend {
    pub name: String,
    pub velocity: i64,
    pub virality: i64,
    /// Placeholder metric: virality minus 50.
    pub growth: i64,
}

/// Successful body of `GET /api/dashboard-data/:sessionId`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub metrics: DashboardMetrics,
    /// Count per platform, in first-seen order.
    pub platform_distribution: IndexMap<String, usize>,
    /// Count per category, in first-seen order.
    pub category_distribution: IndexMap<String, usize>,
    pub top_trending: Vec<TopTrend>,
    pub all_trends: Vec<StoredTrend>,
}
