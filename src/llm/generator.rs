//! Trend and insight generation.
//!
//! Both operations build a prompt, send one chat completion, and validate the
//! completion text into typed records. The text must be a bare JSON array;
//! nothing is stripped or repaired.

use crate::error::GenerationError;
use crate::llm::client::{ChatClient, ChatMessage, ChatRequest};
use crate::models::{GeneratedTrend, StrategicInsight, TrendQuery};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Sampling settings for the two generation calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub trend_temperature: f64,
    pub trend_max_tokens: u32,
    pub insight_temperature: f64,
    pub insight_max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            trend_temperature: 0.8,
            trend_max_tokens: 3000,
            insight_temperature: 0.7,
            insight_max_tokens: 2000,
        }
    }
}

/// Ask the model for 15-20 synthetic trends matching `query`.
pub async fn generate_trends(
    client: &dyn ChatClient,
    settings: &GenerationSettings,
    query: &TrendQuery,
) -> Result<Vec<GeneratedTrend>, GenerationError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(TREND_SYSTEM_PROMPT),
            ChatMessage::user(trend_prompt(query)),
        ],
        temperature: settings.trend_temperature,
        max_tokens: settings.trend_max_tokens,
    };

    info!("Requesting trend generation");
    let text = client.complete(request).await?;
    let trends: Vec<GeneratedTrend> = parse_json_array(&text)?;
    info!("Parsed {} trends from completion", trends.len());

    Ok(trends)
}

/// Ask the model for 5-7 strategic insights about `trends`.
pub async fn generate_insights(
    client: &dyn ChatClient,
    settings: &GenerationSettings,
    trends: &[GeneratedTrend],
) -> Result<Vec<StrategicInsight>, GenerationError> {
    let trends_json = serde_json::to_string_pretty(trends)
        .map_err(|e| GenerationError::Request(format!("failed to encode trends: {}", e)))?;

    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(INSIGHT_SYSTEM_PROMPT),
            ChatMessage::user(insight_prompt(&trends_json)),
        ],
        temperature: settings.insight_temperature,
        max_tokens: settings.insight_max_tokens,
    };

    info!("Requesting insights for {} trends", trends.len());
    let text = client.complete(request).await?;
    let insights: Vec<StrategicInsight> = parse_json_array(&text)?;
    info!("Parsed {} insights from completion", insights.len());

    Ok(insights)
}

/// Parse completion text as a JSON array of `T`.
pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, GenerationError> {
    let value: Value = serde_json::from_str(text).map_err(GenerationError::InvalidJson)?;

    let Value::Array(items) = value else {
        return Err(GenerationError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| {
                debug!("Element {} failed validation: {}", index, source);
                GenerationError::Validation { index, source }
            })
        })
        .collect()
}

fn trend_prompt(query: &TrendQuery) -> String {
    format!(
        r#"Generate realistic social media trend data for a trend intelligence dashboard.

Analysis Parameters:
- Platforms: {platforms}
- Categories: {categories}
- Regions: {regions}
- Date Range: {start} to {end}

Generate 15-20 realistic social media trends. Each trend is a JSON object with exactly these keys:

- "trendName": creative, realistic trend name (string)
- "trendDescription": one sentence describing the trend (string)
- "platform": one of the specified platforms (string)
- "category": one of the specified categories (string)
- "region": one of the specified regions (string)
- "velocity": occurrences per hour, integer between 1000 and 50000
- "viralityScore": integer between 1 and 100
- "sentiment": {{"positive": 50-80, "negative": 10-30, "neutral": 10-30}}, integers totalling 100
- "emergingTopic": true or false
- "impactLevel": "Low", "Medium" or "High"
- "confidenceScore": integer between 70 and 95
- "aiInsights": 2-3 sentence insight about this trend (string)

Respond with the JSON array only, no markdown and no commentary."#,
        platforms = query.platforms.join(", "),
        categories = query.categories.join(", "),
        regions = query.regions.join(", "),
        start = query.start_date,
        end = query.end_date,
    )
}

fn insight_prompt(trends_json: &str) -> String {
    format!(
        r#"Based on the following social media trends data, generate 5-7 strategic insights for a business intelligence dashboard:

{trends_json}

Each insight is a JSON object with exactly these keys:

- "trend": the main trend this insight relates to (string)
- "insight": strategic business insight, 2-3 sentences (string)
- "impact": "Low", "Medium" or "High"
- "confidence": number between 75 and 95

Respond with the JSON array only, no markdown and no commentary."#
    )
}

const TREND_SYSTEM_PROMPT: &str = "You are a social media trend analyst. \
Generate realistic, diverse social media trend data in JSON format.";

const INSIGHT_SYSTEM_PROMPT: &str = "You are a strategic business intelligence analyst. \
Provide actionable insights based on social media trends.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{ScriptedClient, ONE_INSIGHT, ONE_TREND};
    use crate::models::ImpactLevel;
    use chrono::NaiveDate;

    fn query() -> TrendQuery {
        TrendQuery {
            platforms: vec!["TikTok".to_string(), "Instagram".to_string()],
            categories: vec!["Music".to_string()],
            regions: vec!["US".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_generate_trends_builds_request() {
        let client = ScriptedClient::replying(&[ONE_TREND]);
        let trends = generate_trends(client.as_ref(), &GenerationSettings::default(), &query())
            .await
            .unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].trend_name, "X");

        let seen = client.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.max_tokens, 3000);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("trend analyst"));
        assert!(request.messages[1].content.contains("Platforms: TikTok, Instagram"));
        assert!(request.messages[1]
            .content
            .contains("Date Range: 2024-01-01 to 2024-01-31"));
    }

    #[tokio::test]
    async fn test_generate_trends_rejects_prose() {
        let client = ScriptedClient::replying(&["Here are your trends: []"]);
        let err = generate_trends(client.as_ref(), &GenerationSettings::default(), &query())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_generate_trends_rejects_fenced_json() {
        let client = ScriptedClient::replying(&["```json\n[]\n```"]);
        let err = generate_trends(client.as_ref(), &GenerationSettings::default(), &query())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_generate_trends_propagates_client_error() {
        let client = ScriptedClient::new(vec![Err(GenerationError::Request(
            "connection reset".to_string(),
        ))]);
        let err = generate_trends(client.as_ref(), &GenerationSettings::default(), &query())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Request(_)));
    }

    #[tokio::test]
    async fn test_generate_insights_uses_trends() {
        let client = ScriptedClient::replying(&[ONE_INSIGHT]);
        let trends: Vec<GeneratedTrend> = parse_json_array(ONE_TREND).unwrap();

        let insights = generate_insights(client.as_ref(), &GenerationSettings::default(), &trends)
            .await
            .unwrap();

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].impact, ImpactLevel::High);
        assert_eq!(insights[0].confidence, 88.0);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].max_tokens, 2000);
        assert!(seen[0].messages[0].content.contains("strategic business"));
        assert!(seen[0].messages[1].content.contains("\"trendName\": \"X\""));
    }

    #[test]
    fn test_parse_json_array_not_array() {
        let err = parse_json_array::<StrategicInsight>(r#"{"trend": "X"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::NotAnArray));
    }

    #[test]
    fn test_parse_json_array_reports_bad_element() {
        let text = r#"[
            {"trend": "A", "insight": "ok", "impact": "Low", "confidence": 80},
            {"trend": "B", "insight": "missing confidence", "impact": "Low"}
        ]"#;

        let err = parse_json_array::<StrategicInsight>(text).unwrap_err();
        match err {
            GenerationError::Validation { index, .. } => assert_eq!(index, 1),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_array_empty() {
        let trends = parse_json_array::<GeneratedTrend>("[]").unwrap();
        assert!(trends.is_empty());
    }
}
