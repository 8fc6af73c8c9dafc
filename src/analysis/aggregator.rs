//! Dashboard aggregation and statistics.
//!
//! This module folds the stored trend rows of one session into the summary
//! shown on the dashboard. Everything here is pure; rows are expected in
//! velocity-descending order, as the store returns them.

use crate::models::{
    DashboardData, DashboardMetrics, SentimentRatio, StoredTrend, TopTrend,
};
use indexmap::IndexMap;

/// Number of rows in the top trending table.
pub const TOP_TRENDING_LIMIT: usize = 10;

/// Virality value treated as zero growth.
const GROWTH_BASELINE: i64 = 50;

/// Build the full dashboard for a session's rows.
pub fn build_dashboard(trends: Vec<StoredTrend>) -> DashboardData {
    DashboardData {
        metrics: compute_metrics(&trends),
        platform_distribution: distribution(&trends, |t| &t.platform),
        category_distribution: distribution(&trends, |t| &t.category),
        top_trending: top_trending(&trends, TOP_TRENDING_LIMIT),
        all_trends: trends,
    }
}

/// Compute the headline metrics. An empty slice yields all zeros.
pub fn compute_metrics(trends: &[StoredTrend]) -> DashboardMetrics {
    if trends.is_empty() {
        return DashboardMetrics::default();
    }

    let count = trends.len() as f64;
    let mean = |field: fn(&StoredTrend) -> i64| {
        trends.iter().map(field).sum::<i64>() as f64 / count
    };

    DashboardMetrics {
        total_velocity: trends.iter().map(|t| t.velocity_count_per_hour).sum(),
        avg_virality: round_half_up(mean(|t| t.virality_score) * 100.0) / 100.0,
        sentiment_ratio: SentimentRatio {
            positive: round_half_up(mean(|t| t.sentiment_positive)) as i64,
            negative: round_half_up(mean(|t| t.sentiment_negative)) as i64,
            neutral: round_half_up(mean(|t| t.sentiment_neutral)) as i64,
        },
        emerging_topics: trends.iter().filter(|t| t.is_emerging_topic).count(),
    }
}

/// Count rows per key, keeping keys in first-seen order.
pub fn distribution<F>(trends: &[StoredTrend], key: F) -> IndexMap<String, usize>
where
    F: Fn(&StoredTrend) -> &String,
{
    let mut dist: IndexMap<String, usize> = IndexMap::new();

    for trend in trends {
        *dist.entry(key(trend).clone()).or_default() += 1;
    }

    dist
}

/// Project the first `n` rows into the top trending table.
pub fn top_trending(trends: &[StoredTrend], n: usize) -> Vec<TopTrend> {
    trends
        .iter()
        .take(n)
        .map(|t| TopTrend {
            name: t.trend_name.clone(),
            velocity: t.velocity_count_per_hour,
            virality: t.virality_score,
            growth: t.virality_score - GROWTH_BASELINE,
        })
        .collect()
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_trend(
        name: &str,
        platform: &str,
        category: &str,
        velocity: i64,
        virality: i64,
    ) -> StoredTrend {
        StoredTrend {
            id: 0,
            session_id: 1,
            trend_name: name.to_string(),
            trend_description: None,
            platform: platform.to_string(),
            category: category.to_string(),
            region: "US".to_string(),
            velocity_count_per_hour: velocity,
            virality_score: virality,
            sentiment_positive: 60,
            sentiment_negative: 20,
            sentiment_neutral: 20,
            is_emerging_topic: false,
            impact_level: "Medium".to_string(),
            confidence_score: 80,
            ai_insights: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_single_trend_scenario() {
        let mut trend = create_test_trend("X", "TikTok", "Music", 5000, 80);
        trend.is_emerging_topic = true;

        let dashboard = build_dashboard(vec![trend]);

        assert_eq!(dashboard.metrics.total_velocity, 5000);
        assert_eq!(dashboard.metrics.avg_virality, 80.0);
        assert_eq!(
            dashboard.metrics.sentiment_ratio,
            SentimentRatio {
                positive: 60,
                negative: 20,
                neutral: 20
            }
        );
        assert_eq!(dashboard.metrics.emerging_topics, 1);
        assert_eq!(dashboard.platform_distribution.get("TikTok"), Some(&1));
        assert_eq!(dashboard.platform_distribution.len(), 1);
        assert_eq!(dashboard.top_trending[0].growth, 30);
        assert_eq!(dashboard.all_trends.len(), 1);
    }

    #[test]
    fn test_empty_session_is_zeroed() {
        let dashboard = build_dashboard(Vec::new());

        assert_eq!(dashboard.metrics, DashboardMetrics::default());
        assert_eq!(dashboard.metrics.avg_virality, 0.0);
        assert!(dashboard.platform_distribution.is_empty());
        assert!(dashboard.category_distribution.is_empty());
        assert!(dashboard.top_trending.is_empty());
        assert!(dashboard.all_trends.is_empty());
    }

    #[test]
    fn test_avg_virality_two_decimals() {
        let trends = vec![
            create_test_trend("a", "TikTok", "Music", 3, 70),
            create_test_trend("b", "TikTok", "Music", 2, 71),
            create_test_trend("c", "TikTok", "Music", 1, 71),
        ];

        // 212 / 3 = 70.666...
        assert_eq!(compute_metrics(&trends).avg_virality, 70.67);
    }

    #[test]
    fn test_sentiment_means_are_independent() {
        let mut a = create_test_trend("a", "TikTok", "Music", 2, 50);
        a.sentiment_positive = 51;
        a.sentiment_negative = 25;
        a.sentiment_neutral = 24;
        let mut b = create_test_trend("b", "TikTok", "Music", 1, 50);
        b.sentiment_positive = 50;
        b.sentiment_negative = 24;
        b.sentiment_neutral = 26;

        let ratio = compute_metrics(&[a, b]).sentiment_ratio;

        // 50.5 rounds up, 24.5 rounds up, 25 stays; sum is 101, not re-normalized.
        assert_eq!(ratio.positive, 51);
        assert_eq!(ratio.negative, 25);
        assert_eq!(ratio.neutral, 25);
    }

    #[test]
    fn test_distribution_first_seen_order() {
        let trends = vec![
            create_test_trend("a", "YouTube", "Tech", 5, 50),
            create_test_trend("b", "TikTok", "Music", 4, 50),
            create_test_trend("c", "YouTube", "Music", 3, 50),
            create_test_trend("d", "Instagram", "Tech", 2, 50),
        ];

        let platforms = distribution(&trends, |t| &t.platform);
        let keys: Vec<&str> = platforms.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["YouTube", "TikTok", "Instagram"]);
        assert_eq!(platforms["YouTube"], 2);
        assert_eq!(platforms.values().sum::<usize>(), trends.len());

        let categories = distribution(&trends, |t| &t.category);
        assert_eq!(categories.values().sum::<usize>(), trends.len());
    }

    #[test]
    fn test_top_trending_limit_and_growth() {
        let trends: Vec<StoredTrend> = (0..12)
            .map(|i| create_test_trend(&format!("t{}", i), "TikTok", "Music", 1000 - i, 40 + i))
            .collect();

        let top = top_trending(&trends, TOP_TRENDING_LIMIT);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].name, "t0");
        assert!(top.windows(2).all(|w| w[0].velocity >= w[1].velocity));
        assert!(top.iter().all(|t| t.growth == t.virality - 50));
        assert_eq!(top[0].growth, -10);
    }

    #[test]
    fn test_build_dashboard_is_deterministic() {
        let trends = vec![
            create_test_trend("a", "TikTok", "Music", 10, 90),
            create_test_trend("b", "X", "News", 5, 30),
        ];

        assert_eq!(build_dashboard(trends.clone()), build_dashboard(trends));
    }
}
