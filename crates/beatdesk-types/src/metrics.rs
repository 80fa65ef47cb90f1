//! Dashboard metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ContentType;

/// Aggregation window for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsPeriod {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    #[default]
    Week,
    /// Last 30 days.
    Month,
    /// Last 365 days.
    Year,
}

/// Query parameters shared by all metrics endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsQuery {
    /// Aggregation window.
    pub period: MetricsPeriod,
    /// Restrict to one ISO 3166-1 alpha-2 region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl MetricsQuery {
    /// Query for a period across all regions.
    pub fn for_period(period: MetricsPeriod) -> Self {
        Self {
            period,
            region: None,
        }
    }
}

/// One sample of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Sample date.
    pub date: NaiveDate,
    /// Sample value.
    pub value: u64,
}

/// User growth and activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserMetrics {
    /// Registered accounts.
    pub total_users: u64,
    /// Accounts active in the period.
    pub active_users: u64,
    /// Accounts created in the period.
    pub new_users: u64,
    /// Blocked accounts.
    pub blocked_users: u64,
    /// Daily active users.
    pub series: Vec<DataPoint>,
}

/// Per content-type count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    /// Kind of content.
    pub content_type: ContentType,
    /// Number of items.
    pub count: u64,
}

/// Catalog size and consumption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentMetrics {
    /// Items in the catalog.
    pub total_items: u64,
    /// Items blocked by an administrator.
    pub blocked_items: u64,
    /// Items waiting for their publish date.
    pub scheduled_items: u64,
    /// Streams in the period.
    pub streams: u64,
    /// Daily streams.
    pub series: Vec<DataPoint>,
    /// Items per content type.
    pub by_type: Vec<TypeBreakdown>,
}

/// One row of the artist ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistStat {
    /// Artist identifier.
    pub id: String,
    /// Artist name.
    pub name: String,
    /// Streams in the period.
    #[serde(default)]
    pub streams: u64,
    /// Follower count.
    #[serde(default)]
    pub followers: u64,
}

/// Artist population and ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistMetrics {
    /// Artist accounts.
    pub total_artists: u64,
    /// Artists with at least one stream in the period.
    pub active_artists: u64,
    /// Most streamed artists, highest first.
    pub top_artists: Vec<ArtistStat>,
}

impl ArtistMetrics {
    /// Returns the ranking sorted by streams, highest first.
    pub fn ranked(&self) -> Vec<ArtistStat> {
        let mut ranked = self.top_artists.clone();
        ranked.sort_by(|a, b| b.streams.cmp(&a.streams).then_with(|| a.name.cmp(&b.name)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_metrics_decode_with_defaults() {
        let json = r#"{"totalUsers": 1200, "series": [{"date": "2026-10-01", "value": 40}]}"#;
        let metrics: UserMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.total_users, 1200);
        assert_eq!(metrics.active_users, 0);
        assert_eq!(metrics.series.len(), 1);
        assert_eq!(metrics.series[0].value, 40);
    }

    #[test]
    fn test_artist_ranking() {
        let stat = |name: &str, streams| ArtistStat {
            id: name.to_lowercase(),
            name: name.to_string(),
            streams,
            followers: 0,
        };
        let metrics = ArtistMetrics {
            total_artists: 3,
            active_artists: 3,
            top_artists: vec![stat("Bea", 10), stat("Ana", 50), stat("Cid", 10)],
        };

        let names: Vec<_> = metrics.ranked().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Ana", "Bea", "Cid"]);
    }

    #[test]
    fn test_query_serialization() {
        let query = MetricsQuery {
            period: MetricsPeriod::Month,
            region: Some("BR".to_string()),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"period": "month", "region": "BR"}));
        assert_eq!(
            serde_json::to_value(MetricsQuery::for_period(MetricsPeriod::Day)).unwrap(),
            serde_json::json!({"period": "day"})
        );
    }
}
