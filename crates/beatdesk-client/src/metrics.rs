//! Dashboard metrics endpoints.

use beatdesk_types::{ArtistMetrics, ContentMetrics, MetricsQuery, UserMetrics};
use reqwest::Method;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiResult;

impl ApiClient {
    /// User growth and activity for `query`.
    pub async fn user_metrics(&self, query: &MetricsQuery) -> ApiResult<UserMetrics> {
        let options = RequestOptions::new().with_query(query)?;
        self.request(Method::GET, "/metrics/users", options).await
    }

    /// Catalog size and consumption for `query`.
    pub async fn content_metrics(&self, query: &MetricsQuery) -> ApiResult<ContentMetrics> {
        let options = RequestOptions::new().with_query(query)?;
        self.request(Method::GET, "/metrics/content", options).await
    }

    /// Artist population and ranking for `query`.
    pub async fn artist_metrics(&self, query: &MetricsQuery) -> ApiResult<ArtistMetrics> {
        let options = RequestOptions::new().with_query(query)?;
        self.request(Method::GET, "/metrics/artists", options).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ApiClient;
    use beatdesk_types::{MetricsPeriod, MetricsQuery};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_user_metrics_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics/users"))
            .and(query_param("period", "month"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalUsers": 1200,
                "activeUsers": 800
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(mock_server.uri()).unwrap();
        let metrics = client
            .user_metrics(&MetricsQuery::for_period(MetricsPeriod::Month))
            .await
            .unwrap();
        assert_eq!(metrics.total_users, 1200);
        assert_eq!(metrics.new_users, 0);
    }

    #[tokio::test]
    async fn test_artist_metrics_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics/artists"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(mock_server.uri()).unwrap();
        let err = client
            .artist_metrics(&MetricsQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
