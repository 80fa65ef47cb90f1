//! Catalog moderation endpoints.

use beatdesk_types::{
    AvailabilityRequest, BlockRequest, CatalogFilters, CatalogItem, CatalogUpdate, Page,
    ScheduleRequest,
};
use reqwest::Method;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiResult;

impl ApiClient {
    /// Lists catalog items matching `filters`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::Request`](crate::ApiError::Request) - Backend rejected the query
    pub async fn list_catalog(&self, filters: &CatalogFilters) -> ApiResult<Page<CatalogItem>> {
        let mut filters = filters.clone();
        filters.normalize();
        let options = RequestOptions::new().with_query(&filters)?;
        let page: Page<CatalogItem> = self.request(Method::GET, "/content", options).await?;
        Ok(page.normalized())
    }

    /// Retrieves a single catalog item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`](crate::ApiError::Request) with status 404
    /// if the item does not exist.
    pub async fn get_catalog_item(&self, id: &str) -> ApiResult<CatalogItem> {
        self.request(Method::GET, &format!("/content/{}", id), RequestOptions::new())
            .await
    }

    /// Blocks a catalog item.
    ///
    /// Returns the updated item when the backend sends one.
    pub async fn block_catalog_item(
        &self,
        id: &str,
        reason: Option<String>,
    ) -> ApiResult<Option<CatalogItem>> {
        let options = RequestOptions::new().with_json(&BlockRequest { reason })?;
        self.request(Method::POST, &format!("/content/{}/block", id), options)
            .await
    }

    /// Lifts an admin block.
    pub async fn unblock_catalog_item(&self, id: &str) -> ApiResult<Option<CatalogItem>> {
        self.request(
            Method::POST,
            &format!("/content/{}/unblock", id),
            RequestOptions::new(),
        )
        .await
    }

    /// Updates descriptive attributes.
    pub async fn update_catalog_item(
        &self,
        id: &str,
        update: &CatalogUpdate,
    ) -> ApiResult<Option<CatalogItem>> {
        let options = RequestOptions::new().with_json(update)?;
        self.request(Method::PUT, &format!("/content/{}", id), options)
            .await
    }

    /// Sets the publication window.
    pub async fn schedule_catalog_item(
        &self,
        id: &str,
        schedule: &ScheduleRequest,
    ) -> ApiResult<Option<CatalogItem>> {
        let options = RequestOptions::new().with_json(schedule)?;
        self.request(Method::PUT, &format!("/content/{}/schedule", id), options)
            .await
    }

    /// Sets the regions where the item can be streamed. Empty means worldwide.
    pub async fn set_catalog_availability(
        &self,
        id: &str,
        regions: &[String],
    ) -> ApiResult<Option<CatalogItem>> {
        let options = RequestOptions::new().with_json(&AvailabilityRequest {
            regions: regions.to_vec(),
        })?;
        self.request(
            Method::PUT,
            &format!("/content/{}/availability", id),
            options,
        )
        .await
    }
}
