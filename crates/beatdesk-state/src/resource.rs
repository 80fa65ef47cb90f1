//! Listable backend resources.

use std::fmt::Debug;

use async_trait::async_trait;
use beatdesk_client::{ApiClient, ApiResult};
use beatdesk_types::{CatalogFilters, CatalogItem, Identified, Page, User, UserFilters};

/// A collection the backend lists page by page and serves by identifier.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Human-readable plural used in logs and notifications.
    const LABEL: &'static str;

    /// One record of the collection.
    type Record: Identified + Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Criteria the collection is listed with.
    type Filters: Clone + Default + PartialEq + Debug + Send + Sync + 'static;

    /// Fetches one page matching `filters`.
    async fn list(&self, client: &ApiClient, filters: &Self::Filters)
        -> ApiResult<Page<Self::Record>>;

    /// Fetches one record.
    async fn get(&self, client: &ApiClient, id: &str) -> ApiResult<Self::Record>;

    /// Unfiltered first page of `size` records.
    fn first_page(size: u32) -> Self::Filters;
}

/// The content catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

#[async_trait]
impl Resource for Catalog {
    const LABEL: &'static str = "catalog";
    type Record = CatalogItem;
    type Filters = CatalogFilters;

    async fn list(
        &self,
        client: &ApiClient,
        filters: &CatalogFilters,
    ) -> ApiResult<Page<CatalogItem>> {
        client.list_catalog(filters).await
    }

    async fn get(&self, client: &ApiClient, id: &str) -> ApiResult<CatalogItem> {
        client.get_catalog_item(id).await
    }

    fn first_page(size: u32) -> CatalogFilters {
        CatalogFilters::default().with_size(size)
    }
}

/// Platform accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Users;

#[async_trait]
impl Resource for Users {
    const LABEL: &'static str = "users";
    type Record = User;
    type Filters = UserFilters;

    async fn list(&self, client: &ApiClient, filters: &UserFilters) -> ApiResult<Page<User>> {
        client.list_users(filters).await
    }

    async fn get(&self, client: &ApiClient, id: &str) -> ApiResult<User> {
        client.get_user(id).await
    }

    fn first_page(size: u32) -> UserFilters {
        UserFilters::default().with_size(size)
    }
}
