//! User management endpoints.

use beatdesk_types::{BlockRequest, CreateUserRequest, Page, UpdateUserRequest, User, UserFilters};
use reqwest::Method;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiResult;

impl ApiClient {
    /// Lists users matching `filters`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`](crate::ApiError::Network) - Network request failed
    /// * [`ApiError::Request`](crate::ApiError::Request) - Backend rejected the query
    pub async fn list_users(&self, filters: &UserFilters) -> ApiResult<Page<User>> {
        let mut filters = filters.clone();
        filters.normalize();
        let options = RequestOptions::new().with_query(&filters)?;
        let page: Page<User> = self.request(Method::GET, "/users", options).await?;
        Ok(page.normalized())
    }

    /// Retrieves a single user.
    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.request(Method::GET, &format!("/users/{}", id), RequestOptions::new())
            .await
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`](crate::ApiError::Request) with status 409
    /// if the username or e-mail is taken.
    pub async fn create_user(&self, req: &CreateUserRequest) -> ApiResult<Option<User>> {
        let options = RequestOptions::new().with_json(req)?;
        self.request(Method::POST, "/users", options).await
    }

    /// Updates an account.
    pub async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> ApiResult<Option<User>> {
        let options = RequestOptions::new().with_json(req)?;
        self.request(Method::PUT, &format!("/users/{}", id), options)
            .await
    }

    /// Blocks an account.
    pub async fn block_user(&self, id: &str, reason: Option<String>) -> ApiResult<Option<User>> {
        let options = RequestOptions::new().with_json(&BlockRequest { reason })?;
        self.request(Method::POST, &format!("/users/{}/block", id), options)
            .await
    }

    /// Lifts a block.
    pub async fn unblock_user(&self, id: &str) -> ApiResult<Option<User>> {
        self.request(
            Method::POST,
            &format!("/users/{}/unblock", id),
            RequestOptions::new(),
        )
        .await
    }

    /// Deletes an account.
    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.request::<Option<serde_json::Value>>(
            Method::DELETE,
            &format!("/users/{}", id),
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }
}
