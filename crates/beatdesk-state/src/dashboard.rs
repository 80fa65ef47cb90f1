//! # Dashboard Context
//!
//! Wires configuration, session, client, toaster and stores together.
//!
//! # Examples
//!
//! ```rust,ignore
//! use beatdesk_client::{ClientConfig, Session, SessionData};
//! use beatdesk_state::Dashboard;
//!
//! let dashboard = Dashboard::new(ClientConfig::load(None)?, Session::in_memory())?;
//! dashboard.sign_in(SessionData::new("ops", token))?;
//! dashboard.catalog().fetch_catalog(Default::default()).await;
//! ```

use std::sync::Arc;

use beatdesk_client::{ApiClient, ApiResult, ClientConfig, Session, SessionData, SessionError};
use beatdesk_types::{CatalogFilters, UserFilters};

use crate::catalog::CatalogStore;
use crate::metrics::MetricsStore;
use crate::notify::Toaster;
use crate::store::StoreContext;
use crate::users::UserStore;

/// Everything a backoffice view needs.
///
/// Cheap to clone; clones share stores, session and toasts.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: ClientConfig,
    client: ApiClient,
    toaster: Arc<Toaster>,
    catalog: CatalogStore,
    users: UserStore,
    metrics: MetricsStore,
}

impl Dashboard {
    /// Builds the context from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`](beatdesk_client::ApiError::InvalidUrl)
    /// if the configured base URL is invalid.
    pub fn new(config: ClientConfig, session: Session) -> ApiResult<Self> {
        let client = ApiClient::from_config(&config, session)?;
        Ok(Self::with_client(config, client))
    }

    /// Builds the context around an existing client.
    pub fn with_client(config: ClientConfig, client: ApiClient) -> Self {
        let toaster = Arc::new(Toaster::new(config.toast_limit, config.toast_duration()));
        let ctx = StoreContext::new(client.clone(), toaster.clone())
            .with_message_limit(config.message_limit)
            .with_page_size(config.default_page_size);
        Self {
            catalog: CatalogStore::new(ctx.clone()),
            users: UserStore::new(ctx.clone()),
            metrics: MetricsStore::new(ctx),
            config,
            client,
            toaster,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// HTTP client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Session context.
    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Toasts shown to the operator.
    pub fn toaster(&self) -> &Arc<Toaster> {
        &self.toaster
    }

    /// Catalog store.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// User store.
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Metrics store.
    pub fn metrics(&self) -> &MetricsStore {
        &self.metrics
    }

    /// First-page catalog filters with the configured page size.
    pub fn default_catalog_filters(&self) -> CatalogFilters {
        self.catalog.inner().default_filters()
    }

    /// First-page user filters with the configured page size.
    pub fn default_user_filters(&self) -> UserFilters {
        self.users.inner().default_filters()
    }

    /// Signs an operator in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session could not be persisted.
    pub fn sign_in(&self, data: SessionData) -> Result<(), SessionError> {
        self.session().sign_in(data)
    }

    /// Signs the operator out and drops every cached record.
    pub fn sign_out(&self) {
        self.session().sign_out();
        self.catalog.reset();
        self.users.reset();
        self.metrics.reset();
        self.toaster.dismiss_all();
        tracing::info!("Dashboard state cleared");
    }

    /// Returns true if the backend answers its health check.
    pub async fn check_connection(&self) -> bool {
        match self.client.health().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }
}
