//! # Beatdesk Client
//!
//! HTTP access to the streaming platform's backoffice API.
//!
//! - [`ApiClient`]: JSON requests with default headers, bearer auth from the
//!   [`Session`], RFC 7807 error translation and typed endpoint helpers for
//!   the catalog, users and metrics.
//! - [`Session`]: the operator's credentials, persisted through a
//!   [`SessionStore`].
//! - [`ClientConfig`]: settings layered from defaults, a file and
//!   `BEATDESK__*` environment variables.
//!
//! ## Example
//!
//! ```rust,ignore
//! use beatdesk_client::{ApiClient, ClientConfig, Session};
//!
//! let config = ClientConfig::load(None)?;
//! let client = ApiClient::from_config(&config, Session::in_memory())?;
//! let metrics = client.user_metrics(&Default::default()).await?;
//! ```

mod catalog;
mod client;
pub mod config;
mod error;
pub mod logging;
mod metrics;
mod session;
mod users;

pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use logging::init_logging;
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionData, SessionError, SessionEvent,
    SessionStore,
};

pub use reqwest::Method;
