//! Common types used throughout `beatdesk`.
//!
//! This crate provides the records exchanged with the streaming platform's
//! backoffice API (catalog items, users, metrics), the page envelope and
//! filter criteria used to list them, the RFC 7807 problem object returned on
//! errors, and the static validation rules applied to forms before anything
//! reaches the network.

mod catalog;
mod filter;
mod metrics;
mod page;
mod problem;
mod user;
pub mod validation;

pub use catalog::{
    AvailabilityRequest, BlockRequest, CatalogItem, CatalogUpdate, ContentState, ContentType,
    ScheduleRequest,
};
pub use filter::{CatalogFilters, UserFilters, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use metrics::{
    ArtistMetrics, ArtistStat, ContentMetrics, DataPoint, MetricsPeriod, MetricsQuery,
    TypeBreakdown, UserMetrics,
};
pub use page::Page;
pub use problem::ProblemDetails;
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserRole, UserStatus};

/// A record with a stable identifier that can live in a [`Page`].
pub trait Identified {
    /// Returns the record's identifier.
    fn id(&self) -> &str;
}
