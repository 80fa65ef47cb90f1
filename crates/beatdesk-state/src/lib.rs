//! # Beatdesk State
//!
//! Observable stores for the backoffice views.
//!
//! Each store caches what the backend returned, exposes it as a snapshot on a
//! `watch` channel and offers actions that never fail: they return `bool`,
//! record the error in the snapshot and raise a toast through [`Notify`].
//!
//! Mutations are optimistic. The local snapshot is patched first, then the
//! backend is called; success keeps the patch and refetches with the current
//! filters, failure restores the snapshot exactly as it was.
//!
//! - [`CatalogStore`]: block, unblock, edit, schedule and geo-restrict content
//! - [`UserStore`]: create, edit, block, unblock and delete accounts
//! - [`MetricsStore`]: user, content and artist dashboards
//! - [`Toaster`]: bounded list of transient notifications
//! - [`Dashboard`]: all of the above sharing one client and session

mod catalog;
mod cell;
mod dashboard;
pub mod message;
mod metrics;
mod notify;
mod optimistic;
mod resource;
mod store;
mod users;

pub use catalog::{CatalogSnapshot, CatalogStore};
pub use dashboard::Dashboard;
pub use metrics::{MetricsSnapshot, MetricsStore};
pub use notify::{
    ActiveToast, Notify, Toast, ToastEvent, ToastVariant, Toaster, DEFAULT_TOAST_DURATION,
    DEFAULT_TOAST_LIMIT,
};
pub use optimistic::{OptimisticEdit, Patch};
pub use resource::{Catalog, Resource, Users};
pub use store::{Mutation, ResourceStore, Snapshot, StoreContext};
pub use users::{UserSnapshot, UserStore};
