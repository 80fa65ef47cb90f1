//! Catalog moderation store.

use beatdesk_types::{CatalogFilters, CatalogItem, CatalogUpdate, ScheduleRequest};
use chrono::Utc;
use tokio::sync::watch;

use crate::optimistic::Patch;
use crate::resource::Catalog;
use crate::store::{Mutation, ResourceStore, Snapshot, StoreContext};

/// Snapshot of the catalog store.
pub type CatalogSnapshot = Snapshot<CatalogItem, CatalogFilters>;

/// Catalog listing plus moderation actions.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    store: ResourceStore<Catalog>,
}

impl CatalogStore {
    /// Creates an empty store.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            store: ResourceStore::new(Catalog, ctx),
        }
    }

    /// The underlying generic store.
    pub fn inner(&self) -> &ResourceStore<Catalog> {
        &self.store
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.store.snapshot()
    }

    /// Receives every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.store.subscribe()
    }

    /// Lists catalog items matching `filters`.
    pub async fn fetch_catalog(&self, filters: CatalogFilters) -> bool {
        self.store.fetch_list(filters).await
    }

    /// Fetches again with the current filters.
    pub async fn refresh(&self) -> bool {
        self.store.refresh().await
    }

    /// Loads one item into the detail view.
    pub async fn fetch_item(&self, id: &str) -> bool {
        self.store.fetch_one(id).await
    }

    /// Selects a cached item.
    pub fn select(&self, id: &str) -> bool {
        self.store.select(id)
    }

    /// Clears the detail view.
    pub fn clear_selection(&self) {
        self.store.clear_selection();
    }

    /// Blocks an item.
    pub async fn block_item(&self, id: &str, reason: Option<String>) -> bool {
        let local_reason = reason.clone();
        let patch = Patch::modify(id, move |item: &mut CatalogItem| {
            item.block(local_reason.clone())
        });
        let mutation = Mutation::new("block", patch, "Content blocked", "Failed to block content");
        self.store
            .mutate(mutation, self.store.client().block_catalog_item(id, reason))
            .await
    }

    /// Lifts an admin block.
    pub async fn unblock_item(&self, id: &str) -> bool {
        let patch = Patch::modify(id, |item: &mut CatalogItem| item.unblock(Utc::now()));
        let mutation = Mutation::new(
            "unblock",
            patch,
            "Content unblocked",
            "Failed to unblock content",
        );
        self.store
            .mutate(mutation, self.store.client().unblock_catalog_item(id))
            .await
    }

    /// Updates title or artist.
    pub async fn update_item(&self, id: &str, update: CatalogUpdate) -> bool {
        let local = update.clone();
        let patch = Patch::modify(id, move |item: &mut CatalogItem| item.apply_update(&local));
        let mutation = Mutation::new(
            "update",
            patch,
            "Content updated",
            "Failed to update content",
        );
        self.store
            .mutate(mutation, self.store.client().update_catalog_item(id, &update))
            .await
    }

    /// Sets the publication window.
    pub async fn schedule_item(&self, id: &str, schedule: ScheduleRequest) -> bool {
        let local = schedule.clone();
        let patch = Patch::modify(id, move |item: &mut CatalogItem| {
            item.reschedule(&local, Utc::now())
        });
        let mutation = Mutation::new(
            "schedule",
            patch,
            "Schedule saved",
            "Failed to schedule content",
        );
        self.store
            .mutate(
                mutation,
                self.store.client().schedule_catalog_item(id, &schedule),
            )
            .await
    }

    /// Sets the regions where the item can be streamed.
    pub async fn set_availability(&self, id: &str, regions: Vec<String>) -> bool {
        let local = regions.clone();
        let patch = Patch::modify(id, move |item: &mut CatalogItem| {
            item.available_regions = local.clone()
        });
        let mutation = Mutation::new(
            "availability",
            patch,
            "Availability updated",
            "Failed to update availability",
        );
        self.store
            .mutate(
                mutation,
                self.store.client().set_catalog_availability(id, &regions),
            )
            .await
    }

    /// Drops all cached state.
    pub fn reset(&self) {
        self.store.reset();
    }
}
