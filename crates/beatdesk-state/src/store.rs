//! Generic resource store.
//!
//! [`ResourceStore`] caches one page of a [`Resource`], the record selected
//! for a detail view, a loading flag and the last error. Views read
//! [`Snapshot`]s and dispatch actions; only the store edits the snapshot.
//!
//! Every list fetch takes a generation number. A response is applied only if
//! no newer fetch was started in the meantime, so the last request wins.
//! Mutations go through [`ResourceStore::mutate`], which patches the snapshot
//! optimistically, calls the backend, then either keeps the patch and
//! refetches with the current filters or rolls the patch back.
//!
//! A rollback restores the whole page captured by its own patch. When two
//! mutations overlap and the first one fails, the second one's patch is lost
//! too until the next fetch brings the backend's view back.
//!
//! [`ResourceStore::reset`] starts a new epoch: anything still in flight from
//! before the reset is dropped when it lands.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use beatdesk_client::{ApiClient, ApiError, ApiResult};
use beatdesk_types::{Identified, Page, DEFAULT_PAGE_SIZE};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cell::{StateCell, Tracked};
use crate::message::{describe_error, DEFAULT_MESSAGE_LIMIT};
use crate::notify::{Notify, Toast};
use crate::optimistic::{OptimisticEdit, Patch};
use crate::resource::Resource;

/// What views render from.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T, F> {
    /// The current page; `None` before the first successful fetch.
    pub data: Option<Page<T>>,
    /// Record shown in the detail view.
    pub selected: Option<T>,
    /// True while any operation of the store is in flight.
    pub loading: bool,
    /// Message of the last failure, cleared by the next successful fetch.
    pub error: Option<String>,
    /// Filters of the last fetch, reused by refreshes.
    pub current_filters: Option<F>,
    /// True while an acknowledged mutation is not yet confirmed by a fetch.
    pub unreconciled: bool,
    /// Generation of the fetch that produced `data`.
    pub revision: u64,
}

impl<T, F> Default for Snapshot<T, F> {
    fn default() -> Self {
        Self {
            data: None,
            selected: None,
            loading: false,
            error: None,
            current_filters: None,
            unreconciled: false,
            revision: 0,
        }
    }
}

impl<T, F> Tracked for Snapshot<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Clone + Send + Sync + 'static,
{
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

/// Dependencies shared by every store.
#[derive(Clone)]
pub struct StoreContext {
    client: ApiClient,
    notifier: Arc<dyn Notify>,
    message_limit: usize,
    page_size: u32,
}

impl StoreContext {
    /// Creates a context with the default message limit.
    pub fn new(client: ApiClient, notifier: Arc<dyn Notify>) -> Self {
        Self {
            client,
            notifier,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the maximum length of error messages.
    #[must_use]
    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Sets the page size used when a store refreshes before any fetch.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// The HTTP client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Page size used when no filters were given.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub(crate) fn describe(&self, err: &ApiError) -> String {
        describe_error(err, self.message_limit)
    }

    pub(crate) fn notify(&self, toast: Toast) {
        self.notifier.notify(toast);
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("client", &self.client)
            .field("message_limit", &self.message_limit)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// A mutation: its local patch and the toasts reporting its outcome.
#[derive(Debug)]
pub struct Mutation<T> {
    action: &'static str,
    patch: Patch<T>,
    success: String,
    failure: String,
}

impl<T> Mutation<T> {
    /// Describes a mutation named `action` (used in logs).
    pub fn new(
        action: &'static str,
        patch: Patch<T>,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        Self {
            action,
            patch,
            success: success.into(),
            failure: failure.into(),
        }
    }
}

struct Shared<R: Resource> {
    resource: R,
    ctx: StoreContext,
    cell: StateCell<Snapshot<R::Record, R::Filters>>,
    generation: AtomicU64,
}

/// Cached, observable view of one [`Resource`].
///
/// Cheap to clone; clones share the same state.
pub struct ResourceStore<R: Resource> {
    shared: Arc<Shared<R>>,
}

impl<R: Resource> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Resource> ResourceStore<R> {
    /// Creates an empty store.
    pub fn new(resource: R, ctx: StoreContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                resource,
                ctx,
                cell: StateCell::new(Snapshot::default()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The HTTP client used by this store.
    pub fn client(&self) -> &ApiClient {
        self.shared.ctx.client()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<R::Record, R::Filters> {
        self.shared.cell.snapshot()
    }

    /// Receives every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<R::Record, R::Filters>> {
        self.shared.cell.subscribe()
    }

    /// Current page, if fetched.
    pub fn data(&self) -> Option<Page<R::Record>> {
        self.shared.cell.read(|s| s.data.clone())
    }

    /// Filters of the last fetch.
    pub fn current_filters(&self) -> Option<R::Filters> {
        self.shared.cell.read(|s| s.current_filters.clone())
    }

    /// Fetches a page and replaces the cached one.
    ///
    /// Never fails: errors end up in the snapshot and as a toast. Returns
    /// whether the request succeeded.
    pub async fn fetch_list(&self, filters: R::Filters) -> bool {
        let shared = &self.shared;
        let _loading = shared.cell.loading();
        let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(resource = R::LABEL, generation, ?filters, "Fetching list");

        let result = shared.resource.list(&shared.ctx.client, &filters).await;
        let ok = result.is_ok();
        let message = result.as_ref().err().map(|e| shared.ctx.describe(e));

        let applied = shared.cell.update(|s| {
            if shared.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            s.current_filters = Some(filters);
            match result {
                Ok(page) => {
                    if let Some(selected) = s.selected.as_mut() {
                        if let Some(fresh) = page.find(selected.id()) {
                            *selected = fresh.clone();
                        }
                    }
                    s.data = Some(page);
                    s.error = None;
                    s.unreconciled = false;
                    s.revision = generation;
                }
                Err(_) => s.error = message.clone(),
            }
            true
        });

        if !applied {
            debug!(resource = R::LABEL, generation, "Discarding stale response");
            return ok;
        }
        if let Some(message) = message {
            warn!(resource = R::LABEL, error = %message, "Fetch failed");
            shared
                .ctx
                .notify(Toast::error(format!("Failed to load {}", R::LABEL), message));
        }
        ok
    }

    /// Unfiltered first page with the configured page size.
    pub fn default_filters(&self) -> R::Filters {
        R::first_page(self.shared.ctx.page_size())
    }

    /// Fetches again with the current filters, or the defaults if none.
    pub async fn refresh(&self) -> bool {
        let filters = self
            .current_filters()
            .unwrap_or_else(|| self.default_filters());
        self.fetch_list(filters).await
    }

    /// Fetches one record and selects it.
    ///
    /// The cached copy in the list is refreshed too.
    pub async fn fetch_one(&self, id: &str) -> bool {
        let shared = &self.shared;
        let _loading = shared.cell.loading();
        let epoch = shared.cell.epoch();
        debug!(resource = R::LABEL, id, "Fetching record");

        match shared.resource.get(&shared.ctx.client, id).await {
            Ok(record) => {
                let applied = shared.cell.update_in(epoch, |s| {
                    if let Some(existing) = s.data.as_mut().and_then(|p| p.find_mut(id)) {
                        *existing = record.clone();
                    }
                    s.selected = Some(record);
                    s.error = None;
                });
                if applied.is_none() {
                    debug!(resource = R::LABEL, id, "Store reset, discarding record");
                }
                true
            }
            Err(err) => {
                let message = shared.ctx.describe(&err);
                if shared
                    .cell
                    .update_in(epoch, |s| s.error = Some(message.clone()))
                    .is_none()
                {
                    debug!(resource = R::LABEL, id, error = %err, "Store reset, discarding error");
                    return false;
                }
                warn!(resource = R::LABEL, id, error = %err, "Fetch failed");
                shared
                    .ctx
                    .notify(Toast::error(format!("Failed to load {}", R::LABEL), message));
                false
            }
        }
    }

    /// Selects a cached record. Returns false if it is not on the current page.
    pub fn select(&self, id: &str) -> bool {
        self.shared.cell.update(|s| {
            match s.data.as_ref().and_then(|p| p.find(id)).cloned() {
                Some(record) => {
                    s.selected = Some(record);
                    true
                }
                None => false,
            }
        })
    }

    /// Clears the detail view.
    pub fn clear_selection(&self) {
        self.shared.cell.update(|s| s.selected = None);
    }

    /// Drops all cached state, e.g. on sign-out.
    pub fn reset(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.cell.reset(Snapshot::default());
    }

    /// Runs a mutation.
    ///
    /// The patch is applied before `call` is awaited. On success the backend's
    /// record (if any) replaces the local guess and the list is refetched with
    /// the current filters; if that refetch fails the patch stays and the
    /// snapshot is marked unreconciled. On failure the patch is rolled back.
    /// If the store is reset while `call` is pending, its outcome only goes
    /// to the log. Returns whether the backend accepted the mutation.
    pub async fn mutate<Fut>(&self, mutation: Mutation<R::Record>, call: Fut) -> bool
    where
        Fut: Future<Output = ApiResult<Option<R::Record>>>,
    {
        let shared = &self.shared;
        let _loading = shared.cell.loading();
        let Mutation {
            action,
            patch,
            success,
            failure,
        } = mutation;
        let target = patch.target().map(str::to_string);
        let epoch = shared.cell.epoch();
        let edit = shared.cell.update(|s| OptimisticEdit::apply(s, &patch));
        debug!(resource = R::LABEL, action, id = ?target, "Applied optimistic patch");

        let outcome = call.await;
        if shared.cell.epoch() != epoch {
            debug!(
                resource = R::LABEL,
                action,
                id = ?target,
                ok = outcome.is_ok(),
                "Store reset during mutation, discarding outcome"
            );
            return outcome.is_ok();
        }

        match outcome {
            Ok(record) => {
                shared.cell.update_in(epoch, |s| edit.confirm(s, &patch, record));
                info!(resource = R::LABEL, action, id = ?target, "Mutation succeeded");

                let refreshed = self.refresh().await;
                let current = shared.cell.update_in(epoch, |s| {
                    if !refreshed {
                        s.unreconciled = true;
                    }
                });
                if current.is_none() {
                    return true;
                }
                if !refreshed {
                    warn!(
                        resource = R::LABEL,
                        action,
                        id = ?target,
                        "Refetch after mutation failed, keeping local patch"
                    );
                }
                shared.ctx.notify(Toast::success(success));
                true
            }
            Err(err) => {
                let message = shared.ctx.describe(&err);
                let restored = shared
                    .cell
                    .update_in(epoch, |s| {
                        s.error = Some(message.clone());
                        edit.rollback(s)
                    })
                    .unwrap_or(false);
                warn!(
                    resource = R::LABEL,
                    action,
                    id = ?target,
                    error = %err,
                    restored,
                    "Mutation failed"
                );
                shared.ctx.notify(Toast::error(failure, message));
                false
            }
        }
    }
}

impl<R: Resource> std::fmt::Debug for ResourceStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("resource", &R::LABEL)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
