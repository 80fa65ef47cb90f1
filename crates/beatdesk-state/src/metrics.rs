//! Dashboard metrics store.
//!
//! Panels load independently. A [`MetricsStore::reset`] drops every answer
//! still in flight, so a signed-out dashboard stays empty.

use std::sync::Arc;

use beatdesk_client::ApiResult;
use beatdesk_types::{ArtistMetrics, ContentMetrics, MetricsQuery, UserMetrics};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cell::{StateCell, Tracked};
use crate::notify::Toast;
use crate::store::StoreContext;

/// What the metrics views render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// User growth and activity.
    pub users: Option<UserMetrics>,
    /// Catalog size and consumption.
    pub content: Option<ContentMetrics>,
    /// Artist population and ranking.
    pub artists: Option<ArtistMetrics>,
    /// Query of the last fetch.
    pub query: Option<MetricsQuery>,
    /// True while any fetch is in flight.
    pub loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
}

impl Tracked for MetricsSnapshot {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

struct Shared {
    ctx: StoreContext,
    cell: StateCell<MetricsSnapshot>,
}

/// Read-only store for the three metrics panels.
#[derive(Clone)]
pub struct MetricsStore {
    shared: Arc<Shared>,
}

impl MetricsStore {
    /// Creates an empty store.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                ctx,
                cell: StateCell::new(MetricsSnapshot::default()),
            }),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.shared.cell.snapshot()
    }

    /// Receives every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.shared.cell.subscribe()
    }

    fn finish<T>(
        &self,
        panel: &'static str,
        epoch: u64,
        query: &MetricsQuery,
        result: ApiResult<T>,
        store: impl FnOnce(&mut MetricsSnapshot, T),
    ) -> bool {
        let shared = &self.shared;
        match result {
            Ok(metrics) => {
                let applied = shared.cell.update_in(epoch, |s| {
                    store(s, metrics);
                    s.query = Some(query.clone());
                    s.error = None;
                });
                match applied {
                    Some(()) => debug!(panel, "Metrics loaded"),
                    None => debug!(panel, "Store reset, discarding metrics"),
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
                    debug!(panel, error = %err, "Store reset, discarding error");
                    return false;
                }
                warn!(panel, error = %err, "Metrics fetch failed");
                shared
                    .ctx
                    .notify(Toast::error(format!("Failed to load {} metrics", panel), message));
                false
            }
        }
    }

    /// Loads user metrics.
    pub async fn fetch_user_metrics(&self, query: MetricsQuery) -> bool {
        let _loading = self.shared.cell.loading();
        let epoch = self.shared.cell.epoch();
        let result = self.shared.ctx.client().user_metrics(&query).await;
        self.finish("user", epoch, &query, result, |s, m| s.users = Some(m))
    }

    /// Loads content metrics.
    pub async fn fetch_content_metrics(&self, query: MetricsQuery) -> bool {
        let _loading = self.shared.cell.loading();
        let epoch = self.shared.cell.epoch();
        let result = self.shared.ctx.client().content_metrics(&query).await;
        self.finish("content", epoch, &query, result, |s, m| s.content = Some(m))
    }

    /// Loads artist metrics, most streamed first.
    pub async fn fetch_artist_metrics(&self, query: MetricsQuery) -> bool {
        let _loading = self.shared.cell.loading();
        let epoch = self.shared.cell.epoch();
        let result = self.shared.ctx.client().artist_metrics(&query).await;
        self.finish("artist", epoch, &query, result, |s, mut m| {
            m.top_artists = m.ranked();
            s.artists = Some(m);
        })
    }

    /// Loads all three panels concurrently. Returns true if all succeeded.
    pub async fn fetch_all(&self, query: MetricsQuery) -> bool {
        let (users, content, artists) = futures::join!(
            self.fetch_user_metrics(query.clone()),
            self.fetch_content_metrics(query.clone()),
            self.fetch_artist_metrics(query),
        );
        users && content && artists
    }

    /// Reloads all panels with the last query, or the default one.
    pub async fn refresh(&self) -> bool {
        let query = self.shared.cell.read(|s| s.query.clone()).unwrap_or_default();
        self.fetch_all(query).await
    }

    /// Drops all cached metrics.
    pub fn reset(&self) {
        self.shared.cell.reset(MetricsSnapshot::default());
    }
}

impl std::fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsStore")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
