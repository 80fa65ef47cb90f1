//! Catalog records and the payloads used to moderate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Identified;

/// Kind of catalog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A single track.
    Track,
    /// An album or EP.
    Album,
    /// An editorial or user playlist.
    Playlist,
    /// A podcast show.
    Podcast,
    /// A podcast episode.
    Episode,
}

/// Effective state of a catalog item as seen by listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentState {
    /// Live and streamable.
    #[default]
    Published,
    /// Waiting for its publish date.
    Scheduled,
    /// Blocked by an administrator.
    Blocked,
    /// Past its unpublish date.
    Unavailable,
}

/// A catalog item (track, album, playlist, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Kind of content.
    pub content_type: ContentType,
    /// Primary artist name.
    #[serde(default)]
    pub artist: Option<String>,
    /// Whether an administrator blocked the item.
    #[serde(default)]
    pub blocked_by_admin: bool,
    /// Reason recorded with the block.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Effective state reported by the backend.
    #[serde(default)]
    pub effective_state: ContentState,
    /// When the item goes live.
    #[serde(default)]
    pub publish_at: Option<DateTime<Utc>>,
    /// When the item stops being available.
    #[serde(default)]
    pub unpublish_at: Option<DateTime<Utc>>,
    /// ISO 3166-1 alpha-2 codes where the item is available. Empty means worldwide.
    #[serde(default)]
    pub available_regions: Vec<String>,
    /// Last modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    /// Derives the effective state from the moderation flags and schedule.
    ///
    /// An admin block wins over everything, then a future publish date, then a
    /// past unpublish date.
    pub fn derive_state(&self, now: DateTime<Utc>) -> ContentState {
        if self.blocked_by_admin {
            return ContentState::Blocked;
        }
        if self.publish_at.is_some_and(|at| at > now) {
            return ContentState::Scheduled;
        }
        if self.unpublish_at.is_some_and(|at| at <= now) {
            return ContentState::Unavailable;
        }
        ContentState::Published
    }

    /// Marks the item as blocked.
    pub fn block(&mut self, reason: Option<String>) {
        self.blocked_by_admin = true;
        self.block_reason = reason;
        self.effective_state = ContentState::Blocked;
    }

    /// Lifts an admin block and recomputes the effective state.
    pub fn unblock(&mut self, now: DateTime<Utc>) {
        self.blocked_by_admin = false;
        self.block_reason = None;
        self.effective_state = self.derive_state(now);
    }

    /// Applies a new schedule and recomputes the effective state.
    pub fn reschedule(&mut self, schedule: &ScheduleRequest, now: DateTime<Utc>) {
        self.publish_at = Some(schedule.publish_at);
        self.unpublish_at = schedule.unpublish_at;
        self.effective_state = self.derive_state(now);
    }

    /// Applies the non-empty fields of an update.
    pub fn apply_update(&mut self, update: &CatalogUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(artist) = &update.artist {
            self.artist = Some(artist.clone());
        }
    }

    /// Returns true if listeners in `region` can stream this item.
    pub fn is_available_in(&self, region: &str) -> bool {
        self.available_regions.is_empty()
            || self
                .available_regions
                .iter()
                .any(|r| r.eq_ignore_ascii_case(region))
    }
}

impl Identified for CatalogItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Editable descriptive attributes of a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New primary artist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

/// Request body for blocking a user or a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockRequest {
    /// Why the resource is being blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Publication window for a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// When the item goes live.
    pub publish_at: DateTime<Utc>,
    /// When the item is withdrawn, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpublish_at: Option<DateTime<Utc>>,
}

/// Regional availability of a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    /// ISO 3166-1 alpha-2 codes. Empty means worldwide.
    pub regions: Vec<String>,
}
