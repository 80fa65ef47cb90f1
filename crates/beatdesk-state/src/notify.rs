//! Notification bridge.
//!
//! Stores report outcomes through the [`Notify`] trait. [`Toaster`] is the
//! in-process implementation a view layer renders from: it keeps a bounded
//! list of transient toasts and broadcasts every change.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of toasts shown at once.
pub const DEFAULT_TOAST_LIMIT: usize = 5;

/// Default toast lifetime.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Capacity of the toast event channel.
const EVENT_CAPACITY: usize = 64;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    /// Neutral information.
    #[default]
    Default,
    /// A completed action.
    Success,
    /// A failure.
    Destructive,
}

/// A message to surface to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Headline.
    pub title: String,
    /// Optional body text.
    pub description: Option<String>,
    /// Visual style.
    pub variant: ToastVariant,
}

impl Toast {
    /// A neutral toast.
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
        }
    }

    /// A success toast.
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Success,
            ..Self::info(title)
        }
    }

    /// A failure toast with the error message as description.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::info(title)
        }
        .with_description(description)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Sink for store outcomes.
pub trait Notify: Send + Sync {
    /// Surfaces `toast` to the operator.
    fn notify(&self, toast: Toast);
}

/// A toast currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    /// Unique identifier, used to dismiss it.
    pub id: String,
    /// The message.
    pub toast: Toast,
    /// When it disappears on its own.
    pub expires_at: Instant,
}

/// Toast list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    /// A toast appeared.
    Shown(ActiveToast),
    /// A toast went away (dismissed, expired or evicted).
    Dismissed {
        /// Identifier of the removed toast.
        id: String,
    },
}

/// Bounded list of transient toasts.
///
/// When the limit is reached the oldest toast is evicted to make room.
#[derive(Debug)]
pub struct Toaster {
    toasts: Mutex<VecDeque<ActiveToast>>,
    limit: usize,
    duration: Duration,
    events: broadcast::Sender<ToastEvent>,
}

impl Toaster {
    /// Creates a toaster showing at most `limit` toasts for `duration` each.
    pub fn new(limit: usize, duration: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            toasts: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
            duration,
            events,
        }
    }

    /// Shows a toast and returns its identifier.
    pub fn show(&self, toast: Toast) -> String {
        let active = ActiveToast {
            id: uuid::Uuid::new_v4().to_string(),
            toast,
            expires_at: Instant::now() + self.duration,
        };
        let id = active.id.clone();

        let evicted: Vec<ActiveToast> = {
            let mut toasts = self.toasts.lock();
            toasts.push_back(active.clone());
            let excess = toasts.len().saturating_sub(self.limit);
            toasts.drain(..excess).collect()
        };

        for old in evicted {
            debug!(toast_id = %old.id, "Toast evicted");
            let _ = self.events.send(ToastEvent::Dismissed { id: old.id });
        }
        debug!(toast_id = %id, title = %active.toast.title, "Toast shown");
        let _ = self.events.send(ToastEvent::Shown(active));
        id
    }

    /// Removes a toast. Returns false if it was already gone.
    pub fn dismiss(&self, id: &str) -> bool {
        let removed = {
            let mut toasts = self.toasts.lock();
            let index = toasts.iter().position(|t| t.id == id);
            index.and_then(|i| toasts.remove(i))
        };
        match removed {
            Some(toast) => {
                let _ = self.events.send(ToastEvent::Dismissed { id: toast.id });
                true
            }
            None => false,
        }
    }

    /// Removes every toast.
    pub fn dismiss_all(&self) {
        let removed: Vec<ActiveToast> = self.toasts.lock().drain(..).collect();
        for toast in removed {
            let _ = self.events.send(ToastEvent::Dismissed { id: toast.id });
        }
    }

    /// Removes toasts that expired by now. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Removes toasts that expired by `now`.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let expired: Vec<ActiveToast> = {
            let mut toasts = self.toasts.lock();
            let (expired, live): (VecDeque<_>, VecDeque<_>) =
                toasts.drain(..).partition(|t| t.expires_at <= now);
            *toasts = live;
            expired.into_iter().collect()
        };
        for toast in &expired {
            let _ = self.events.send(ToastEvent::Dismissed {
                id: toast.id.clone(),
            });
        }
        expired.len()
    }

    /// Toasts currently shown, oldest first.
    pub fn active(&self) -> Vec<ActiveToast> {
        self.toasts.lock().iter().cloned().collect()
    }

    /// Number of toasts currently shown.
    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    /// Returns true if no toast is shown.
    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }

    /// Subscribes to toast changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIMIT, DEFAULT_TOAST_DURATION)
    }
}

impl Notify for Toaster {
    fn notify(&self, toast: Toast) {
        self.show(toast);
    }
}
