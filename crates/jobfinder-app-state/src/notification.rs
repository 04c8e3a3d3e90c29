//! Transient user-facing notifications.
//!
//! Each notification removes itself after its duration elapses. Expiry runs
//! on the ambient tokio runtime; without one, notifications stay until
//! removed by hand.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{Store, WeakStore};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

/// Input to [`NotificationStore::add`]. A missing or zero duration means
/// [`DEFAULT_DURATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Option<Duration>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    state: Store<Vec<Notification>>,
    next_id: Arc<AtomicU64>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered by insertion.
    pub fn state(&self) -> &Store<Vec<Notification>> {
        &self.state
    }

    pub fn list(&self) -> Vec<Notification> {
        self.state.get()
    }

    pub fn len(&self) -> usize {
        self.state.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.state.with(Vec::is_empty)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.state
            .with(|items| items.iter().any(|item| item.id == id))
    }

    pub fn add(&self, new: NewNotification) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let duration = new
            .duration
            .filter(|duration| !duration.is_zero())
            .unwrap_or(DEFAULT_DURATION);

        debug!(%id, kind = %new.kind, ?duration, "notification added");
        self.state.update(|items| {
            items.push(Notification {
                id,
                kind: new.kind,
                message: new.message,
                duration,
            })
        });
        self.schedule_expiry(id, duration);
        id
    }

    /// Returns `false` when `id` is not present.
    pub fn remove(&self, id: NotificationId) -> bool {
        remove_from(&self.state, id)
    }

    pub fn clear(&self) {
        self.state.set(Vec::new());
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification::new(NotificationKind::Success, message))
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification::new(NotificationKind::Error, message))
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification::new(NotificationKind::Info, message))
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification::new(NotificationKind::Warning, message))
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%id, "no async runtime; notification will not expire");
            return;
        };
        let weak: WeakStore<Vec<Notification>> = self.state.downgrade();
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(state) = weak.upgrade() {
                remove_from(&state, id);
            }
        });
    }
}

fn remove_from(state: &Store<Vec<Notification>>, id: NotificationId) -> bool {
    state
        .try_update(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            Ok::<_, std::convert::Infallible>(items.len() != before)
        })
        .unwrap_or(false)
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
