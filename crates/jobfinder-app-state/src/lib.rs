//! Client-side application state for Job Finder.
//!
//! [`AppContext`] owns the API client, the storage bridge and the session,
//! subscription, notification and router stores. Every store is a
//! [`Store`]: an observable value with explicit subscribe/unsubscribe.
//! Store operations report where the UI should go as a [`Navigation`]
//! value; the context applies it.

mod context;
mod error;
mod navigation;
mod notification;
mod route;
mod session;
mod store;
mod subscription;

pub use context::AppContext;
pub use error::{AppError, Result};
pub use navigation::{Navigation, RouterState, apply_navigation};
pub use notification::{
    DEFAULT_DURATION, NewNotification, Notification, NotificationId, NotificationKind,
    NotificationStore,
};
pub use route::AppRoute;
pub use session::SessionStore;
pub use store::{ListenerId, Store, WeakStore};
pub use subscription::SubscriptionStore;
