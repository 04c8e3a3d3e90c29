//! Observable value container.
//!
//! A [`Store`] holds one value and a list of listeners. Every write notifies
//! each listener synchronously with the value just written; listeners run
//! after the value lock is released, so they may read the store again.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct StoreInner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    next_listener: AtomicU64,
}

pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

/// Non-owning handle to a [`Store`].
pub struct WeakStore<T> {
    inner: Weak<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for WeakStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> WeakStore<T> {
    pub fn upgrade(&self) -> Option<Store<T>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<T: Clone> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    pub fn set(&self, value: T) {
        let snapshot = {
            let mut guard = self.inner.value.write();
            *guard = value;
            guard.clone()
        };
        self.notify(&snapshot);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut guard = self.inner.value.write();
            f(&mut guard);
            guard.clone()
        };
        self.notify(&snapshot);
    }

    /// Run `f` against a copy of the value while holding the write lock.
    ///
    /// `f` returns whether it changed the copy. The copy is committed and
    /// listeners are notified only on `Ok(true)`; on `Err` the stored value
    /// is untouched. Readers block until `f` finishes, so side effects
    /// performed inside `f` (persisting, say) are never observed half-done.
    pub fn try_update<E>(&self, f: impl FnOnce(&mut T) -> Result<bool, E>) -> Result<bool, E> {
        let snapshot = {
            let mut guard = self.inner.value.write();
            let mut next = guard.clone();
            if !f(&mut next)? {
                return Ok(false);
            }
            *guard = next.clone();
            next
        };
        self.notify(&snapshot);
        Ok(true)
    }

    /// Register a listener. It is called once right away with the current
    /// value, then after every write.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        let listener: Listener<T> = Arc::new(listener);
        self.inner.listeners.lock().push((id, listener.clone()));

        let current = self.get();
        listener(&current);
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn downgrade(&self) -> WeakStore<T> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T: Default + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &*self.inner.value.read())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}
