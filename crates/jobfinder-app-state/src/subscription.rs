//! Billing state.
//!
//! [`Subscription::default`] is the free, unpaid state; any failed status
//! check falls back to it.

use jobfinder_api::{ApiClient, ApiError, Plan, SubscribeRequest, Subscription};
use jobfinder_storage::{Bridge, keys};
use tracing::{debug, info, warn};

use crate::store::Store;

#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    state: Store<Subscription>,
    bridge: Bridge,
}

impl SubscriptionStore {
    /// Starts from the persisted snapshot when one parses.
    pub fn new(bridge: Bridge) -> Self {
        let initial = bridge
            .read_json::<Subscription>(keys::SUBSCRIPTION)
            .unwrap_or_default();
        debug!(plan = %initial.plan, is_paid = initial.is_paid, "subscription loaded");
        Self {
            state: Store::new(initial),
            bridge,
        }
    }

    pub fn state(&self) -> &Store<Subscription> {
        &self.state
    }

    pub fn current(&self) -> Subscription {
        self.state.get()
    }

    pub fn is_paid(&self) -> bool {
        self.state.with(|subscription| subscription.is_paid)
    }

    /// Ask the server for the current subscription. Returns the paid flag;
    /// on any failure the store is reset and `false` is returned.
    pub async fn check_status(&self, api: &ApiClient, token: &str) -> bool {
        match api.subscription_status(token).await {
            Ok(subscription) => {
                let is_paid = subscription.is_paid;
                self.assign(subscription);
                is_paid
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "subscription check failed; resetting to free");
                self.reset();
                false
            }
        }
    }

    /// Start or change a paid plan. The store is left untouched on failure.
    pub async fn subscribe(
        &self,
        api: &ApiClient,
        token: &str,
        plan: Plan,
        months: u32,
    ) -> Result<Subscription, ApiError> {
        let subscription = api
            .subscribe(token, &SubscribeRequest { plan, months })
            .await?;
        info!(%plan, months, is_paid = subscription.is_paid, "subscription updated");
        self.assign(subscription.clone());
        Ok(subscription)
    }

    pub fn reset(&self) {
        self.assign(Subscription::default());
    }

    fn assign(&self, subscription: Subscription) {
        if let Err(e) = self.bridge.write_json(keys::SUBSCRIPTION, &subscription) {
            warn!(error = %e, "failed to persist subscription");
        }
        self.state.set(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfinder_api::SubscriptionStatus;
    use jobfinder_storage::{KeyValueStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn paid() -> Subscription {
        Subscription {
            status: SubscriptionStatus::Active,
            plan: Plan::Yearly,
            is_paid: true,
            ..Subscription::default()
        }
    }

    #[test]
    fn loads_persisted_snapshot() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set(keys::SUBSCRIPTION, &serde_json::to_string(&paid()).unwrap())
            .unwrap();

        let store = SubscriptionStore::new(Bridge::from_shared(backing));
        assert_eq!(store.current(), paid());
        assert!(store.is_paid());
    }

    #[test]
    fn corrupt_snapshot_yields_default_and_is_cleared() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(keys::SUBSCRIPTION, "{not json").unwrap();

        let store = SubscriptionStore::new(Bridge::from_shared(backing.clone()));
        assert_eq!(store.current(), Subscription::default());
        assert_eq!(backing.get(keys::SUBSCRIPTION).unwrap(), None);
    }

    #[test]
    fn reset_mirrors_default_to_storage() {
        let backing = Arc::new(MemoryStore::new());
        let store = SubscriptionStore::new(Bridge::from_shared(backing.clone()));
        store.assign(paid());
        store.reset();

        let persisted = backing.get(keys::SUBSCRIPTION).unwrap().unwrap();
        let persisted: Subscription = serde_json::from_str(&persisted).unwrap();
        assert_eq!(persisted, Subscription::default());
        assert!(!store.is_paid());
    }

    #[test]
    fn detached_bridge_still_tracks_state() {
        let store = SubscriptionStore::new(Bridge::detached());
        store.assign(paid());
        assert!(store.is_paid());
    }
}
