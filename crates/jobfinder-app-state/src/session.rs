//! Current-user session.
//!
//! The in-memory user and the persisted `token`/`user` keys change
//! together: every transition writes storage while holding the store's
//! write lock, so no reader sees one without the other.

use jobfinder_api::{ApiClient, Profile, ProfileUpdate, User};
use jobfinder_storage::{Bridge, keys};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::navigation::Navigation;
use crate::route::AppRoute;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Store<Option<User>>,
    bridge: Bridge,
}

impl SessionStore {
    /// A store with no active session. Use [`SessionStore::restore`] to pick
    /// up a persisted one.
    pub fn new(bridge: Bridge) -> Self {
        Self {
            state: Store::new(None),
            bridge,
        }
    }

    pub fn state(&self) -> &Store<Option<User>> {
        &self.state
    }

    pub fn current(&self) -> Option<User> {
        self.state.get()
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .with(|user| user.as_ref().map(|user| user.token.clone()))
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.with(Option::is_some)
    }

    /// Start a session for `user`.
    ///
    /// Persists the token and the full record, then publishes the user.
    /// Administrators are sent to the admin area.
    pub fn login(&self, user: User) -> Result<Navigation> {
        if user.token.trim().is_empty() {
            return Err(AppError::MissingToken);
        }
        let is_admin = user.is_admin;
        let email = user.email.clone();

        self.state.try_update(|current| {
            persist_session(&self.bridge, &user)?;
            *current = Some(user);
            Ok::<_, AppError>(true)
        })?;

        info!(%email, is_admin, "session started");
        if is_admin {
            Ok(Navigation::Redirect(AppRoute::Admin { section: None }))
        } else {
            Ok(Navigation::Stay)
        }
    }

    /// End the session. Safe to call with no session active.
    pub fn logout(&self) -> Navigation {
        self.state.update(|current| {
            if let Some(user) = current.take() {
                info!(email = %user.email, "session ended");
            }
            clear_session(&self.bridge);
        });
        Navigation::Redirect(AppRoute::Login)
    }

    /// Re-establish a persisted session against the server.
    ///
    /// Fresh server fields are merged over the stored record. Any failure
    /// leaves the session absent and is logged rather than returned.
    pub async fn restore(&self, api: &ApiClient) -> bool {
        let Some(token) = self
            .bridge
            .get(keys::TOKEN)
            .filter(|token| !token.trim().is_empty())
        else {
            debug!("no persisted token; nothing to restore");
            return false;
        };

        let Some(stored) = self.bridge.read_json::<Map<String, Value>>(keys::USER) else {
            debug!("persisted token has no user record; clearing it");
            clear_session(&self.bridge);
            return false;
        };
        if let Err(e) = serde_json::from_value::<User>(Value::Object(stored.clone())) {
            warn!(error = %e, "persisted user record is malformed; clearing session");
            clear_session(&self.bridge);
            return false;
        }

        let fresh = match api.current_user(&token).await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "session restore failed");
                if e.is_unauthorized() {
                    clear_session(&self.bridge);
                }
                return false;
            }
        };

        let user = match merge_user(stored, fresh, &token) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "restored user record is malformed");
                return false;
            }
        };

        match self.login(user) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "failed to persist restored session");
                false
            }
        }
    }

    /// Shallow-merge `update` into the current profile and persist the
    /// result. Does nothing without an active session.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        let changed = self.state.try_update(|current| {
            let Some(user) = current.as_mut() else {
                return Ok(false);
            };
            user.profile
                .get_or_insert_with(Profile::default)
                .apply(update);
            self.bridge.write_json(keys::USER, user)?;
            Ok::<_, AppError>(true)
        })?;

        if !changed {
            debug!("no active session; profile update ignored");
        }
        Ok(())
    }
}

/// Write the token and then the record. If the record write fails the token
/// key goes back to what it held before.
fn persist_session(bridge: &Bridge, user: &User) -> Result<()> {
    let previous_token = bridge.get(keys::TOKEN);
    bridge.set(keys::TOKEN, &user.token)?;
    if let Err(e) = bridge.write_json(keys::USER, user) {
        let rollback = match &previous_token {
            Some(token) => bridge.set(keys::TOKEN, token),
            None => bridge.remove(keys::TOKEN),
        };
        if let Err(rollback) = rollback {
            warn!(error = %rollback, "failed to roll back persisted token");
        }
        return Err(e.into());
    }
    Ok(())
}

fn clear_session(bridge: &Bridge) {
    for key in [keys::TOKEN, keys::USER] {
        if let Err(e) = bridge.remove(key) {
            warn!(key, error = %e, "failed to clear persisted session key");
        }
    }
}

/// Server fields win; the persisted token is kept when the server sends
/// none.
fn merge_user(
    mut stored: Map<String, Value>,
    mut fresh: Map<String, Value>,
    token: &str,
) -> serde_json::Result<User> {
    // Server records say `_id`, persisted ones `id`; both at once is a
    // duplicate field.
    for record in [&mut stored, &mut fresh] {
        if let Some(id) = record.remove("_id") {
            record.insert("id".to_string(), id);
        }
    }
    stored.extend(fresh);
    let mut user: User = serde_json::from_value(Value::Object(stored))?;
    if user.token.trim().is_empty() {
        user.token = token.to_string();
    }
    Ok(user)
}
