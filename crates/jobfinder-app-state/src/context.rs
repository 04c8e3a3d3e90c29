//! Application context: the one place that owns the API client, storage and
//! every store, and that applies navigation.

use jobfinder_api::{
    ApiClient, ApiRequest, LoginRequest, Plan, ProfileUpdate, SignupRequest, Subscription, User,
};
use jobfinder_storage::Bridge;
use reqwest::Response;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::navigation::{Navigation, RouterState, apply_navigation};
use crate::notification::NotificationStore;
use crate::route::AppRoute;
use crate::session::SessionStore;
use crate::store::Store;
use crate::subscription::SubscriptionStore;

#[derive(Debug, Clone)]
pub struct AppContext {
    api: ApiClient,
    bridge: Bridge,
    session: SessionStore,
    subscription: SubscriptionStore,
    notifications: NotificationStore,
    router: Store<RouterState>,
}

impl AppContext {
    pub fn new(api: ApiClient, bridge: Bridge) -> Self {
        Self {
            session: SessionStore::new(bridge.clone()),
            subscription: SubscriptionStore::new(bridge.clone()),
            notifications: NotificationStore::new(),
            router: Store::default(),
            api,
            bridge,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscription(&self) -> &SubscriptionStore {
        &self.subscription
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn router(&self) -> &Store<RouterState> {
        &self.router
    }

    pub fn route(&self) -> AppRoute {
        self.router.with(|state| state.route.clone())
    }

    /// Apply a navigation post-condition. Session-only routes fall back to
    /// the login view when no session is active. Returns whether the route
    /// changed.
    pub fn navigate(&self, navigation: Navigation) -> bool {
        let navigation = match navigation {
            Navigation::Redirect(route)
                if route.requires_session() && !self.session.is_logged_in() =>
            {
                debug!(path = %route.to_path(), "route needs a session; redirecting to login");
                Navigation::Redirect(AppRoute::Login)
            }
            other => other,
        };
        self.router
            .try_update(|state| Ok::<_, std::convert::Infallible>(apply_navigation(state, navigation)))
            .unwrap_or(false)
    }

    /// Restore any persisted session and refresh billing state. Returns
    /// whether a session was restored.
    pub async fn start(&self) -> bool {
        let restored = self.session.restore(&self.api).await;
        self.refresh_subscription().await;
        restored
    }

    /// Create an account. When the server answers with a usable session the
    /// user is logged in straight away.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<User>> {
        let response = self.api.signup(request).await?;
        let Some(user) = response.into_user().filter(|user| !user.token.is_empty()) else {
            info!(email = %request.email, "account created; login required");
            return Ok(None);
        };
        self.start_session(user).await.map(Some)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        let response = self.api.login(request).await?;
        let user = response.into_user().ok_or(AppError::MissingUser)?;
        self.start_session(user).await
    }

    pub fn logout(&self) {
        let navigation = self.session.logout();
        self.subscription.reset();
        self.navigate(navigation);
    }

    /// Re-check billing state for the current session. Without a session the
    /// free default applies.
    pub async fn refresh_subscription(&self) -> bool {
        let Some(token) = self.session.token() else {
            self.subscription.reset();
            return false;
        };
        self.subscription.check_status(&self.api, &token).await
    }

    pub async fn subscribe(&self, plan: Plan, months: u32) -> Result<Subscription> {
        let token = self.session.token().ok_or(AppError::NotAuthenticated)?;
        Ok(self
            .subscription
            .subscribe(&self.api, &token, plan, months)
            .await?)
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        self.session.update_profile(update)
    }

    /// Send an authenticated request with the current session's token.
    ///
    /// Fails with [`AppError::NotAuthenticated`] before touching the network
    /// when there is no session. A 401 ends the session, sends the router to
    /// the login view and fails with [`AppError::SessionExpired`].
    pub async fn fetch_with_auth(&self, request: &ApiRequest) -> Result<Response> {
        let token = self.session.token().ok_or(AppError::NotAuthenticated)?;
        match self.api.send_authorized(request, &token).await {
            Ok(response) => Ok(response),
            Err(e) if e.is_unauthorized() => {
                warn!(path = %request.path, "token rejected; ending session");
                self.logout();
                Err(AppError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn start_session(&self, user: User) -> Result<User> {
        let navigation = self.session.login(user.clone())?;
        self.navigate(navigation);
        self.refresh_subscription().await;
        Ok(user)
    }
}
