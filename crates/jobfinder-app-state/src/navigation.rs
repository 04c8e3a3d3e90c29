use serde::{Deserialize, Serialize};

use crate::route::AppRoute;

/// Where the UI should go after a state transition.
///
/// Stores return this instead of navigating themselves; the caller decides
/// when to apply it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "route", rename_all = "snake_case")]
pub enum Navigation {
    #[default]
    Stay,
    Redirect(AppRoute),
}

impl Navigation {
    pub fn route(&self) -> Option<&AppRoute> {
        match self {
            Navigation::Stay => None,
            Navigation::Redirect(route) => Some(route),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouterState {
    pub route: AppRoute,
    pub route_history: Vec<AppRoute>,
}

/// Apply `navigation`, returning whether the current route changed.
pub fn apply_navigation(state: &mut RouterState, navigation: Navigation) -> bool {
    match navigation {
        Navigation::Stay => false,
        Navigation::Redirect(route) => {
            if route == state.route {
                return false;
            }
            let previous = std::mem::replace(&mut state.route, route);
            state.route_history.push(previous);
            true
        }
    }
}
