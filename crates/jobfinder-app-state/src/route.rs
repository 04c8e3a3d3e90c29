use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppRoute {
    #[default]
    Home,
    Login,
    Signup,
    Jobs {
        #[serde(default)]
        job_id: Option<String>,
    },
    Profile,
    Pricing,
    Admin {
        #[serde(default)]
        section: Option<String>,
    },
}

impl AppRoute {
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Pricing => "/pricing".to_string(),
            Self::Jobs { job_id: None } => "/jobs".to_string(),
            Self::Jobs {
                job_id: Some(job_id),
            } => format!("/jobs/{job_id}"),
            Self::Admin { section: None } => "/admin".to_string(),
            Self::Admin {
                section: Some(section),
            } => format!("/admin/{section}"),
        }
    }

    /// Routes that only make sense with an active session.
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Profile | Self::Admin { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::AppRoute;

    #[test]
    fn renders_paths() {
        assert_eq!(AppRoute::Home.to_path(), "/");
        assert_eq!(AppRoute::Login.to_path(), "/login");
        assert_eq!(AppRoute::Jobs { job_id: None }.to_path(), "/jobs");
        assert_eq!(
            AppRoute::Jobs {
                job_id: Some("abc123".to_string())
            }
            .to_path(),
            "/jobs/abc123"
        );
        assert_eq!(AppRoute::Admin { section: None }.to_path(), "/admin");
        assert_eq!(
            AppRoute::Admin {
                section: Some("billing".to_string())
            }
            .to_path(),
            "/admin/billing"
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let value = serde_json::to_value(AppRoute::Admin {
            section: Some("users".to_string()),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "type": "admin", "section": "users" }));
    }

    #[test]
    fn session_only_routes() {
        assert!(AppRoute::Profile.requires_session());
        assert!(AppRoute::Admin { section: None }.requires_session());
        assert!(!AppRoute::Login.requires_session());
    }
}
