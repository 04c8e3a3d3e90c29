//! Request and response types for the Job Finder API.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------- Auth ----------

/// Request body for `POST /users/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub zip_code: String,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from signup and login.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthResponse {
    /// The session user, carrying the top-level token when the user object
    /// has none of its own.
    pub fn into_user(self) -> Option<User> {
        let mut user = self.user?;
        if user.token.is_empty()
            && let Some(token) = self.token
        {
            user.token = token;
        }
        Some(user)
    }
}

// ---------- Users ----------

/// The signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

/// Job-seeker profile attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// Opaque experience records, in display order.
    #[serde(default)]
    pub experience: Vec<Value>,
    /// Opaque education records, in display order.
    #[serde(default)]
    pub education: Vec<Value>,
}

/// A partial profile. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Value>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Profile {
    /// Shallow merge: every field present in `update` replaces ours wholesale.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            first_name,
            last_name,
            title,
            location,
            phone,
            summary,
            skills,
            experience,
            education,
        } = update;

        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
        if title.is_some() {
            self.title = title;
        }
        if location.is_some() {
            self.location = location;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if summary.is_some() {
            self.summary = summary;
        }
        if let Some(skills) = skills {
            self.skills = skills;
        }
        if let Some(experience) = experience {
            self.experience = experience;
        }
        if let Some(education) = education {
            self.education = education;
        }
    }
}

// ---------- Subscriptions ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    #[default]
    Free,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Quarterly,
    Yearly,
    #[default]
    Free,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Quarterly => "quarterly",
            Plan::Yearly => "yearly",
            Plan::Free => "free",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Plan::Monthly),
            "quarterly" => Ok(Plan::Quarterly),
            "yearly" => Ok(Plan::Yearly),
            "free" => Ok(Plan::Free),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

/// Billing state. [`Subscription::default`] is the free, unpaid state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, alias = "startDate")]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default, alias = "endDate")]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// Request body for `POST /users/subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub plan: Plan,
    pub months: u32,
}

// ---------- Jobs ----------

/// A job listing as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub hourly_rate: f64,
    pub address: JobAddress,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAddress {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

// ---------- Errors ----------

/// Error body shape shared by all endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|m| !m.trim().is_empty())
    }
}

/// Some endpoints wrap their payload as `{ "<key>": {...} }`, others do not.
pub(crate) fn unwrap_envelope(mut body: Value, key: &str) -> Value {
    match body.as_object_mut().and_then(|obj| obj.remove(key)) {
        Some(inner) if inner.is_object() => inner,
        Some(inner) => {
            // Not an envelope after all; put the field back.
            if let Some(obj) = body.as_object_mut() {
                obj.insert(key.to_string(), inner);
            }
            body
        }
        None => body,
    }
}

pub(crate) fn into_object(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn auth_response_attaches_top_level_token() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "t0k",
            "user": { "_id": "u1", "email": "dev@example.com", "role": "seeker" }
        }))
        .unwrap();

        let user = response.into_user().expect("user present");
        assert_eq!(user.id, "u1");
        assert_eq!(user.token, "t0k");
        assert_eq!(user.role.as_deref(), Some("seeker"));
        assert!(!user.is_admin);
    }

    #[test]
    fn auth_response_without_user_yields_none() {
        let response: AuthResponse =
            serde_json::from_value(json!({ "message": "check your inbox" })).unwrap();
        assert_eq!(response.into_user(), None);
    }

    #[test]
    fn profile_apply_is_shallow() {
        let mut profile = Profile {
            title: Some("Welder".into()),
            skills: BTreeSet::from(["tig".to_string(), "mig".to_string()]),
            experience: vec![json!({ "company": "Acme" })],
            ..Profile::default()
        };

        profile.apply(ProfileUpdate {
            location: Some("Austin, TX".into()),
            skills: Some(BTreeSet::from(["stick".to_string()])),
            ..ProfileUpdate::default()
        });

        assert_eq!(profile.title.as_deref(), Some("Welder"));
        assert_eq!(profile.location.as_deref(), Some("Austin, TX"));
        assert_eq!(profile.skills, BTreeSet::from(["stick".to_string()]));
        assert_eq!(profile.experience, vec![json!({ "company": "Acme" })]);
    }

    #[test]
    fn default_subscription_is_free_and_unpaid() {
        let subscription = Subscription::default();
        assert_eq!(subscription.status, SubscriptionStatus::Free);
        assert_eq!(subscription.plan, Plan::Free);
        assert!(!subscription.is_paid);
        assert_eq!(subscription.current_period_end, None);
        assert!(!subscription.cancel_at_period_end);
    }

    #[test]
    fn subscription_accepts_legacy_date_fields() {
        let subscription: Subscription = serde_json::from_value(json!({
            "isPaid": true,
            "plan": "yearly",
            "status": "active",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2027-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(subscription.is_paid);
        assert_eq!(subscription.plan, Plan::Yearly);
        assert!(subscription.current_period_end.is_some());
    }

    #[test]
    fn unwrap_envelope_handles_both_shapes() {
        let wrapped = json!({ "subscription": { "isPaid": true } });
        assert_eq!(
            unwrap_envelope(wrapped, "subscription"),
            json!({ "isPaid": true })
        );

        let bare = json!({ "isPaid": false, "plan": "free" });
        assert_eq!(unwrap_envelope(bare.clone(), "subscription"), bare);
    }

    #[test]
    fn error_body_prefers_message_then_error() {
        let body: ApiErrorBody =
            serde_json::from_value(json!({ "message": "", "error": "Bad token" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Bad token"));
    }
}
