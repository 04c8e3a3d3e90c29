use jobfinder_api::{
    ApiClient, ApiConfig, ApiError, ApiRequest, AuthScheme, FailureKind, LoginRequest, Plan,
    SignupRequest, SubscribeRequest, SubscriptionStatus,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::new(format!("{}/api", server.uri()))).expect("client builds")
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "dev@example.com".to_string(),
        password: "hunter22".to_string(),
    }
}

#[tokio::test]
async fn login_posts_credentials_and_parses_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({ "email": "dev@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t0k",
            "user": { "_id": "u1", "email": "dev@example.com", "role": "seeker" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).login(&credentials()).await.unwrap();
    assert_eq!(response.token.as_deref(), Some("t0k"));

    let user = response.into_user().unwrap();
    assert_eq!(user.email, "dev@example.com");
    assert_eq!(user.token, "t0k");
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let error = client_for(&server).login(&credentials()).await.unwrap_err();
    assert_eq!(error.to_string(), "Invalid credentials");
    assert_eq!(error.status(), Some(400));
    assert_eq!(error.kind(), FailureKind::Application);
}

#[tokio::test]
async fn signup_failure_without_body_uses_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/signup"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "pw",
            "zipCode": "78701"
        })))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .signup(&SignupRequest {
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            zip_code: "78701".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Signup failed");
    assert_eq!(error.status(), Some(500));
}

#[tokio::test]
async fn subscription_status_sends_bearer_token_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/subscription"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription": {
                "status": "active",
                "plan": "quarterly",
                "isPaid": true,
                "stripeSubscriptionId": "sub_123",
                "cancelAtPeriodEnd": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscription = client_for(&server).subscription_status("t0k").await.unwrap();
    assert!(subscription.is_paid);
    assert_eq!(subscription.plan, Plan::Quarterly);
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscription.stripe_subscription_id.as_deref(), Some("sub_123"));
}

#[tokio::test]
async fn x_auth_token_scheme_uses_its_own_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/subscribe"))
        .and(header("x-auth-token", "t0k"))
        .and(body_json(json!({ "plan": "monthly", "months": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription": { "status": "active", "plan": "monthly", "isPaid": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(
        ApiConfig::new(format!("{}/api", server.uri())).with_auth_scheme(AuthScheme::XAuthToken),
    )
    .unwrap();
    let subscription = client
        .subscribe(
            "t0k",
            &SubscribeRequest {
                plan: Plan::Monthly,
                months: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(subscription.plan, Plan::Monthly);
}

#[tokio::test]
async fn current_user_accepts_bare_and_wrapped_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer wrapped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "email": "dev@example.com", "name": "Dev" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer bare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "dev@example.com", "name": "Bare"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let wrapped = client.current_user("wrapped").await.unwrap();
    assert_eq!(wrapped.get("name"), Some(&json!("Dev")));

    let bare = client.current_user("bare").await.unwrap();
    assert_eq!(bare.get("name"), Some(&json!("Bare")));
}

#[tokio::test]
async fn unauthorized_status_is_classified_as_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/saved"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .send_authorized(&ApiRequest::get("/jobs/saved"), "stale")
        .await
        .unwrap_err();
    assert!(error.is_unauthorized());
    assert_eq!(error.kind(), FailureKind::Authentication);
    assert_eq!(error.to_string(), "Session expired");
}

#[tokio::test]
async fn send_authorized_forwards_method_body_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs/42/apply"))
        .and(header("authorization", "Bearer t0k"))
        .and(header("x-client", "jobfinder-cli"))
        .and(body_json(json!({ "note": "available weekends" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::post("/jobs/42/apply", json!({ "note": "available weekends" }))
        .with_header("x-client", "jobfinder-cli");
    let response = client_for(&server)
        .send_authorized(&request, "t0k")
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn caller_auth_header_is_replaced_by_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/saved"))
        .respond_with(|req: &wiremock::Request| {
            let values: Vec<_> = req.headers.get_all("authorization").iter().collect();
            if values.len() == 1 && values[0] == "Bearer t0k" {
                ResponseTemplate::new(200)
            } else {
                ResponseTemplate::new(400)
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::get("/jobs/saved").with_header("Authorization", "Bearer forged");
    let response = client_for(&server)
        .send_authorized(&request, "t0k")
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn empty_token_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .subscription_status("")
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::MissingToken));
}

#[tokio::test]
async fn connection_refused_is_a_network_failure() {
    // Port 9 (discard) is essentially never listening on loopback.
    let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9/api")).unwrap();
    let error = client.login(&credentials()).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::Network);
}
