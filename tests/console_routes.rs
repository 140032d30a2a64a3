use std::sync::Arc;

use alumni_console::{
    AppState,
    config::Config,
    models::{AnalyticsOverview, Role},
    router::create_router,
    session::{MemorySlotStore, SessionStore, SlotStore},
    test_support::{StubAnalytics, StubAuthenticator, StubConnector, donors, mentors, user},
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Console {
    app: Router,
    connector: Arc<StubConnector>,
}

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "API_BASE_URL" => Some("http://analytics.invalid/api".into()),
        "SESSION_BACKEND" => Some("memory".into()),
        _ => None,
    })
    .unwrap()
}

fn authenticator() -> StubAuthenticator {
    StubAuthenticator::new()
        .with_account("s3cret", user(Role::Admin, "A"), "admin-token")
        .with_account("hunter2", user(Role::Employer, "E"), "employer-token")
}

async fn console_with(slots: Arc<dyn SlotStore>, auth: StubAuthenticator) -> Console {
    let session = Arc::new(SessionStore::new(slots));
    session.load().await;

    let analytics = Arc::new(
        StubAnalytics::new()
            .with_overview(AnalyticsOverview {
                total_alumni: 500,
                ..Default::default()
            })
            .failing_salary()
            .with_donors(donors(3))
            .with_mentors(mentors(3)),
    );
    let connector = Arc::new(StubConnector::new(analytics));
    let state = AppState::new(config(), session, Arc::new(auth), connector.clone());

    Console {
        app: create_router(state),
        connector,
    }
}

async fn console() -> Console {
    console_with(Arc::new(MemorySlotStore::new()), authenticator()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn location_of(app: &Router, uri: &str) -> (StatusCode, Option<String>) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (response.status(), location)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/session/login",
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

#[tokio::test]
async fn anonymous_admin_request_redirects_to_public() {
    let console = console().await;

    let (status, location) = location_of(&console.app, "/admin").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
}

#[tokio::test]
async fn unknown_area_is_not_found() {
    let console = console().await;

    let (status, body) = send(&console.app, "GET", "/reports", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn wrong_password_is_rejected_and_no_session_exists() {
    let console = console().await;

    let (status, body) = login(&console.app, "admin@example.edu", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (_, body) = send(&console.app, "GET", "/session", None).await;
    assert_eq!(body["resp_data"]["user"], Value::Null);
}

#[tokio::test]
async fn blank_credentials_fail_validation() {
    let console = console().await;

    let (status, body) = login(&console.app, "  ", "x").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1000);
}

#[tokio::test]
async fn unreachable_auth_service_is_a_bad_gateway() {
    let console = console_with(
        Arc::new(MemorySlotStore::new()),
        authenticator().unavailable(),
    )
    .await;

    let (status, _) = login(&console.app, "admin@example.edu", "s3cret").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn admin_login_enters_admin_dashboard() {
    let console = console().await;

    let (status, body) = login(&console.app, "admin@example.edu", "s3cret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["redirect"], "/admin");
    assert_eq!(body["resp_data"]["user"]["role"], "admin");
    assert!(body["resp_data"].get("token").is_none());

    let (status, body) = send(&console.app, "GET", "/admin", None).await;
    assert_eq!(status, StatusCode::OK);
    let view = &body["resp_data"]["view"];
    assert_eq!(view["loading"], false);
    assert_eq!(view["overview"]["total_alumni"], 500);
    assert_eq!(view["notifications"], json!([]));
    assert_eq!(body["resp_data"]["user"]["full_name"], "A");

    assert_eq!(console.connector.tokens(), ["admin-token"]);
}

#[tokio::test]
async fn view_endpoint_reports_the_mounted_dashboard() {
    let console = console().await;
    login(&console.app, "admin@example.edu", "s3cret").await;

    let (_, entered) = send(&console.app, "GET", "/admin", None).await;
    let (status, viewed) = send(&console.app, "GET", "/admin/view", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        entered["resp_data"]["mount_id"],
        viewed["resp_data"]["mount_id"]
    );

    let (_, reentered) = send(&console.app, "GET", "/admin", None).await;
    assert_ne!(
        entered["resp_data"]["mount_id"],
        reentered["resp_data"]["mount_id"]
    );
}

#[tokio::test]
async fn leaving_an_area_discards_its_view() {
    let console = console().await;
    login(&console.app, "admin@example.edu", "s3cret").await;
    let (_, entered) = send(&console.app, "GET", "/admin", None).await;

    let (status, _) = send(&console.app, "DELETE", "/admin", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, viewed) = send(&console.app, "GET", "/admin/view", None).await;
    assert_ne!(
        entered["resp_data"]["mount_id"],
        viewed["resp_data"]["mount_id"]
    );
}

#[tokio::test]
async fn role_mismatch_redirects_even_when_signed_in() {
    let console = console().await;
    login(&console.app, "employer@example.edu", "hunter2").await;

    let (status, location) = location_of(&console.app, "/admin").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    let (status, _) = send(&console.app, "GET", "/employer", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn landing_lists_reachable_areas() {
    let console = console().await;
    login(&console.app, "employer@example.edu", "hunter2").await;

    let (status, body) = send(&console.app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    let allowed: Vec<_> = body["resp_data"]["areas"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|link| link["allowed"] == true)
        .map(|link| link["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(allowed, ["/", "/employer"]);
}

#[tokio::test]
async fn logout_closes_every_area_and_is_idempotent() {
    let console = console().await;
    login(&console.app, "admin@example.edu", "s3cret").await;

    let (status, _) = send(&console.app, "POST", "/session/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&console.app, "POST", "/session/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, location) = location_of(&console.app, "/admin").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
}

#[tokio::test]
async fn session_survives_a_console_restart() {
    let slots: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::new());
    let first = console_with(slots.clone(), authenticator()).await;
    login(&first.app, "admin@example.edu", "s3cret").await;

    let restarted = console_with(slots, authenticator()).await;
    let (_, body) = send(&restarted.app, "GET", "/session", None).await;

    assert_eq!(body["resp_data"]["user"]["email"], "admin@example.edu");
    let (status, _) = send(&restarted.app, "GET", "/admin", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_check_responds() {
    let console = console().await;

    let (status, body) = send(&console.app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["status"], "ok");
}
