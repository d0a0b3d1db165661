//! Mock API tests for the authenticated client.
//!
//! These tests use wiremock to simulate the marketplace backend and check
//! token attachment, refresh-and-replay, refresh coalescing and session
//! termination without network access.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use courseware_core::error::{Error, TransportError};
use courseware_core::models::{CourseSummary, UserUpdate};
use courseware_core::{
    ApiUrl, CredentialStore, LoginCredentials, MemoryStore, RecordingNavigator, SessionState,
    StorageKey,
};
use courseware_http::{AuthenticatedHttpClient, ClientConfig, CourseQuery, RequestDescriptor};

const BASE: &str = "/api/v1";
const ME: &str = "/api/v1/courses/my-courses/";
const REFRESH: &str = "/api/v1/accounts/token/refresh/";

struct Harness {
    server: MockServer,
    store: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
    client: AuthenticatedHttpClient,
}

async fn harness(access: Option<&str>, refresh: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::with_tokens(access, refresh));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = client_for(&server, store.clone(), navigator.clone());
    Harness {
        server,
        store,
        navigator,
        client,
    }
}

fn client_for(
    server: &MockServer,
    store: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
) -> AuthenticatedHttpClient {
    let api_url = ApiUrl::new(format!("{}{}", server.uri(), BASE)).unwrap();
    AuthenticatedHttpClient::new(ClientConfig::new(api_url), store, navigator).unwrap()
}

fn user_json(verified: bool) -> serde_json::Value {
    json!({
        "id": "0b6f3c8e-2f1a-4f6b-9a3e-6c1d2e3f4a5b",
        "email": "sam@example.com",
        "first_name": "Sam",
        "last_name": "Lee",
        "role": "STUDENT",
        "email_verified": verified
    })
}

fn empty_list() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] }))
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "detail": "Given token not valid for any token type",
        "code": "token_not_valid"
    }))
}

async fn mount_refresh(server: &MockServer, refresh: &str, access: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "tokens": { "access": access } }
        })))
        .expect(calls)
        .mount(server)
        .await;
}

// ============================================================================
// Token attachment
// ============================================================================

#[tokio::test]
async fn attaches_stored_bearer_token() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(empty_list())
        .expect(1)
        .mount(&h.server)
        .await;

    let courses = h.client.my_courses().await.unwrap();
    assert!(courses.is_empty());
    assert_eq!(h.client.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn sends_no_authorization_without_token() {
    let h = harness(None, None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/categories/"))
        .respond_with(empty_list())
        .mount(&h.server)
        .await;

    h.client.categories().await.unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert_eq!(h.client.session_state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn caller_supplied_authorization_is_ignored() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(empty_list())
        .expect(1)
        .mount(&h.server)
        .await;

    let descriptor = RequestDescriptor::get("/courses/my-courses/")
        .header("Authorization", "Bearer forged")
        .header("X-Request-Source", "tests");
    h.client.request(descriptor).await.unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get_all("authorization").iter().count(), 1);
    assert_eq!(requests[0].headers["x-request-source"], "tests");
}

#[tokio::test]
async fn malformed_header_is_invalid_input() {
    let h = harness(Some("A1"), Some("R1")).await;

    let descriptor = RequestDescriptor::get("/courses/my-courses/").header("bad header", "x");
    let err = h.client.request(descriptor).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)), "{:?}", err);
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Refresh and replay
// ============================================================================

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .expect(1)
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    h.client.my_courses().await.unwrap();

    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
    assert_eq!(h.store.refresh_token().unwrap().unwrap().as_str(), "R1");
    assert!(h.navigator.routes().is_empty());
    assert_eq!(h.client.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn replay_keeps_method_query_and_body() {
    let h = harness(Some("A1"), Some("R1")).await;
    let body = json!({ "rating": 5, "review_text": "Great" });

    Mock::given(method("POST"))
        .and(path("/api/v1/courses/courses/c1/reviews/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/courses/courses/c1/reviews/"))
        .and(header("authorization", "Bearer A2"))
        .and(query_param("source", "cli"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    let descriptor = RequestDescriptor::post("/courses/courses/c1/reviews/")
        .query("source", "cli")
        .body(body);
    let response = h.client.request(descriptor).await.unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn bare_refresh_response_is_accepted() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": "A2", "refresh": "R2" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.my_courses().await.unwrap();

    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
    assert_eq!(h.store.refresh_token().unwrap().unwrap().as_str(), "R2");
}

#[tokio::test]
async fn concurrent_rejections_share_one_refresh() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .expect(3)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "tokens": { "access": "A2" } } }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let (a, b, c) = tokio::join!(
        h.client.my_courses(),
        h.client.my_courses(),
        h.client.my_courses()
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
}

#[tokio::test]
async fn rejection_after_refresh_skips_second_exchange() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    h.client.my_courses().await.unwrap();
    // Sent with A2 straight from the store.
    h.client.my_courses().await.unwrap();
}

#[tokio::test]
async fn late_rejection_of_old_token_reuses_refreshed_token() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/categories/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized().set_delay(Duration::from_millis(600)))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/categories/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(empty_list())
        .expect(1)
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    // The slow request is answered only after the fast one has refreshed.
    let (fast, slow) = tokio::join!(h.client.categories(), h.client.my_courses());

    assert!(fast.is_ok(), "{:?}", fast);
    assert!(slow.is_ok(), "{:?}", slow);
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
    assert_eq!(h.client.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn late_rejection_after_sign_out_does_not_redirect_again() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/categories/"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized().set_delay(Duration::from_millis(600)))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;

    let (fast, slow) = tokio::join!(h.client.categories(), h.client.my_courses());

    assert!(matches!(fast, Err(Error::AuthExpired)), "{:?}", fast);
    assert!(matches!(slow, Err(Error::AuthExpired)), "{:?}", slow);
    assert_eq!(h.navigator.routes(), vec!["/login"]);
    assert_eq!(h.client.session_state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn login_then_expired_token_is_refreshed_and_replayed() {
    let h = harness(None, None).await;

    let mut user = user_json(true);
    user["email"] = json!("a@b.com");
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login/"))
        .and(body_json(json!({ "email": "a@b.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": user, "tokens": { "access": "A1", "refresh": "R1" } }
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(body_json(json!({ "refresh": "R1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [course_json("Ownership")]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client
        .login(&LoginCredentials::new("a@b.com", "x"))
        .await
        .unwrap();
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A1");

    let courses = h.client.my_courses().await.unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Ownership");
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
    assert_eq!(h.store.refresh_token().unwrap().unwrap().as_str(), "R1");
    assert_eq!(h.client.session_state(), SessionState::Authenticated);
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn replay_rejected_again_is_api_error_without_teardown() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    let err = h.client.my_courses().await.unwrap_err();

    assert!(matches!(err, Error::Api(ref e) if e.status == 401), "{:?}", err);
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn already_retried_descriptor_never_refreshes() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 0).await;

    let descriptor = RequestDescriptor::get("/courses/my-courses/").retried();
    let err = h.client.request(descriptor).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A1");
}

#[tokio::test]
async fn public_request_surfaces_401_without_refresh() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 0).await;

    let err = h
        .client
        .login(&LoginCredentials::new("sam@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );
    assert!(h.navigator.routes().is_empty());
}

// ============================================================================
// Session termination
// ============================================================================

#[tokio::test]
async fn rejected_refresh_ends_session() {
    let h = harness(Some("A1"), Some("R1")).await;
    h.store
        .set(StorageKey::User, &user_json(true).to_string())
        .unwrap();

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.my_courses().await.unwrap_err();

    assert!(matches!(err, Error::AuthExpired));
    for key in StorageKey::ALL {
        assert!(!h.store.contains(key), "{} still stored", key);
    }
    assert_eq!(h.navigator.routes(), vec!["/login"]);
    assert_eq!(h.client.session_state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn concurrent_failures_redirect_once() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(unauthorized().set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&h.server)
        .await;

    let (a, b, c) = tokio::join!(
        h.client.my_courses(),
        h.client.my_courses(),
        h.client.my_courses()
    );
    for result in [a, b, c] {
        assert!(matches!(result, Err(Error::AuthExpired)));
    }
    assert_eq!(h.navigator.routes(), vec!["/login"]);
}

#[tokio::test]
async fn missing_refresh_token_ends_session_without_exchange() {
    let h = harness(Some("A1"), None).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 0).await;

    let err = h.client.my_courses().await.unwrap_err();

    assert!(matches!(err, Error::AuthExpired));
    assert!(!h.store.contains(StorageKey::AccessToken));
    assert_eq!(h.navigator.last().as_deref(), Some("/login"));
}

#[tokio::test]
async fn blank_refresh_token_counts_as_missing() {
    let h = harness(Some("A1"), Some("   ")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    mount_refresh(&h.server, "R1", "A2", 0).await;

    let err = h.client.my_courses().await.unwrap_err();
    assert!(matches!(err, Error::AuthExpired));
    assert_eq!(h.navigator.routes().len(), 1);
}

#[tokio::test]
async fn malformed_refresh_response_ends_session() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&h.server)
        .await;

    let err = h.client.my_courses().await.unwrap_err();
    assert!(matches!(err, Error::AuthExpired));
    assert!(!h.store.contains(StorageKey::RefreshToken));
}

#[tokio::test]
async fn explicit_refresh_updates_access_token() {
    let h = harness(Some("A1"), Some("R1")).await;
    mount_refresh(&h.server, "R1", "A2", 1).await;

    h.client.refresh_session().await.unwrap();
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A2");
}

// ============================================================================
// Error classification
// ============================================================================

#[tokio::test]
async fn field_errors_become_validation_error() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/enrollments/enrollments/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": {
                "message": "Invalid input.",
                "details": { "course": ["You are already enrolled in this course."] }
            }
        })))
        .mount(&h.server)
        .await;

    let err = h.client.enroll(uuid::Uuid::nil()).await.unwrap_err();
    match err {
        Error::Validation(v) => {
            assert_eq!(v.status, 400);
            assert_eq!(v.field("course"), ["You are already enrolled in this course."]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_keeps_payload() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/admin/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": { "message": "Internal server error", "details": { "trace": "x" } }
        })))
        .mount(&h.server)
        .await;

    let err = h.client.admin_analytics().await.unwrap_err();
    match err {
        Error::Api(e) => {
            assert_eq!(e.status, 500);
            assert_eq!(e.message.as_deref(), Some("Internal server error"));
            assert_eq!(e.payload["error"]["details"]["trace"], "x");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(empty_list().set_delay(Duration::from_millis(500)))
        .mount(&h.server)
        .await;

    let descriptor =
        RequestDescriptor::get("/courses/my-courses/").timeout(Duration::from_millis(50));
    let err = h.client.request(descriptor).await.unwrap_err();
    assert!(
        matches!(err, Error::Network(TransportError::Timeout { duration_ms: 50 })),
        "{:?}",
        err
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let navigator = Arc::new(RecordingNavigator::new());
    let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:1/api/v1").unwrap())
        .with_timeout(Duration::from_secs(2));
    let client = AuthenticatedHttpClient::new(config, store.clone(), navigator.clone()).unwrap();

    let err = client.my_courses().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "{:?}", err);
    assert!(store.contains(StorageKey::AccessToken));
    assert!(navigator.routes().is_empty());
}

// ============================================================================
// Login, logout and profile
// ============================================================================

#[tokio::test]
async fn login_stores_tokens_and_user() {
    let h = harness(None, None).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login/"))
        .and(body_json(json!({ "email": "sam@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": user_json(true),
                "tokens": { "access": "A1", "refresh": "R1" }
            }
        })))
        .mount(&h.server)
        .await;

    let outcome = h
        .client
        .login(&LoginCredentials::new("sam@example.com", "secret"))
        .await
        .unwrap();

    assert_eq!(outcome.route, "/dashboard/student");
    assert_eq!(outcome.user.email, "sam@example.com");
    assert_eq!(h.store.access_token().unwrap().unwrap().as_str(), "A1");
    assert_eq!(h.store.refresh_token().unwrap().unwrap().as_str(), "R1");
    assert_eq!(h.client.current_user().unwrap().unwrap().email, "sam@example.com");
    assert_eq!(h.client.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn login_refuses_unverified_account() {
    let h = harness(None, None).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "user": user_json(false),
                "tokens": { "access": "A1", "refresh": "R1" }
            }
        })))
        .mount(&h.server)
        .await;

    let err = h
        .client
        .login(&LoginCredentials::new("sam@example.com", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EmailNotVerified));
    assert!(!h.store.contains(StorageKey::AccessToken));
}

#[tokio::test]
async fn login_maps_verification_field_error() {
    let h = harness(None, None).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": {
                "message": "Invalid input.",
                "details": { "email": ["Please verify your email address before logging in."] }
            }
        })))
        .mount(&h.server)
        .await;

    let err = h
        .client
        .login(&LoginCredentials::new("sam@example.com", "secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmailNotVerified));
}

#[tokio::test]
async fn logout_clears_store_and_redirects() {
    let h = harness(Some("A1"), Some("R1")).await;
    h.store
        .set(StorageKey::User, &user_json(true).to_string())
        .unwrap();

    h.client.logout().unwrap();

    for key in StorageKey::ALL {
        assert!(!h.store.contains(key), "{} still stored", key);
    }
    assert_eq!(h.navigator.routes(), vec!["/login"]);
    assert_eq!(h.client.session_state(), SessionState::LoggedOut);
    assert!(h.client.current_user().unwrap().is_none());
}

#[tokio::test]
async fn corrupt_cached_user_reads_as_logged_out() {
    let h = harness(Some("A1"), Some("R1")).await;
    h.store.set(StorageKey::User, "{not json").unwrap();

    assert!(h.client.current_user().unwrap().is_none());
    assert!(!h.store.contains(StorageKey::User));
}

#[tokio::test]
async fn profile_update_replaces_cached_user() {
    let h = harness(Some("A1"), Some("R1")).await;
    h.store
        .set(StorageKey::User, &user_json(true).to_string())
        .unwrap();

    let mut updated = user_json(true);
    updated["bio"] = json!("Rustacean");
    Mock::given(method("PATCH"))
        .and(path("/api/v1/accounts/profile/"))
        .and(body_json(json!({ "bio": "Rustacean" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Profile updated successfully",
            "data": updated
        })))
        .mount(&h.server)
        .await;

    let update = UserUpdate {
        bio: Some("Rustacean".to_string()),
        ..Default::default()
    };
    h.client.update_profile(&update).await.unwrap();

    let cached = h.client.current_user().unwrap().unwrap();
    assert_eq!(cached.bio.as_deref(), Some("Rustacean"));
}

#[tokio::test]
async fn empty_profile_update_never_reaches_server() {
    let h = harness(Some("A1"), Some("R1")).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h
        .client
        .update_profile(&UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

// ============================================================================
// Pagination
// ============================================================================

fn course_json(title: &str) -> serde_json::Value {
    json!({
        "id": uuid::Uuid::new_v4(),
        "title": title,
        "difficulty_level": "BEGINNER",
        "status": "PUBLISHED",
        "price": "0.00",
        "is_free": true
    })
}

#[tokio::test]
async fn stream_follows_next_links() {
    let h = harness(Some("A1"), Some("R1")).await;
    let page_two = format!("{}/api/v1/courses/courses/?page=2", h.server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/courses/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": null,
            "results": { "success": true, "data": [course_json("Three")] }
        })))
        .with_priority(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/courses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": page_two,
            "previous": null,
            "results": { "success": true, "data": [course_json("One"), course_json("Two")] }
        })))
        .mount(&h.server)
        .await;

    let titles: Vec<String> = h
        .client
        .all_courses(&CourseQuery::default())
        .map(|course| course.map(|c: CourseSummary| c.title))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(titles, vec!["One", "Two", "Three"]);
}

#[tokio::test]
async fn pages_keep_headers_and_stop_on_cycle() {
    let h = harness(Some("A1"), Some("R1")).await;
    let first = format!("{}/api/v1/courses/my-courses/", h.server.uri());
    let second = format!("{}/api/v1/courses/my-courses/?page=2", h.server.uri());

    Mock::given(method("GET"))
        .and(path(ME))
        .and(query_param("page", "2"))
        .and(header("x-request-source", "tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": first,
            "results": [course_json("Two")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("x-request-source", "tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": second,
            "results": [course_json("One")]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let descriptor =
        RequestDescriptor::get("/courses/my-courses/").header("X-Request-Source", "tests");
    let titles: Vec<String> = h
        .client
        .paginate::<CourseSummary>(descriptor)
        .map(|course| course.map(|c| c.title))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(titles, vec!["One", "Two"]);
}

#[tokio::test]
async fn foreign_next_link_is_rejected() {
    let h = harness(Some("A1"), Some("R1")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/courses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": "https://elsewhere.example.com/api/v1/courses/courses/?page=2",
            "results": [course_json("One")]
        })))
        .mount(&h.server)
        .await;

    let results: Vec<_> = h
        .client
        .all_courses(&CourseQuery::default())
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn single_page_fetch() {
    let h = harness(None, None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/courses/"))
        .and(query_param("search", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "results": { "success": true, "data": [course_json("Rust")] }
        })))
        .mount(&h.server)
        .await;

    let query = CourseQuery {
        search: Some("rust".to_string()),
        ..Default::default()
    };
    let page = h.client.courses(&query).await.unwrap();
    assert_eq!(page.count, 1);
    assert!(!page.has_next());
    assert_eq!(page.items()[0].title, "Rust");
}
