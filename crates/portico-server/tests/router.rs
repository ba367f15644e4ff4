//! Full-stack router tests: gate in front of the webhook endpoint and pages.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use portico_auth::IdentityProvider;
use portico_auth::testing::{InMemoryProvider, StaticVerifier};
use portico_config::PorticoConfig;
use portico_core::{ProfileFlag, Session};
use portico_server::{Services, router};
use portico_webhook::{WEBHOOK_PATH, Webhook};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

fn config() -> PorticoConfig {
    let mut config = PorticoConfig::default();
    config.clerk.webhook_secret = SECRET.into();
    config.server.public_url = "https://app.example.com".into();
    config
}

fn build(config: &PorticoConfig, provider: Arc<InMemoryProvider>) -> Router {
    let verifier = StaticVerifier::default()
        .with_token("tok_loner", Session::signed_in("user_loner"));
    router(
        config,
        Services {
            provider,
            verifier: Arc::new(verifier),
        },
    )
    .expect("router builds")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("__session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn anonymous_billing_redirects_to_sign_in() {
    let app = build(&config(), Arc::new(InMemoryProvider::new()));
    let response = app.oneshot(get("/billing", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://app.example.com/sign-in?redirect_url=https%3A%2F%2Fapp.example.com%2Fbilling"
    );
}

#[tokio::test]
async fn webhook_is_reachable_without_session() {
    let provider = Arc::new(InMemoryProvider::new().with_bare_user("user_loner", 1));
    let app = build(&config(), Arc::clone(&provider));

    let payload = serde_json::to_vec(&serde_json::json!({
        "type": "organizationMembership.created",
        "data": {
            "organization": {"id": "org_7"},
            "public_user_data": {"user_id": "user_loner"},
        },
    }))
    .unwrap();
    let timestamp = chrono::Utc::now().timestamp();
    let signature = Webhook::new(SECRET)
        .unwrap()
        .sign("msg_1", timestamp, &payload);
    let request = Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("svix-id", "msg_1")
        .header("svix-timestamp", timestamp.to_string())
        .header("svix-signature", signature)
        .body(Body::from(payload))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.flag("user_loner"), Some(ProfileFlag::member_of("org_7")));
}

#[tokio::test]
async fn flag_written_by_webhook_is_seen_by_next_gate_call() {
    let provider = Arc::new(InMemoryProvider::new().with_bare_user("user_loner", 0));
    let app = build(&config(), Arc::clone(&provider));

    let before = app.clone().oneshot(get("/", Some("tok_loner"))).await.unwrap();
    assert_eq!(
        before.headers()[header::LOCATION],
        "https://app.example.com/demo-request"
    );

    // Simulate the synchronizer having run in between.
    provider
        .update_profile_flag("user_loner", &ProfileFlag::member_of("org_1"))
        .await
        .unwrap();

    let after = app.oneshot(get("/", Some("tok_loner"))).await.unwrap();
    assert_eq!(
        after.headers()[header::LOCATION],
        "https://app.example.com/dashboard"
    );
}

#[tokio::test]
async fn allowed_pages_are_served_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sign-in"), "sign in here").unwrap();

    let mut config = config();
    config.server.static_dir = Some(dir.path().to_path_buf());
    let app = build(&config, Arc::new(InMemoryProvider::new()));

    let response = app.oneshot(get("/sign-in", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"sign in here");
}

#[tokio::test]
async fn allowed_request_without_pages_is_not_found() {
    let app = build(&config(), Arc::new(InMemoryProvider::new()));
    let response = app.oneshot(get("/sign-up", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn invalid_public_url_fails_router_build() {
    let mut config = config();
    config.server.public_url = "not a url".into();
    let result = router(
        &config,
        Services {
            provider: Arc::new(InMemoryProvider::new()),
            verifier: Arc::new(StaticVerifier::default()),
        },
    );
    assert!(result.is_err());
}
