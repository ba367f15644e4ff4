//! Gate middleware tests over a stub application router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::Response;
use portico_auth::testing::{InMemoryProvider, StaticVerifier};
use portico_config::GateConfig;
use portico_core::{ProfileFlag, Session};
use portico_gate::{Gate, GateState, gate_middleware};
use tower::ServiceExt;

fn app(public_url: Option<&str>) -> Router {
    let provider = InMemoryProvider::new()
        .with_user("user_member", &ProfileFlag::member_of("org_1"), 1)
        .with_bare_user("user_loner", 0);
    let verifier = StaticVerifier::default()
        .with_token("tok_org", Session::signed_in("user_loner").with_org("org_active"))
        .with_token("tok_member", Session::signed_in("user_member"))
        .with_token("tok_loner", Session::signed_in("user_loner"));

    let state = GateState::new(
        Gate::from_config(&GateConfig::default()),
        Arc::new(provider),
        Arc::new(verifier),
        public_url,
    )
    .expect("valid gate state");

    Router::new()
        .fallback(|| async { "app" })
        .layer(from_fn_with_state(state, gate_middleware))
}

async fn send(app: Router, uri: &str, configure: impl FnOnce(&mut Request<Body>)) -> Response {
    let mut request = Request::builder()
        .uri(uri)
        .header(header::HOST, "app.example.com")
        .body(Body::empty())
        .unwrap();
    configure(&mut request);
    app.oneshot(request).await.unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

fn cookie(token: &'static str) -> impl FnOnce(&mut Request<Body>) {
    move |req| {
        req.headers_mut().insert(
            header::COOKIE,
            format!("__session={token}").parse().unwrap(),
        );
    }
}

#[tokio::test]
async fn root_with_active_org_goes_to_dashboard() {
    let response = send(app(None), "/", cookie("tok_org")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "http://app.example.com/dashboard");
}

#[tokio::test]
async fn root_with_metadata_flag_goes_to_dashboard() {
    let response = send(app(None), "/", cookie("tok_member")).await;
    assert_eq!(location(&response), "http://app.example.com/dashboard");
}

#[tokio::test]
async fn root_without_org_goes_to_onboarding() {
    let response = send(app(None), "/", cookie("tok_loner")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "http://app.example.com/demo-request");
}

#[tokio::test]
async fn anonymous_protected_path_goes_to_sign_in() {
    let response = send(app(None), "/billing", |_| {}).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "http://app.example.com/sign-in?redirect_url=http%3A%2F%2Fapp.example.com%2Fbilling"
    );
}

#[tokio::test]
async fn sign_in_redirect_respects_public_url_and_query() {
    let response = send(
        app(Some("https://portal.example.com")),
        "/billing?tab=2",
        |_| {},
    )
    .await;
    assert_eq!(
        location(&response),
        "https://portal.example.com/sign-in?redirect_url=https%3A%2F%2Fportal.example.com%2Fbilling%3Ftab%3D2"
    );
}

#[tokio::test]
async fn forwarded_proto_is_honored() {
    let response = send(app(None), "/billing", |req| {
        req.headers_mut()
            .insert("x-forwarded-proto", "https".parse().unwrap());
    })
    .await;
    assert!(location(&response).starts_with("https://app.example.com/sign-in?"));
}

#[tokio::test]
async fn forged_forwarded_proto_keeps_the_request_origin() {
    let response = send(app(None), "/billing", |req| {
        req.headers_mut()
            .insert("x-forwarded-proto", "https://evil.example/#".parse().unwrap());
    })
    .await;
    assert_eq!(
        location(&response),
        "http://app.example.com/sign-in?redirect_url=http%3A%2F%2Fapp.example.com%2Fbilling"
    );
}

#[tokio::test]
async fn asset_named_api_route_is_gated() {
    let response = send(app(None), "/api/avatars/user_1.png", |_| {}).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("http://app.example.com/sign-in?"));
}

#[tokio::test]
async fn rejected_token_is_treated_as_anonymous() {
    let response = send(app(None), "/dashboard", cookie("forged")).await;
    assert!(location(&response).starts_with("http://app.example.com/sign-in?"));
}

#[tokio::test]
async fn bearer_token_is_accepted() {
    let response = send(app(None), "/dashboard", |req| {
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer tok_member".parse().unwrap());
    })
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn no_org_user_is_sent_to_onboarding() {
    let response = send(app(None), "/dashboard", cookie("tok_loner")).await;
    assert_eq!(location(&response), "http://app.example.com/demo-request");
}

#[tokio::test]
async fn onboarding_page_passes_through() {
    let response = send(app(None), "/demo-request", cookie("tok_loner")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn exempt_and_static_paths_pass_anonymously() {
    for uri in ["/_next/static/app.js", "/favicon.ico", "/img/hero.png", "/api/webhooks/clerk"] {
        let response = send(app(None), uri, |_| {}).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn public_paths_pass_anonymously() {
    for uri in ["/sign-in", "/sign-up/continue", "/demo-request"] {
        let response = send(app(None), uri, |_| {}).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}
