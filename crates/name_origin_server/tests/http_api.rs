//! HTTP-level tests for the name-origin server.
//!
//! Drive the router in-process against an in-memory SQLite database, with the
//! upstream classifier and country directory replaced by stubs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use name_origin_core::clients::{
    CountryDirectory, CountryPrediction, NationalityClassifier, RestCountry,
};
use name_origin_core::{db, OriginError, OriginRepository, OriginService};
use name_origin_server::auth::{AdminCredentials, AuthConfig};
use name_origin_server::router::build_router;
use tower::ServiceExt;

const TEST_JWT_SECRET: &[u8] = b"test-secret-for-http-tests";
const ADMIN_PASSWORD: &str = "your-secret-key-here";

// ── Stub upstreams ─────────────────────────────────────────────

struct StubClassifier {
    predictions: HashMap<&'static str, Vec<(&'static str, f64)>>,
    calls: AtomicUsize,
}

#[async_trait]
impl NationalityClassifier for StubClassifier {
    async fn classify(&self, name: &str) -> name_origin_core::Result<Vec<CountryPrediction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if name == "outage" {
            return Err(OriginError::UpstreamUnavailable {
                service: "Nationalize.io",
            });
        }
        Ok(self
            .predictions
            .get(name)
            .map(|preds| {
                preds
                    .iter()
                    .map(|(code, p)| CountryPrediction {
                        country_code: code.to_string(),
                        probability: *p,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

struct StubDirectory;

#[async_trait]
impl CountryDirectory for StubDirectory {
    async fn lookup(&self, code: &str) -> name_origin_core::Result<Option<RestCountry>> {
        if code == "ZZ" {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_value(serde_json::json!({
                "cca2": code,
                "cca3": format!("{code}X"),
                "name": {"common": format!("Country {code}"), "official": format!("Republic of {code}")},
                "region": "Somewhere",
                "independent": true,
                "capital": ["Capital City"],
                "capitalInfo": {"latlng": [1.25, -3.5]},
                "flags": {"png": "https://flags.example/x.png", "svg": "https://flags.example/x.svg"},
                "borders": ["AAA"]
            }))
            .expect("valid stub country"),
        ))
    }
}

// ── Test app builder ───────────────────────────────────────────

struct TestApp {
    router: Router,
    classifier: Arc<StubClassifier>,
}

async fn build_test_app() -> TestApp {
    let pool = db::connect_in_memory().await.expect("in-memory database");

    let classifier = Arc::new(StubClassifier {
        predictions: HashMap::from([
            ("michael", vec![("US", 0.08), ("AU", 0.05), ("ZZ", 0.01)]),
            ("john", vec![("US", 0.1)]),
            ("mary", vec![("us", 0.2)]),
        ]),
        calls: AtomicUsize::new(0),
    });

    let service = Arc::new(OriginService::new(
        OriginRepository::new(pool),
        classifier.clone(),
        Arc::new(StubDirectory),
    ));

    let auth = AuthConfig::new(
        TEST_JWT_SECRET,
        chrono::Duration::minutes(30),
        AdminCredentials {
            username: "admin".into(),
            password: ADMIN_PASSWORD.into(),
        },
    );

    TestApp {
        router: build_router(service, auth),
        classifier,
    }
}

// ── Request helpers ────────────────────────────────────────────

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn token_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn login(app: &Router) -> String {
    let resp = send(
        app,
        token_request(&format!("username=admin&password={ADMIN_PASSWORD}")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ── Token issuance ─────────────────────────────────────────────

#[tokio::test]
async fn test_token_issued_for_valid_credentials() {
    let app = build_test_app().await;
    let resp = send(
        &app.router,
        token_request(&format!("username=admin&password={ADMIN_PASSWORD}")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["token_type"], "bearer");
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_token_rejected_for_bad_password() {
    let app = build_test_app().await;
    let resp = send(&app.router, token_request("username=admin&password=nope")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn test_token_missing_field_is_unprocessable() {
    let app = build_test_app().await;
    let resp = send(&app.router, token_request("username=admin")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ── /names/ ────────────────────────────────────────────────────

#[tokio::test]
async fn test_names_missing_name_is_unprocessable() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/names/", None)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_names_requires_auth() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/names/?name=michael", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.classifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_names_rejects_forged_token() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/names/?name=michael", Some("not.a.jwt"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_names_new_name_returns_resolvable_countries() {
    let app = build_test_app().await;
    let token = login(&app.router).await;

    let resp = send(&app.router, get("/names/?name=michael", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;

    assert_eq!(json["name"], "michael");
    assert_eq!(json["request_count"], 1);
    // ZZ has no country details and is dropped.
    let countries = json["countries"].as_array().unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0]["country_code"], "US");
    assert_eq!(countries[0]["official_name"], "Republic of US");
    assert_eq!(countries[0]["capital_coordinates"], "1.25,-3.5");
    assert_eq!(countries[0]["probability"], 0.08);
    assert_eq!(countries[0]["borders"], serde_json::json!(["AAA"]));
    assert!(countries[0]["coat_of_arms_png"].is_null());
}

#[tokio::test]
async fn test_names_repeat_within_window_uses_cache() {
    let app = build_test_app().await;
    let token = login(&app.router).await;

    let first = body_json(send(&app.router, get("/names/?name=michael", Some(&token))).await).await;
    let second =
        body_json(send(&app.router, get("/names/?name=michael", Some(&token))).await).await;

    assert_eq!(second["request_count"], 2);
    assert_eq!(app.classifier.calls.load(Ordering::SeqCst), 1);
    // Cache hits carry borders too.
    assert_eq!(second["countries"], first["countries"]);
}

#[tokio::test]
async fn test_names_unknown_name_is_not_found() {
    let app = build_test_app().await;
    let token = login(&app.router).await;
    let resp = send(&app.router, get("/names/?name=xqzt", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "No country data found for this name");
}

#[tokio::test]
async fn test_names_upstream_outage_is_unavailable() {
    let app = build_test_app().await;
    let token = login(&app.router).await;
    let resp = send(&app.router, get("/names/?name=outage", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(resp).await;
    assert_eq!(json["detail"], "Nationalize.io service unavailable");
}

#[tokio::test]
async fn test_names_without_trailing_slash() {
    let app = build_test_app().await;
    let token = login(&app.router).await;
    let resp = send(&app.router, get("/names?name=john", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ── /popular-names/ ────────────────────────────────────────────

#[tokio::test]
async fn test_popular_names_missing_country_is_unprocessable() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/popular-names/", None)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_popular_names_malformed_country_is_unprocessable() {
    let app = build_test_app().await;
    let token = login(&app.router).await;
    let resp = send(&app.router, get("/popular-names/?country=USA", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_popular_names_requires_auth() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/popular-names/?country=US", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_popular_names_unknown_country_is_not_found() {
    let app = build_test_app().await;
    let token = login(&app.router).await;
    let resp = send(&app.router, get("/popular-names/?country=QQ", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_names_ordered_and_case_insensitive() {
    let app = build_test_app().await;
    let token = login(&app.router).await;

    for name in ["michael", "john", "mary"] {
        let resp = send(&app.router, get(&format!("/names/?name={name}"), Some(&token))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let upper = body_json(send(&app.router, get("/popular-names/?country=US", Some(&token))).await).await;
    let lower = body_json(send(&app.router, get("/popular-names/?country=us", Some(&token))).await).await;

    assert_eq!(upper, lower);
    assert_eq!(upper["country"], "US");
    let names = upper["names"].as_array().unwrap();
    assert_eq!(names.len(), 3);
    assert!(names.len() <= 5);
    let counts: Vec<i64> = names.iter().map(|n| n["count"].as_i64().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
}

// ── /health ────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_no_auth() {
    let app = build_test_app().await;
    let resp = send(&app.router, get("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["database"], "healthy");
}
