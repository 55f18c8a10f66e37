use crate::{build_app, Backend, Config};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use catima_security::HashParams;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_config(dir: &TempDir) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8000,
        database_path: dir.path().join("nested").join("catima.db"),
        cors_origin: None,
        hash_params: HashParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
    }
}

#[tokio::test]
async fn test_backend_creates_database_and_issues_tokens() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let backend = Backend::open(&config).await.unwrap();
    assert!(config.database_path.exists());

    let user = backend.users.create_user("alice").await.unwrap();
    let issued = backend
        .authenticator
        .issue(user.id, Some("laptop"), None, None)
        .await
        .unwrap();

    let verified = backend
        .authenticator
        .verify(&issued.token.token_name, &issued.secret)
        .await
        .unwrap();
    assert_eq!(verified.map(|t| t.user_id), Some(user.id));
}

#[tokio::test]
async fn test_invalid_hash_params_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.hash_params.iterations = 0;

    assert!(Backend::open(&config).await.is_err());
}

#[tokio::test]
async fn test_app_serves_health() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::open(&test_config(&dir)).await.unwrap();
    let app = build_app(&backend, None).unwrap();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_cors_origin_is_applied() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::open(&test_config(&dir)).await.unwrap();
    let app = build_app(&backend, Some("https://app.example.com")).unwrap();

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/cards/")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-token-username")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(preflight).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example.com"
    );
}

#[tokio::test]
async fn test_invalid_cors_origin_is_rejected() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::open(&test_config(&dir)).await.unwrap();

    assert!(build_app(&backend, Some("bad\norigin")).is_err());
}
