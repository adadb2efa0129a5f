//! Integration tests for the HTTP host around the engine.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use weft::config::ServerConfig;
use weft::middleware::{request_id, X_REQUEST_ID};
use weft::HttpServer;

mod common;

#[tokio::test]
async fn test_hello_over_tcp() {
    let (addr, shutdown) = common::start_server(common::demo_engine(), ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "hello, world");

    let res = client
        .get(format!("http://{}/hello/weft", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "hello weft");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_path_over_tcp() {
    let (addr, shutdown) = common::start_server(common::demo_engine(), ServerConfig::default()).await;

    let res = common::client()
        .get(format!("http://{}/nowhere", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "404 NOT FOUND: /nowhere\n");

    shutdown.trigger();
}

#[tokio::test]
async fn test_panic_is_contained() {
    let (addr, shutdown) = common::start_server(common::demo_engine(), ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/panic", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_over_limit_rejected() {
    let mut config = ServerConfig::default();
    config.limits.max_body_size = 16;
    let router = HttpServer::new(common::demo_engine(), config).into_router();

    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .body(Body::from(vec![b'x'; 64]))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .body(Body::from("small"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"5 bytes");
}

#[tokio::test]
async fn test_panic_without_recovery_returns_500() {
    let mut engine = weft::Engine::new();
    engine.get("/boom", |_| panic!("unrecovered"));
    let router = HttpServer::new(engine, ServerConfig::default()).into_router();

    let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_id_round_trip() {
    let mut engine = common::demo_engine();
    engine.use_middleware([request_id()]);
    let router = HttpServer::new(engine, ServerConfig::default()).into_router();

    let request = Request::builder()
        .uri("/")
        .header(X_REQUEST_ID, "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "abc-123");

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let generated = response.headers().get(X_REQUEST_ID).unwrap();
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let (addr, shutdown) = common::start_server(common::demo_engine(), ServerConfig::default()).await;
    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .timeout(std::time::Duration::from_secs(2))
        .send()
        .await;
    assert!(res.is_err());
}
