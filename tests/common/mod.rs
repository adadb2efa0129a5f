//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{Method, Request, StatusCode};
use tokio::net::TcpListener;

use weft::{Engine, Handler, HttpServer, ResponseWriter, ServerConfig, Shutdown};

/// Ordered record of handler events, shared between handlers and the test.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Middleware that records `{name}-before`, calls next, records `{name}-after`.
pub fn recording(trace: &Trace, name: &'static str) -> Handler {
    let trace = trace.clone();
    Handler::new(move |c| {
        trace.push(format!("{name}-before"));
        c.next();
        trace.push(format!("{name}-after"));
    })
}

/// Dispatch a request straight through the engine, no socket involved.
pub fn dispatch(engine: &Engine, method: Method, uri: &str, body: &str) -> ResponseWriter {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Bytes::from(body.to_string()))
        .unwrap();
    let mut writer = ResponseWriter::new();
    engine.serve_http(&request, &mut writer);
    writer
}

pub fn body_text(writer: &ResponseWriter) -> String {
    String::from_utf8(writer.body().to_vec()).unwrap()
}

/// Engine with the routes most tests exercise.
pub fn demo_engine() -> Engine {
    let mut engine = Engine::with_defaults();
    engine.get("/", |c| c.string(StatusCode::OK, "hello, world"));
    engine.get("/hello/:name", |c| {
        let body = format!("hello {}", c.param("name"));
        c.string(StatusCode::OK, body);
    });
    engine.post("/echo", |c| {
        let body = format!("{} bytes", c.request().body().len());
        c.string(StatusCode::OK, body);
    });
    engine.get("/panic", |_| panic!("boom"));
    engine
}

/// Serve `engine` on an ephemeral port. Returns the address and the
/// shutdown handle that stops it.
pub async fn start_server(engine: Engine, mut config: ServerConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(engine, config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
