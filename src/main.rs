//! weft demo server.
//!
//! ```text
//!   Client ──▶ axum/hyper ──▶ Engine::serve_http
//!                               │
//!                               ├─ root group:  logger, recovery, request_id
//!                               ├─ /v1 group:   (no middleware)
//!                               └─ /v2 group:   v2 timing middleware
//!                                        │
//!                                        ▼
//!                                  route handler ──▶ ResponseWriter
//! ```

use std::path::PathBuf;
use std::time::Instant;

use axum::http::StatusCode;
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use weft::config::{load_config, validate_config, ConfigError, ServerConfig};
use weft::middleware::request_id;
use weft::observability::logging;
use weft::{Engine, Handler, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(about = "Demo server for the weft dispatch engine", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;
    tracing::info!("weft v{} starting", env!("CARGO_PKG_VERSION"));

    let engine = build_engine(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    HttpServer::new(engine, config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_engine(config: &ServerConfig) -> Result<Engine, weft::Error> {
    let mut engine = Engine::with_defaults();
    engine.use_middleware([request_id()]);

    if let Some(pattern) = &config.templates.glob {
        engine.load_html_glob(pattern)?;
    }
    for mount in &config.assets {
        engine.static_files(&mount.url_path, &mount.root);
    }

    engine.get("/", |c| {
        c.set_header("content-type", "text/html");
        c.data(StatusCode::OK, "<h1>Hello weft</h1>");
    });
    engine.get("/hello/:name", |c| {
        let body = format!("hello {}\n", c.param("name"));
        c.string(StatusCode::OK, body);
    });
    engine.get("/page", |c| {
        let data = json!({ "title": "weft", "path": c.path() });
        c.html(StatusCode::OK, "index.html", &data);
    });
    engine.get("/panic", |_| panic!("deliberate failure"));

    {
        let mut v1 = engine.group("/v1");
        v1.get("/", |c| c.string(StatusCode::OK, "v1 index\n"));
        v1.get("/hello", |c| {
            let body = format!("hello {}, you're at {}\n", c.query("name"), c.path());
            c.string(StatusCode::OK, body);
        });
    }

    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware([v2_timing()]);
        v2.get("/hello/:name", |c| {
            let body = format!("hello {}, you're at {}\n", c.param("name"), c.path());
            c.string(StatusCode::OK, body);
        });
        v2.post("/login", |c| {
            let body = json!({
                "username": c.post_form("username"),
                "password": c.post_form("password"),
            });
            c.json(StatusCode::OK, &body);
        });
    }

    Ok(engine)
}

fn v2_timing() -> Handler {
    Handler::new(|c| {
        let start = Instant::now();
        c.next();
        tracing::info!(
            path = %c.path(),
            elapsed = ?start.elapsed(),
            "v2 request handled"
        );
    })
}
