use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use remindmark_api::{AppState, AppStateInner, middleware::decode_claims};
use remindmark_db::Database;
use remindmark_gateway::{Dispatcher, connection};
use remindmark_scheduler::{CachedUserDirectory, ReminderScheduler};

const DB_FILE: &str = "remindmark.sqlite";

const DEFAULT_LOG_FILTER: &str =
    "remindmark=info,remindmark_db=info,remindmark_scheduler=info,tower_http=info";

const PLACEHOLDER_SECRETS: &[&str] = &["dev-secret-change-me", "change-me", "changeme", "secret"];

#[derive(Debug, Parser)]
#[command(name = "remindmark", version, about = "Chat bookmark store and reminder service")]
struct Args {
    /// Directory holding the SQLite database.
    #[arg(long, env = "REMINDMARK_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Delete the database before starting.
    #[arg(long)]
    reset_data: bool,

    #[arg(long, env = "LOG_LEVEL", value_parser = ["debug", "info", "warn", "error"])]
    log_level: Option<String>,

    #[arg(long, env = "REMINDMARK_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "REMINDMARK_PORT", default_value_t = 3000)]
    port: u16,

    /// Secret used to sign and verify access tokens.
    #[arg(long, env = "REMINDMARK_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,
}

#[derive(Clone)]
struct ServerState {
    dispatcher: Dispatcher,
    directory: Arc<CachedUserDirectory>,
    jwt_secret: String,
}

#[derive(Deserialize)]
struct GatewayQuery {
    token: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(args.log_level.as_deref()).into()),
        )
        .init();

    check_secret(&args.jwt_secret)?;

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("creating data dir {}", args.data_dir.display()))?;
    let db_path = args.data_dir.join(DB_FILE);
    if args.reset_data {
        reset_data(&db_path)?;
        info!("Removed existing data at {}", db_path.display());
    }

    let db = Arc::new(Database::open(&db_path)?);
    info!("Database ready at {}", db_path.display());

    let dispatcher = Dispatcher::new();
    let directory = Arc::new(CachedUserDirectory::new(db.clone()));

    let shutdown = CancellationToken::new();
    let scheduler = ReminderScheduler::new(
        db.clone(),
        Arc::new(dispatcher.clone()),
        directory.clone(),
    )
    .spawn(shutdown.clone());

    let app_state: AppState = Arc::new(AppStateInner {
        db,
        directory: directory.clone(),
        notifier: Arc::new(dispatcher.clone()),
        jwt_secret: args.jwt_secret.clone(),
    });

    let ws_route = Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(ServerState {
            dispatcher,
            directory,
            jwt_secret: args.jwt_secret,
        });

    let app = remindmark_api::router(app_state)
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Remindmark listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    if let Err(e) = scheduler.await {
        tracing::error!("Reminder scheduler task failed: {}", e);
    }
    info!("Shutdown complete");

    Ok(())
}

async fn ws_upgrade(
    State(state): State<ServerState>,
    Query(query): Query<GatewayQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(claims) = decode_claims(&query.token, &state.jwt_secret) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.dispatcher, state.directory, claims)
    })
}

fn log_filter(level: Option<&str>) -> String {
    match level {
        Some(l) => format!(
            "remindmark={l},remindmark_api={l},remindmark_db={l},remindmark_gateway={l},\
             remindmark_scheduler={l},tower_http={l}"
        ),
        None => DEFAULT_LOG_FILTER.to_string(),
    }
}

fn check_secret(secret: &str) -> anyhow::Result<()> {
    let trimmed = secret.trim();
    if trimmed.is_empty() || PLACEHOLDER_SECRETS.contains(&trimmed) {
        bail!("REMINDMARK_JWT_SECRET must be set to a real secret");
    }
    Ok(())
}

/// Remove the database and its WAL/SHM side files.
fn reset_data(db_path: &Path) -> anyhow::Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        match std::fs::remove_file(&name) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("removing {}", PathBuf::from(name).display()));
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
