use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::metrics::metrics_handler;
use super::song_routes::make_song_routes;
use super::{log_requests, state::*, ServerConfig};
use crate::song_service::SongService;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
    pub songs: Option<usize>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let songs = match state.song_service.count_songs() {
        Ok(count) => Some(count),
        Err(err) => {
            error!("Failed to count songs: {:#}", err);
            None
        }
    };
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
        songs,
    })
}

pub fn make_app(
    config: ServerConfig,
    song_service: Arc<SongService>,
    shutdown: CancellationToken,
) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        song_service,
        shutdown,
    };

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/songs", make_song_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn run_metrics_server(port: u16, shutdown: CancellationToken) -> Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", port))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}

/// Serves the API and the metrics endpoint until `shutdown` is cancelled.
pub async fn run_server(
    config: ServerConfig,
    song_service: Arc<SongService>,
    shutdown: CancellationToken,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;

    let metrics_shutdown = shutdown.clone();
    let metrics_server = tokio::spawn(async move {
        if let Err(err) = run_metrics_server(metrics_port, metrics_shutdown).await {
            error!("Metrics server failed: {:#}", err);
        }
    });

    let app = make_app(config, song_service, shutdown.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    shutdown.cancel();
    let _ = metrics_server.await;
    info!("Server stopped");
    Ok(())
}
