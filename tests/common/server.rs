//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and metadata service.

use super::constants::*;
use super::fixtures::FakeMetadataService;
use song_catalog_server::metadata_provider::MetadataProviderClient;
use song_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use song_catalog_server::song_service::SongService;
use song_catalog_server::song_store::SqliteSongStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Song store for direct database access in tests
    pub song_store: Arc<SqliteSongStore>,

    /// The metadata service the server enriches songs from
    pub metadata: FakeMetadataService,

    shutdown: CancellationToken,

    // Keep the database alive until drop
    _temp_db_dir: TempDir,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created, binding fails or the server
    /// doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        Self::spawn_with_metadata_timeout(Duration::from_secs(METADATA_TIMEOUT_SECS)).await
    }

    /// Spawns a test server whose metadata lookups give up after `timeout`.
    pub async fn spawn_with_metadata_timeout(timeout: Duration) -> Self {
        let metadata = FakeMetadataService::spawn().await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let song_store = Arc::new(
            SqliteSongStore::new(temp_db_dir.path().join("songs.db"))
                .expect("Failed to open song store"),
        );
        let metadata_provider = Arc::new(
            MetadataProviderClient::new(&metadata.endpoint, timeout)
                .expect("Failed to create metadata client"),
        );
        let song_service = Arc::new(SongService::new(
            song_store.clone(),
            metadata_provider,
            Span::none(),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            metrics_port: 0,
        };
        let shutdown = CancellationToken::new();
        let app = make_app(config, song_service, shutdown.clone());

        // Spawn server in background task with graceful shutdown
        let serve_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(serve_shutdown.cancelled_owned())
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            song_store,
            metadata,
            shutdown,
            _temp_db_dir: temp_db_dir,
        };

        server.wait_for_ready().await;

        server
    }

    /// Cancels in-flight lookups and stops accepting connections.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
