use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_catalog_server::config;
use song_catalog_server::metadata_provider::MetadataProviderClient;
use song_catalog_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use song_catalog_server::song_service::SongService;
use song_catalog_server::song_store::{SongStore, SqliteSongStore};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[clap(version, about = "Song catalog server, enriching songs from a metadata service")]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite songs database file, created if missing.
    #[clap(long, env = "DATABASE_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, env = "METRICS_PORT", default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// URL of the metadata service endpoint used to enrich new songs.
    #[clap(long, env = "API_URL")]
    pub metadata_api_url: Option<String>,

    /// Timeout in seconds for metadata lookups.
    #[clap(long, default_value_t = 10)]
    pub metadata_timeout_sec: u64,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            metadata_api_url: args.metadata_api_url.clone(),
            metadata_timeout_sec: args.metadata_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  metadata_api_url: {}", app_config.metadata_api_url);
    info!("  port: {}", app_config.port);

    let song_store = Arc::new(SqliteSongStore::new(&app_config.db_path)?);

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_songs_metric(song_store.count_songs()?);

    let metadata_provider = Arc::new(MetadataProviderClient::new(
        &app_config.metadata_api_url,
        app_config.metadata_timeout,
    )?);

    let song_service = Arc::new(SongService::new(
        song_store,
        metadata_provider,
        info_span!("song_service"),
    ));

    let shutdown_token = CancellationToken::new();
    let ctrl_c_token = shutdown_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown");
                ctrl_c_token.cancel();
            }
            Err(err) => error!("Failed to listen for Ctrl+C: {}", err),
        }
    });

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
    };
    run_server(server_config, song_service, shutdown_token).await
}
