use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::song_service::SongService;

use super::ServerConfig;

pub type GuardedSongService = Arc<SongService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub song_service: GuardedSongService,
    /// Cancelled on shutdown, aborting in-flight metadata lookups.
    pub shutdown: CancellationToken,
}

impl FromRef<ServerState> for GuardedSongService {
    fn from_ref(input: &ServerState) -> Self {
        input.song_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for CancellationToken {
    fn from_ref(input: &ServerState) -> Self {
        input.shutdown.clone()
    }
}
