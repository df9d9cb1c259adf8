//! Fake metadata service backing the server under test
//!
//! Replies are scripted per `(group, song)` pair. Pairs without a script get a
//! 404, like a real service that does not know the song.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub enum ProviderReply {
    Detail {
        release_date: String,
        text: String,
        link: String,
    },
    Status(u16),
    /// 200 with a body that is not the expected JSON
    Garbage,
    /// Never answers
    Hang,
}

impl ProviderReply {
    pub fn detail(release_date: &str, text: &str, link: &str) -> Self {
        ProviderReply::Detail {
            release_date: release_date.to_string(),
            text: text.to_string(),
            link: link.to_string(),
        }
    }
}

#[derive(Default)]
struct FakeState {
    replies: HashMap<(String, String), ProviderReply>,
    requests: Vec<(String, String)>,
}

pub struct FakeMetadataService {
    /// Full URL of the lookup endpoint
    pub endpoint: String,
    state: Arc<Mutex<FakeState>>,
    shutdown: CancellationToken,
}

async fn info(
    State(state): State<Arc<Mutex<FakeState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let group = params.get("group").cloned().unwrap_or_default();
    let song = params.get("song").cloned().unwrap_or_default();

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push((group.clone(), song.clone()));
        state.replies.get(&(group, song)).cloned()
    };

    match reply {
        Some(ProviderReply::Detail {
            release_date,
            text,
            link,
        }) => Json(json!({
            "releaseDate": release_date,
            "text": text,
            "link": link,
        }))
        .into_response(),
        Some(ProviderReply::Status(status)) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(ProviderReply::Garbage) => "<html>maintenance</html>".into_response(),
        Some(ProviderReply::Hang) => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

impl FakeMetadataService {
    /// Starts the service on a random port, knowing the songs in `constants`.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(FakeState::default()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake metadata service");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let app = Router::new()
            .route("/info", get(info))
            .with_state(state.clone());
        let shutdown = CancellationToken::new();
        let serve_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(serve_shutdown.cancelled_owned())
                .await
                .expect("Fake metadata service failed");
        });

        let service = Self {
            endpoint: format!("http://127.0.0.1:{}/info", port),
            state,
            shutdown,
        };
        service.script(
            MUSE,
            SUPERMASSIVE_BLACK_HOLE,
            ProviderReply::detail(
                SUPERMASSIVE_RELEASE_DATE,
                SUPERMASSIVE_TEXT,
                SUPERMASSIVE_LINK,
            ),
        );
        service.script(
            MUSE,
            UPRISING,
            ProviderReply::detail(UPRISING_RELEASE_DATE, UPRISING_TEXT, UPRISING_LINK),
        );
        service.script(
            QUEEN,
            BOHEMIAN_RHAPSODY,
            ProviderReply::detail(
                BOHEMIAN_RHAPSODY_RELEASE_DATE,
                BOHEMIAN_RHAPSODY_TEXT,
                BOHEMIAN_RHAPSODY_LINK,
            ),
        );
        service
    }

    /// Sets the reply for lookups of `song` by `group`.
    pub fn script(&self, group: &str, song: &str, reply: ProviderReply) {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert((group.to_string(), song.to_string()), reply);
    }

    /// Every `(group, song)` pair looked up so far, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Drop for FakeMetadataService {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
