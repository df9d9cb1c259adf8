use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::state::{GuardedSongService, ServerState};
use crate::pagination::{PageRequest, DEFAULT_LIST_LIMIT, DEFAULT_LYRICS_LIMIT};
use crate::song_service::SongUpdate;
use crate::song_store::{Song, SongFilter};

#[derive(Deserialize, Debug, Default)]
struct ListSongsQuery {
    group: Option<String>,
    song: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Serialize)]
struct SongListResponse {
    data: Vec<Song>,
    total: usize,
    page: usize,
    limit: usize,
}

#[derive(Deserialize, Debug)]
struct CreateSongBody {
    group: String,
    song: String,
}

#[derive(Deserialize, Debug, Default)]
struct LyricsQuery {
    page: Option<String>,
    per_page: Option<String>,
    limit: Option<String>,
}

async fn list_songs(
    State(song_service): State<GuardedSongService>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> Result<Json<SongListResponse>, ApiError> {
    let Query(query) = query?;
    let page = PageRequest::parse_strict(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_LIST_LIMIT,
    )?;
    let filter = SongFilter {
        group: query.group,
        title: query.song,
    };

    let songs = song_service.list_songs(&filter, page)?;
    Ok(Json(SongListResponse {
        data: songs.songs,
        total: songs.total,
        page: page.page,
        limit: page.limit,
    }))
}

async fn get_song(
    State(song_service): State<GuardedSongService>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    Ok(Json(song_service.get_song(&id)?))
}

async fn post_song(
    State(song_service): State<GuardedSongService>,
    State(shutdown): State<CancellationToken>,
    body: Result<Json<CreateSongBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let song = song_service
        .add_song_cancellable(&body.group, &body.song, &shutdown.child_token())
        .await?;
    Ok((StatusCode::CREATED, Json(song)).into_response())
}

async fn put_song(
    State(song_service): State<GuardedSongService>,
    Path(id): Path<String>,
    body: Result<Json<SongUpdate>, JsonRejection>,
) -> Result<Json<Song>, ApiError> {
    let Json(update) = body?;
    Ok(Json(song_service.update_song(&id, &update)?))
}

async fn delete_song(
    State(song_service): State<GuardedSongService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    song_service.delete_song(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_song_lyrics(
    State(song_service): State<GuardedSongService>,
    Path(id): Path<String>,
    query: Result<Query<LyricsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let page = PageRequest::parse_lenient(
        query.page.as_deref(),
        query.per_page.as_deref().or(query.limit.as_deref()),
        DEFAULT_LYRICS_LIMIT,
    );
    Ok(Json(song_service.get_song_lyrics(&id, page)?).into_response())
}

pub fn make_song_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_songs).post(post_song))
        .route("/{id}", get(get_song).put(put_song).delete(delete_song))
        .route("/{id}/lyrics", get(get_song_lyrics))
        .with_state(state)
}
