//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all song catalog endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Songs
    // ========================================================================

    /// GET /songs with the given query parameters
    pub async fn list_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/songs", self.base_url))
            .query(query)
            .send()
            .await
            .expect("List songs request failed")
    }

    /// GET /songs/{id}
    pub async fn get_song(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Get song request failed")
    }

    /// POST /songs
    pub async fn create_song(&self, group: &str, song: &str) -> Response {
        self.create_song_raw(json!({ "group": group, "song": song }))
            .await
    }

    /// POST /songs with an arbitrary JSON body
    pub async fn create_song_raw(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/songs", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Create song request failed")
    }

    /// Creates a song and returns its JSON, panicking unless it was created.
    pub async fn create_song_ok(&self, group: &str, song: &str) -> Value {
        let response = self.create_song(group, song).await;
        assert_eq!(
            response.status(),
            StatusCode::CREATED,
            "Creating \"{}\" by \"{}\" failed",
            song,
            group
        );
        response.json().await.expect("Invalid song JSON")
    }

    /// PUT /songs/{id}
    pub async fn update_song(&self, id: &str, body: Value) -> Response {
        self.client
            .put(format!("{}/songs/{}", self.base_url, id))
            .json(&body)
            .send()
            .await
            .expect("Update song request failed")
    }

    /// DELETE /songs/{id}
    pub async fn delete_song(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete song request failed")
    }

    /// GET /songs/{id}/lyrics with the given query parameters
    pub async fn get_lyrics(&self, id: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/songs/{}/lyrics", self.base_url, id))
            .query(query)
            .send()
            .await
            .expect("Get lyrics request failed")
    }
}
