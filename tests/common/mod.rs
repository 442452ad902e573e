//! In-process fake catalog for contract check tests.
//!
//! Provides `FakeCatalog` (binds to port 0, serves the songs and playlists API
//! from memory) and a `Fault` switch that makes one endpoint misbehave.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post},
};
use catalog_checker::checker::{Checker, ConfigBuilder};
use catalog_checker::clients::entities::{Playlist, Song};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One way the fake can break the API contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    #[default]
    None,
    /// `POST /songs` accepts an existing title/artist pair
    AcceptDuplicates,
    /// `POST /songs` answers 201 without an `id`
    OmitCreatedId,
    /// `PATCH /songs/{id}` answers 200 but keeps the old title
    IgnoreTitleUpdates,
    /// `DELETE /songs/{id}` echoes a different id
    WrongDeletedId,
    /// `GET /songs` answers with an HTML content type
    HtmlSongList,
    /// `GET /songs?filter=` answers with an HTML content type, the plain list stays JSON
    HtmlFilteredSongList,
    /// `POST /songs` answers 201 with an HTML content type
    HtmlCreatedSong,
    /// `GET /playlists` answers with an HTML content type
    HtmlPlaylistList,
    /// `POST /playlists` answers 201 without an `id`
    OmitPlaylistId,
    /// `GET /playlists/{id}` echoes a different id
    WrongPlaylistId,
    /// `POST /playlists/{id}/songs/{id}` answers 200 without adding the song
    DropPlaylistSongs,
    /// The song shows up in the add response but is not stored
    ForgetPlaylistSongs,
    /// Playlists with no songs omit `songIds` entirely
    OmitEmptySongIds,
}

struct Catalog {
    songs: Vec<Song>,
    playlists: Vec<Playlist>,
    next_playlist_id: u64,
    fault: Fault,
}

type Shared = Arc<Mutex<Catalog>>;

fn song(id: u64, title: &str, artist: &str) -> Song {
    Song {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
    }
}

fn playlist(id: u64, name: &str, song_ids: &[u64]) -> Playlist {
    Playlist {
        id,
        name: name.to_string(),
        song_ids: song_ids.to_vec(),
    }
}

impl Catalog {
    fn seeded(fault: Fault) -> Self {
        Catalog {
            songs: vec![
                song(1, "Cry For Me", "The Weeknd"),
                song(2, "Busy Woman", "Sabrina Carpenter"),
                song(
                    3,
                    "Call Me When You Break Up",
                    "Selena Gomez, benny blanco, Gracie Adams",
                ),
                song(4, "Abracadabra", "Lady Gaga"),
                song(5, "Róa", "VÆB"),
                song(6, "Messy", "Lola Young"),
                song(7, "Lucy", "Idle Cave"),
                song(8, "Eclipse", "parrow"),
            ],
            playlists: vec![
                playlist(1, "Hot Hits Iceland", &[1, 2, 3, 4]),
                playlist(2, "Workout Playlist", &[2, 5, 6]),
                playlist(3, "Lo-Fi Study", &[]),
            ],
            next_playlist_id: 4,
            fault,
        }
    }

    fn playlist_json(&self, playlist: &Playlist) -> Value {
        if self.fault == Fault::OmitEmptySongIds && playlist.song_ids.is_empty() {
            json!({"id": playlist.id, "name": playlist.name})
        } else {
            json!(playlist)
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[derive(Deserialize)]
struct FilterQuery {
    filter: Option<String>,
}

async fn list_songs(State(state): State<Shared>, Query(query): Query<FilterQuery>) -> Response {
    let catalog = state.lock().unwrap();
    let filtered = query.filter.as_deref().is_some_and(|f| !f.is_empty());
    let songs: Vec<&Song> = match query.filter.map(|f| f.to_lowercase()) {
        Some(filter) if !filter.is_empty() => catalog
            .songs
            .iter()
            .filter(|s| {
                s.title.to_lowercase().contains(&filter)
                    || s.artist.to_lowercase().contains(&filter)
            })
            .collect(),
        _ => catalog.songs.iter().collect(),
    };
    let html = match catalog.fault {
        Fault::HtmlSongList => true,
        Fault::HtmlFilteredSongList => filtered,
        _ => false,
    };
    if html {
        return Html(json!(songs).to_string()).into_response();
    }
    Json(songs).into_response()
}

async fn create_song(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut catalog = state.lock().unwrap();
    let (Some(title), Some(artist)) = (body["title"].as_str(), body["artist"].as_str()) else {
        return error(StatusCode::BAD_REQUEST, "Title and artist are required.");
    };
    let exists = catalog.songs.iter().any(|s| {
        s.title.to_lowercase() == title.to_lowercase()
            && s.artist.to_lowercase() == artist.to_lowercase()
    });
    if exists && catalog.fault != Fault::AcceptDuplicates {
        return error(StatusCode::BAD_REQUEST, "Song already exists.");
    }
    let id = catalog.songs.last().map_or(1, |s| s.id + 1);
    let new_song = song(id, title, artist);
    catalog.songs.push(new_song.clone());
    if catalog.fault == Fault::OmitCreatedId {
        return (
            StatusCode::CREATED,
            Json(json!({"title": title, "artist": artist})),
        )
            .into_response();
    }
    if catalog.fault == Fault::HtmlCreatedSong {
        return (StatusCode::CREATED, Html(json!(new_song).to_string())).into_response();
    }
    (StatusCode::CREATED, Json(new_song)).into_response()
}

async fn update_song(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut catalog = state.lock().unwrap();
    let ignore_title = catalog.fault == Fault::IgnoreTitleUpdates;
    let Some(existing) = catalog.songs.iter_mut().find(|s| s.id == id) else {
        return error(StatusCode::NOT_FOUND, "Song not found.");
    };
    if let Some(title) = body["title"].as_str()
        && !ignore_title
    {
        existing.title = title.to_string();
    }
    if let Some(artist) = body["artist"].as_str() {
        existing.artist = artist.to_string();
    }
    Json(existing.clone()).into_response()
}

async fn delete_song(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut catalog = state.lock().unwrap();
    let Some(index) = catalog.songs.iter().position(|s| s.id == id) else {
        return error(StatusCode::NOT_FOUND, "Song not found.");
    };
    let mut removed = catalog.songs.remove(index);
    for playlist in &mut catalog.playlists {
        playlist.song_ids.retain(|song_id| *song_id != id);
    }
    if catalog.fault == Fault::WrongDeletedId {
        removed.id += 100;
    }
    Json(removed).into_response()
}

async fn list_playlists(State(state): State<Shared>) -> Response {
    let catalog = state.lock().unwrap();
    let playlists: Vec<Value> = catalog
        .playlists
        .iter()
        .map(|p| catalog.playlist_json(p))
        .collect();
    if catalog.fault == Fault::HtmlPlaylistList {
        return Html(json!(playlists).to_string()).into_response();
    }
    Json(playlists).into_response()
}

async fn create_playlist(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut catalog = state.lock().unwrap();
    let Some(name) = body["name"].as_str() else {
        return error(StatusCode::BAD_REQUEST, "Name is required.");
    };
    let id = catalog.next_playlist_id;
    catalog.next_playlist_id += 1;
    let created = playlist(id, name, &[]);
    let body = if catalog.fault == Fault::OmitPlaylistId {
        json!({"name": name, "songIds": []})
    } else {
        catalog.playlist_json(&created)
    };
    catalog.playlists.push(created);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_playlist(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let catalog = state.lock().unwrap();
    match catalog.playlists.iter().find(|p| p.id == id) {
        Some(p) if catalog.fault == Fault::WrongPlaylistId => {
            let mut body = catalog.playlist_json(p);
            body["id"] = json!(p.id + 73);
            Json(body).into_response()
        }
        Some(p) => Json(catalog.playlist_json(p)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Playlist not found."),
    }
}

async fn add_song_to_playlist(
    State(state): State<Shared>,
    Path((playlist_id, song_id)): Path<(u64, u64)>,
) -> Response {
    let mut catalog = state.lock().unwrap();
    if !catalog.songs.iter().any(|s| s.id == song_id) {
        return error(StatusCode::NOT_FOUND, "Song not found.");
    }
    let fault = catalog.fault;
    let Some(target) = catalog.playlists.iter_mut().find(|p| p.id == playlist_id) else {
        return error(StatusCode::NOT_FOUND, "Playlist not found.");
    };
    let mut answer = target.clone();
    match fault {
        Fault::DropPlaylistSongs => {}
        Fault::ForgetPlaylistSongs => {
            if !answer.song_ids.contains(&song_id) {
                answer.song_ids.push(song_id);
            }
        }
        _ => {
            if !target.song_ids.contains(&song_id) {
                target.song_ids.push(song_id);
            }
            answer = target.clone();
        }
    }
    Json(catalog.playlist_json(&answer)).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/songs", get(list_songs).post(create_song))
        .route("/api/v1/songs/{id}", patch(update_song).delete(delete_song))
        .route(
            "/api/v1/playlists",
            get(list_playlists).post(create_playlist),
        )
        .route("/api/v1/playlists/{id}", get(get_playlist))
        .route(
            "/api/v1/playlists/{playlist_id}/songs/{song_id}",
            post(add_song_to_playlist),
        )
        .with_state(state)
}

/// A fake catalog bound to a random OS-assigned port.
pub struct FakeCatalog {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeCatalog {
    /// Start a catalog that honours the whole contract.
    pub async fn spawn() -> Self {
        Self::spawn_with_fault(Fault::None).await
    }

    pub async fn spawn_with_fault(fault: Fault) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state: Shared = Arc::new(Mutex::new(Catalog::seeded(fault)));
        let app = router(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
            handle,
        }
    }

    pub fn songs(&self) -> Vec<Song> {
        self.state.lock().unwrap().songs.clone()
    }

    pub fn playlist(&self, id: u64) -> Option<Playlist> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Checker pointed at this catalog, collecting progress lines in memory.
    pub fn checker(&self) -> Checker<Vec<u8>> {
        let config = ConfigBuilder::new()
            .base_url(self.base_url.as_str())
            .build()
            .unwrap();
        Checker::with_output(config, Vec::new())
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Progress lines printed so far.
pub fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
