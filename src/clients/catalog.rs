use std::time::Duration;

use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::clients::{
    entities::{NewPlaylist, NewSong, PlaylistId, SongId, SongUpdate},
    errors::{Error, Result},
};

/// Base URL of a catalog running locally with its default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// A raw catalog answer, kept whole so the caller decides what counts as a violation.
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    /// Method of the request that produced this response
    pub method: Method,
    /// Request path relative to the base URL, query included
    pub path: String,
    /// HTTP status
    pub status: StatusCode,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Raw body
    pub body: Vec<u8>,
}

impl CatalogResponse {
    /// Fail with [`Error::UnexpectedStatus`] unless the status is `expected`.
    pub fn expect_status(self, expected: StatusCode) -> Result<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(Error::UnexpectedStatus {
                method: self.method,
                path: self.path,
                expected,
                actual: self.status,
            })
        }
    }

    /// Fail unless the server labelled the body as JSON.
    pub fn expect_json_content(self) -> Result<Self> {
        let is_json = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("json"));
        if is_json {
            return Ok(self);
        }
        let reason = format!(
            "Expected a JSON content type, got {:?}",
            self.content_type
        );
        Err(self.violation(reason))
    }

    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| Error::Decode {
            method: self.method.clone(),
            path: self.path.clone(),
            status: self.status,
            source,
        })
    }

    /// Build a contract violation that points at this response.
    pub fn violation(&self, reason: impl Into<String>) -> Error {
        Error::ContractViolation {
            method: self.method.clone(),
            path: self.path.clone(),
            status: self.status,
            reason: reason.into(),
        }
    }
}

/// Thin HTTP client for the songs and playlists catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Wrap an existing reqwest client. A trailing `/` on `base_url` is dropped.
    pub fn new(http: Client, base_url: &str) -> Self {
        CatalogClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Validate `base_url` and build a client with the given per-request timeout.
    pub fn try_new(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            Error::ConfigurationError(format!("Invalid catalog base URL {base_url:?}: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigurationError(format!(
                "Catalog base URL must use http or https, got {:?}",
                url.scheme()
            )));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(CatalogClient::new(http, base_url))
    }

    /// Base URL without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /songs`, optionally narrowed with `?filter=`.
    pub async fn list_songs(&self, filter: Option<&str>) -> Result<CatalogResponse> {
        match filter {
            Some(filter) => {
                let request = self
                    .request(Method::GET, "/songs")
                    .query(&[("filter", filter)]);
                self.execute(Method::GET, format!("/songs?filter={filter}"), request)
                    .await
            }
            None => {
                let request = self.request(Method::GET, "/songs");
                self.execute(Method::GET, "/songs".to_string(), request)
                    .await
            }
        }
    }

    /// `POST /songs`.
    pub async fn create_song(&self, song: &NewSong) -> Result<CatalogResponse> {
        let request = self.request(Method::POST, "/songs").json(song);
        self.execute(Method::POST, "/songs".to_string(), request)
            .await
    }

    /// `PATCH /songs/{id}`.
    pub async fn update_song(&self, id: SongId, update: &SongUpdate) -> Result<CatalogResponse> {
        let path = format!("/songs/{id}");
        let request = self.request(Method::PATCH, &path).json(update);
        self.execute(Method::PATCH, path, request).await
    }

    /// `DELETE /songs/{id}`.
    pub async fn delete_song(&self, id: SongId) -> Result<CatalogResponse> {
        let path = format!("/songs/{id}");
        let request = self.request(Method::DELETE, &path);
        self.execute(Method::DELETE, path, request).await
    }

    /// `GET /playlists`.
    pub async fn list_playlists(&self) -> Result<CatalogResponse> {
        let request = self.request(Method::GET, "/playlists");
        self.execute(Method::GET, "/playlists".to_string(), request)
            .await
    }

    /// `POST /playlists`.
    pub async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<CatalogResponse> {
        let request = self.request(Method::POST, "/playlists").json(playlist);
        self.execute(Method::POST, "/playlists".to_string(), request)
            .await
    }

    /// `GET /playlists/{id}`.
    pub async fn get_playlist(&self, id: PlaylistId) -> Result<CatalogResponse> {
        let path = format!("/playlists/{id}");
        let request = self.request(Method::GET, &path);
        self.execute(Method::GET, path, request).await
    }

    /// `POST /playlists/{playlist_id}/songs/{song_id}`, sent without a body.
    pub async fn add_song_to_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<CatalogResponse> {
        let path = format!("/playlists/{playlist_id}/songs/{song_id}");
        let request = self.request(Method::POST, &path);
        self.execute(Method::POST, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn execute(
        &self,
        method: Method,
        path: String,
        request: RequestBuilder,
    ) -> Result<CatalogResponse> {
        debug!("{method} {}{path}", self.base_url);
        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        debug!("{method} {path} -> {status} ({} bytes)", body.len());
        Ok(CatalogResponse {
            method,
            path,
            status,
            content_type,
            body,
        })
    }
}
