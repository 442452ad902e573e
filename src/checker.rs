use std::io::{self, Stdout, Write};
use std::time::Duration;

use log::{debug, info};
use reqwest::StatusCode;

use crate::clients::{
    CatalogClient, CatalogResponse,
    catalog::DEFAULT_BASE_URL,
    entities::{
        CreatedResource, DeletedSong, NewPlaylist, NewSong, Playlist, PlaylistDetails,
        PlaylistId, Song, SongId, SongUpdate, UpdatedSong,
    },
    errors::Result,
};

/// Song assumed to exist in the catalog's seed data before a run.
pub const DEFAULT_SEED_SONG_ID: SongId = 2;
/// Per-request transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Title of the song created (and later deleted) by the songs checks.
pub const TEST_SONG_TITLE: &str = "Test Song";
/// Artist of the song created by the songs checks.
pub const TEST_SONG_ARTIST: &str = "Test Artist";
/// Title the created song is renamed to.
pub const UPDATED_SONG_TITLE: &str = "Updated Test Song";
/// Name of the playlist created by the playlists checks.
pub const TEST_PLAYLIST_NAME: &str = "Test Playlist";
/// Substring used by the filtered listing check.
pub const SONG_FILTER: &str = "cry";

/// Configuration for the [`Checker`] struct
pub struct Config {
    /// Client pointed at the catalog under test
    pub client: CatalogClient,
    /// Song added to the freshly created playlist
    pub seed_song_id: SongId,
}

/// Builds a [`Config`], falling back to the local catalog defaults.
pub struct ConfigBuilder {
    base_url: Option<String>,
    seed_song_id: Option<SongId>,
    timeout: Option<Duration>,
    client: Option<CatalogClient>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Empty builder; every unset field falls back to its default.
    pub fn new() -> Self {
        Self {
            base_url: None,
            seed_song_id: None,
            timeout: None,
            client: None,
        }
    }

    /// Catalog base URL, e.g. `http://localhost:3000/api/v1`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Song id the playlist checks add to the new playlist.
    #[must_use]
    pub fn seed_song_id(mut self, id: SongId) -> Self {
        self.seed_song_id = Some(id);
        self
    }

    /// Per-request transport timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a ready-made client; `base_url` and `timeout` are then ignored.
    #[must_use]
    pub fn client(mut self, client: CatalogClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate the settings and build the catalog client.
    pub fn build(self) -> Result<Config> {
        let client = match self.client {
            Some(c) => c,
            None => CatalogClient::try_new(
                self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
                self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            )?,
        };
        Ok(Config {
            client,
            seed_song_id: self.seed_song_id.unwrap_or(DEFAULT_SEED_SONG_ID),
        })
    }
}

/// Runs the contract checks in a fixed order, printing one line per passed check to `out`.
///
/// Every check is a hard assertion: the first error is returned as is and nothing
/// after it runs.
pub struct Checker<W = Stdout> {
    config: Config,
    out: W,
}

impl Checker<Stdout> {
    /// Checker that prints progress to stdout.
    pub fn new(config: Config) -> Self {
        Checker::with_output(config, io::stdout())
    }
}

impl<W: Write> Checker<W> {
    /// Checker that prints progress to `out`.
    pub fn with_output(config: Config, out: W) -> Self {
        Checker { config, out }
    }

    /// Give back the progress sink, e.g. to inspect what a test run printed.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the songs group, then the playlists group.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Checking catalog API at {} ...",
            self.config.client.base_url()
        );
        self.run_songs().await?;
        writeln!(self.out)?;
        self.run_playlists().await?;
        writeln!(self.out, "\nAll endpoint tests passed successfully.")?;
        info!("All checks passed");
        Ok(())
    }

    /// Songs group: list, filtered list, create, duplicate, update, delete.
    pub async fn run_songs(&mut self) -> Result<()> {
        writeln!(self.out, "----- Testing Songs Endpoints -----")?;
        self.check_list_songs(None).await?;
        self.check_list_songs(Some(SONG_FILTER)).await?;

        let payload = NewSong::new(TEST_SONG_TITLE, TEST_SONG_ARTIST);
        let song_id = self.check_create_song(&payload).await?;
        self.check_duplicate_song(&payload).await?;
        self.check_update_song(song_id, UPDATED_SONG_TITLE).await?;
        self.check_delete_song(song_id).await
    }

    /// Playlists group: list, create, fetch, add the seed song, fetch again.
    pub async fn run_playlists(&mut self) -> Result<()> {
        writeln!(self.out, "----- Testing Playlists Endpoints -----")?;
        self.check_list_playlists().await?;
        let playlist_id = self.check_create_playlist(TEST_PLAYLIST_NAME).await?;
        self.check_get_playlist(playlist_id).await?;

        let song_id = self.config.seed_song_id;
        self.check_add_song_to_playlist(playlist_id, song_id)
            .await?;
        self.check_playlist_contains(playlist_id, song_id).await
    }

    /// `GET /songs`, optionally filtered; expects 200 and a JSON array of songs.
    pub async fn check_list_songs(&mut self, filter: Option<&str>) -> Result<Vec<Song>> {
        let response = self
            .config
            .client
            .list_songs(filter)
            .await?
            .expect_status(StatusCode::OK)?
            .expect_json_content()?;
        let songs: Vec<Song> = response.json()?;
        writeln!(
            self.out,
            "GET {}: Retrieved {} songs",
            response.path,
            songs.len()
        )?;
        Ok(songs)
    }

    /// `POST /songs`; expects 201 and a truthy `id`, which is returned.
    pub async fn check_create_song(&mut self, song: &NewSong) -> Result<SongId> {
        let response = self
            .config
            .client
            .create_song(song)
            .await?
            .expect_status(StatusCode::CREATED)?
            .expect_json_content()?;
        let created: CreatedResource = response.json()?;
        let id = created
            .truthy_id()
            .ok_or_else(|| response.violation("No song id returned."))?;
        writeln!(self.out, "POST /songs: Created song with id {id}")?;
        Ok(id)
    }

    /// Re-submitting an existing `{title, artist}` pair must be rejected with 400.
    pub async fn check_duplicate_song(&mut self, song: &NewSong) -> Result<()> {
        self.config
            .client
            .create_song(song)
            .await?
            .expect_status(StatusCode::BAD_REQUEST)?;
        writeln!(
            self.out,
            "POST /songs (duplicate): Correctly rejected duplicate song."
        )?;
        Ok(())
    }

    /// `PATCH /songs/{id}`; expects 200 and the submitted title back.
    pub async fn check_update_song(&mut self, id: SongId, title: &str) -> Result<()> {
        let update = SongUpdate {
            title: title.to_string(),
        };
        let response = self
            .config
            .client
            .update_song(id, &update)
            .await?
            .expect_status(StatusCode::OK)?;
        let updated: UpdatedSong = response.json()?;
        if updated.title.as_deref() != Some(title) {
            return Err(response.violation(format!(
                "Song title was not updated (got {:?})",
                updated.title
            )));
        }
        writeln!(
            self.out,
            "PATCH /songs/{id}: Updated song title to '{title}'."
        )?;
        Ok(())
    }

    /// `DELETE /songs/{id}`; expects 200 and the deleted id back.
    pub async fn check_delete_song(&mut self, id: SongId) -> Result<()> {
        let response = self
            .config
            .client
            .delete_song(id)
            .await?
            .expect_status(StatusCode::OK)?;
        let deleted: DeletedSong = response.json()?;
        if deleted.id != Some(id) {
            return Err(response.violation(format!(
                "Deleted song id mismatch (expected {id}, got {:?})",
                deleted.id
            )));
        }
        writeln!(self.out, "DELETE /songs/{id}: Song deleted successfully.")?;
        Ok(())
    }

    /// `GET /playlists`; expects 200 and a JSON array of playlists.
    pub async fn check_list_playlists(&mut self) -> Result<Vec<Playlist>> {
        let response = self
            .config
            .client
            .list_playlists()
            .await?
            .expect_status(StatusCode::OK)?
            .expect_json_content()?;
        let playlists: Vec<Playlist> = response.json()?;
        writeln!(
            self.out,
            "GET /playlists: Retrieved {} playlists",
            playlists.len()
        )?;
        Ok(playlists)
    }

    /// `POST /playlists`; expects 201 and a truthy `id`, which is returned.
    pub async fn check_create_playlist(&mut self, name: &str) -> Result<PlaylistId> {
        let payload = NewPlaylist {
            name: name.to_string(),
        };
        let response = self
            .config
            .client
            .create_playlist(&payload)
            .await?
            .expect_status(StatusCode::CREATED)?;
        let created: CreatedResource = response.json()?;
        let id = created
            .truthy_id()
            .ok_or_else(|| response.violation("No playlist id returned."))?;
        writeln!(self.out, "POST /playlists: Created playlist with id {id}")?;
        Ok(id)
    }

    /// Fetch one playlist. An echoed `id` must match the requested one.
    pub async fn check_get_playlist(&mut self, id: PlaylistId) -> Result<PlaylistDetails> {
        let (_, playlist) = self.fetch_playlist(id).await?;
        Ok(playlist)
    }

    async fn fetch_playlist(
        &mut self,
        id: PlaylistId,
    ) -> Result<(CatalogResponse, PlaylistDetails)> {
        let response = self
            .config
            .client
            .get_playlist(id)
            .await?
            .expect_status(StatusCode::OK)?;
        let playlist: PlaylistDetails = response.json()?;
        if let Some(actual) = playlist.id
            && actual != id
        {
            return Err(response.violation(format!(
                "Playlist id mismatch (expected {id}, got {actual})"
            )));
        }
        writeln!(
            self.out,
            "GET /playlists/{id}: Retrieved playlist '{}' with {} songs.",
            playlist.name.as_deref().unwrap_or_default(),
            playlist.song_ids.len()
        )?;
        Ok((response, playlist))
    }

    /// `POST /playlists/{playlist_id}/songs/{song_id}`; expects 200 and the song in `songIds`.
    pub async fn check_add_song_to_playlist(
        &mut self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<()> {
        let response = self
            .config
            .client
            .add_song_to_playlist(playlist_id, song_id)
            .await?
            .expect_status(StatusCode::OK)?;
        let playlist: PlaylistDetails = response.json()?;
        if !playlist.contains(song_id) {
            return Err(response.violation(format!(
                "Song {song_id} was not added to playlist {playlist_id}"
            )));
        }
        writeln!(
            self.out,
            "POST /playlists/{playlist_id}/songs/{song_id}: Song added successfully."
        )?;
        Ok(())
    }

    /// Re-fetch the playlist and require `song_id` among its members.
    pub async fn check_playlist_contains(
        &mut self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<()> {
        let (response, playlist) = self.fetch_playlist(playlist_id).await?;
        if !playlist.contains(song_id) {
            return Err(response.violation(format!(
                "Song id {song_id} not present in playlist songIds"
            )));
        }
        debug!("Playlist {playlist_id} holds song {song_id}");
        Ok(())
    }
}
