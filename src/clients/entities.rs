use serde::{Deserialize, Serialize};

/// Identifier the catalog assigns to a song.
pub type SongId = u64;
/// Identifier the catalog assigns to a playlist.
pub type PlaylistId = u64;

/// A song as returned by the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Catalog identifier
    pub id: SongId,
    /// Song title
    pub title: String,
    /// Performing artist(s), as a single display string
    pub artist: String,
}

/// A playlist as returned by the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Catalog identifier
    pub id: PlaylistId,
    /// Playlist name
    pub name: String,
    /// Member songs, absent means empty
    #[serde(default, rename = "songIds")]
    pub song_ids: Vec<SongId>,
}

/// Body of `POST /songs`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    /// Song title
    pub title: String,
    /// Performing artist
    pub artist: String,
}

impl NewSong {
    /// Build a payload from borrowed strings.
    pub fn new(title: &str, artist: &str) -> Self {
        NewSong {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }
}

/// Body of `PATCH /songs/{id}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SongUpdate {
    /// Replacement title
    pub title: String,
}

/// Body of `POST /playlists`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    /// Playlist name
    pub name: String,
}

/// Minimal shape of a creation response: only `id` is required to be present and truthy.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreatedResource {
    /// Identifier of the new resource, if the server sent one
    #[serde(default)]
    pub id: Option<u64>,
}

impl CreatedResource {
    /// The identifier, unless it is missing or zero.
    pub fn truthy_id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}

/// Body of a song deletion response.
#[derive(Deserialize, Debug, Clone)]
pub struct DeletedSong {
    /// Identifier of the removed song, if the server sent one
    #[serde(default)]
    pub id: Option<SongId>,
}

/// Body of a single-playlist fetch. Only the fields checked by the harness are required.
#[derive(Deserialize, Debug, Clone)]
pub struct PlaylistDetails {
    /// Identifier, when the server echoes it
    #[serde(default)]
    pub id: Option<PlaylistId>,
    /// Playlist name
    #[serde(default)]
    pub name: Option<String>,
    /// Member songs, absent means empty
    #[serde(default, rename = "songIds")]
    pub song_ids: Vec<SongId>,
}

impl PlaylistDetails {
    /// Whether `song_id` is a member of the playlist.
    pub fn contains(&self, song_id: SongId) -> bool {
        self.song_ids.contains(&song_id)
    }
}

/// Body of a song update response. `title` is compared against the submitted value.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdatedSong {
    /// Title after the update, if the server sent one
    #[serde(default)]
    pub title: Option<String>,
}
