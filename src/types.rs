use serde::{Deserialize, Serialize};
use tabled::Tabled;
use thiserror::Error;

/// Anything that carries a service-assigned `videoId`.
///
/// Set operations over tracks (difference, dedup against existing items) key
/// on this value exclusively, never on the whole record.
pub trait Identified {
    fn video_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<ArtistCredit>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Identified for Track {
    fn video_id(&self) -> &str {
        &self.video_id
    }
}

fn default_available() -> bool {
    true
}

/// A track as it exists inside one specific playlist.
///
/// `set_video_id` identifies the occurrence, so the same `video_id` may appear
/// several times in a playlist as distinct items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(flatten)]
    pub track: Track,
    pub set_video_id: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub is_explicit: bool,
}

impl Identified for PlaylistItem {
    fn video_id(&self) -> &str {
        &self.track.video_id
    }
}

impl From<PlaylistItem> for Track {
    fn from(item: PlaylistItem) -> Self {
        item.track
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRef {
    pub playlist_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistListing {
    pub title: String,
    pub playlist_id: String,
    pub count: u32,
    pub description: String,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioListing {
    pub title: String,
    pub playlist_id: String,
    pub description: String,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListing {
    pub title: String,
    pub browse_id: String,
    pub kind: String,
    pub year: Option<String>,
    pub artists: Vec<ArtistCredit>,
    pub audio_playlist_id: Option<String>,
    pub is_explicit: bool,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistListing {
    pub title: String,
    pub browse_id: String,
    pub subscribers: String,
    pub thumbnails: Vec<Thumbnail>,
}

/// One entry of a home feed section.
///
/// The variant is decided once while deserializing, from the keys the service
/// sent: `videoId` makes a song, `subscribers` an artist, `type` an album, and
/// a `playlistId` is a playlist when it comes with a non-zero `count` and a
/// radio otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawListing", into = "RawListing")]
pub enum Listing {
    Song(Track),
    Playlist(PlaylistListing),
    Radio(RadioListing),
    Album(AlbumListing),
    Artist(ArtistListing),
}

impl Listing {
    pub fn title(&self) -> &str {
        match self {
            Listing::Song(track) => &track.title,
            Listing::Playlist(p) => &p.title,
            Listing::Radio(r) => &r.title,
            Listing::Album(a) => &a.title,
            Listing::Artist(a) => &a.title,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Listing::Song(_) => "song",
            Listing::Playlist(_) => "playlist",
            Listing::Radio(_) => "radio",
            Listing::Album(_) => "album",
            Listing::Artist(_) => "artist",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingShapeError {
    #[error("listing '{0}' has none of videoId, subscribers, type or playlistId")]
    Unrecognized(String),
    #[error("listing '{title}' is missing required field '{field}'")]
    MissingField { title: String, field: &'static str },
}

/// Wire shape of a listing, with every variant-specific key optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListing {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    browse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subscribers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_explicit: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    artists: Vec<ArtistCredit>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
}

impl RawListing {
    fn browse_id(&mut self) -> Result<String, ListingShapeError> {
        self.browse_id
            .take()
            .ok_or_else(|| ListingShapeError::MissingField {
                title: self.title.clone(),
                field: "browseId",
            })
    }
}

impl TryFrom<RawListing> for Listing {
    type Error = ListingShapeError;

    fn try_from(mut raw: RawListing) -> Result<Self, Self::Error> {
        if let Some(video_id) = raw.video_id.take() {
            return Ok(Listing::Song(Track {
                video_id,
                title: raw.title,
                artists: raw.artists,
                thumbnails: raw.thumbnails,
            }));
        }

        if let Some(subscribers) = raw.subscribers.take() {
            let browse_id = raw.browse_id()?;
            return Ok(Listing::Artist(ArtistListing {
                title: raw.title,
                browse_id,
                subscribers,
                thumbnails: raw.thumbnails,
            }));
        }

        if let Some(kind) = raw.kind.take() {
            let browse_id = raw.browse_id()?;
            return Ok(Listing::Album(AlbumListing {
                title: raw.title,
                browse_id,
                kind,
                year: raw.year,
                artists: raw.artists,
                audio_playlist_id: raw.audio_playlist_id,
                is_explicit: raw.is_explicit.unwrap_or(false),
                thumbnails: raw.thumbnails,
            }));
        }

        if let Some(playlist_id) = raw.playlist_id.take() {
            let description = raw.description.unwrap_or_default();
            return Ok(match raw.count {
                Some(count) if count > 0 => Listing::Playlist(PlaylistListing {
                    title: raw.title,
                    playlist_id,
                    count,
                    description,
                    thumbnails: raw.thumbnails,
                }),
                _ => Listing::Radio(RadioListing {
                    title: raw.title,
                    playlist_id,
                    description,
                    thumbnails: raw.thumbnails,
                }),
            });
        }

        Err(ListingShapeError::Unrecognized(raw.title))
    }
}

impl From<Listing> for RawListing {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Song(track) => RawListing {
                title: track.title,
                video_id: Some(track.video_id),
                artists: track.artists,
                thumbnails: track.thumbnails,
                ..Default::default()
            },
            Listing::Playlist(p) => RawListing {
                title: p.title,
                playlist_id: Some(p.playlist_id),
                count: Some(p.count),
                description: Some(p.description),
                thumbnails: p.thumbnails,
                ..Default::default()
            },
            Listing::Radio(r) => RawListing {
                title: r.title,
                playlist_id: Some(r.playlist_id),
                description: Some(r.description),
                thumbnails: r.thumbnails,
                ..Default::default()
            },
            Listing::Album(a) => RawListing {
                title: a.title,
                kind: Some(a.kind),
                browse_id: Some(a.browse_id),
                year: a.year,
                artists: a.artists,
                audio_playlist_id: a.audio_playlist_id,
                is_explicit: Some(a.is_explicit),
                thumbnails: a.thumbnails,
                ..Default::default()
            },
            Listing::Artist(a) => RawListing {
                title: a.title,
                browse_id: Some(a.browse_id),
                subscribers: Some(a.subscribers),
                thumbnails: a.thumbnails,
                ..Default::default()
            },
        }
    }
}

/// A named group of listings from a user's home feed, e.g. "Mixed for you".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    pub title: String,
    #[serde(default)]
    pub contents: Vec<Listing>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub title: String,
    pub id: String,
    pub tracks: String,
}

#[derive(Tabled)]
pub struct RoutineTableRow {
    pub name: String,
    pub program: String,
    pub description: String,
}

#[derive(Tabled)]
pub struct UserTableRow {
    pub name: String,
    pub playlists: usize,
    pub sections: usize,
    pub filter: String,
}
