use crate::{
    config::Settings,
    service::{MusicService, read_or_empty},
    types::{Listing, Track},
};

/// Fetches the tracks a listing stands for.
///
/// A song resolves to itself without a service call. Every other variant goes
/// through its own endpoint; failures are logged and resolve to nothing.
pub async fn resolve<S>(service: &S, listing: &Listing, settings: &Settings) -> Vec<Track>
where
    S: MusicService + ?Sized,
{
    let timeout = settings.fetch_timeout;
    let tracks = match listing {
        Listing::Song(track) => vec![track.clone()],
        Listing::Playlist(playlist) => read_or_empty(
            timeout,
            "get_playlist_tracks",
            service.get_playlist_tracks(&playlist.playlist_id),
        )
        .await
        .into_iter()
        .map(Track::from)
        .collect(),
        Listing::Radio(radio) => {
            read_or_empty(
                timeout,
                "get_radio_tracks",
                service.get_radio_tracks(&radio.playlist_id),
            )
            .await
        }
        Listing::Album(album) => {
            read_or_empty(
                timeout,
                "get_album_tracks",
                service.get_album_tracks(&album.browse_id),
            )
            .await
        }
        Listing::Artist(artist) => {
            read_or_empty(
                timeout,
                "get_artist_tracks",
                service.get_artist_tracks(&artist.browse_id),
            )
            .await
        }
    };

    tracing::debug!(
        kind = listing.kind(),
        title = listing.title(),
        tracks = tracks.len(),
        "listing resolved"
    );
    tracks
}
