use crate::cache::{CatalogCache, TrackRecord};
use crate::config::Config;
use crate::models::{
    ArtistMetadata, SessionSnapshot, SpotifyArtist, SpotifyTrack, TokenResponse,
    TopTracksResponse, TrackInput, UserProfile, default_username,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};
use ureq::Agent;
use urlencoding::encode;

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";
const SCOPES: &str = "user-top-read user-read-private";
pub const TOP_TRACKS_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => ClientError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}

/// The catalog calls a review session needs
#[cfg_attr(test, mockall::automock)]
pub trait CatalogApi {
    fn current_user(&self) -> Result<UserProfile, ClientError>;
    fn top_tracks(&self, limit: u32) -> Result<Vec<SpotifyTrack>, ClientError>;
    fn artist(&self, id: &str) -> Result<SpotifyArtist, ClientError>;
}

/// Build the login URL the user visits to grant access
pub fn authorize_url(config: &Config, state: &str) -> String {
    format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
        AUTHORIZE_URL,
        encode(&config.client_id),
        encode(&config.redirect_uri),
        encode(SCOPES),
        encode(state)
    )
}

/// Opaque value tying an authorization callback to the request that started it
pub fn generate_state() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!(
        "{:x}",
        md5::compute(format!("{}{}spotijudge", nanos, rand::random::<u64>()))
    )[..16]
        .to_string()
}

/// A blocking Spotify Web API client holding a bearer token
pub struct SpotifyClient {
    agent: Agent,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(access_token: String) -> Self {
        SpotifyClient {
            agent: Agent::new(),
            access_token,
        }
    }

    /// Exchange an authorization code from the login callback for a client
    pub fn exchange_code(config: &Config, code: &str) -> Result<Self, ClientError> {
        let agent = Agent::new();
        let credentials =
            STANDARD.encode(format!("{}:{}", config.client_id, config.client_secret));

        let response = agent
            .post(TOKEN_URL)
            .set("Authorization", &format!("Basic {credentials}"))
            .send_form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", config.redirect_uri.as_str()),
            ])?;
        let token: TokenResponse = response.into_json()?;
        debug!(
            "Obtained {} token, expires in {}s",
            token.token_type, token.expires_in
        );

        Ok(SpotifyClient {
            agent,
            access_token: token.access_token,
        })
    }

    fn get(&self, path: &str) -> Result<ureq::Response, ClientError> {
        let url = format!("{API_BASE_URL}{path}");
        debug!("GET {url}");
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .call()?;
        Ok(response)
    }
}

impl CatalogApi for SpotifyClient {
    fn current_user(&self) -> Result<UserProfile, ClientError> {
        Ok(self.get("/me")?.into_json()?)
    }

    fn top_tracks(&self, limit: u32) -> Result<Vec<SpotifyTrack>, ClientError> {
        let response: TopTracksResponse = self
            .get(&format!("/me/top/tracks?limit={limit}"))?
            .into_json()?;
        Ok(response.items)
    }

    fn artist(&self, id: &str) -> Result<SpotifyArtist, ClientError> {
        Ok(self.get(&format!("/artists/{}", encode(id)))?.into_json()?)
    }
}

/// Resolve each track's primary artist and build scoring inputs.
///
/// Every unique artist is fetched once. A failed lookup never aborts the
/// session: the track gets an artist with no genres and is left unscored.
/// When a `cache` is given, successful artist lookups and every track with a
/// catalog id are upserted into it.
pub fn collect_track_inputs(
    api: &impl CatalogApi,
    tracks: &[SpotifyTrack],
    mut cache: Option<&mut CatalogCache>,
) -> Vec<TrackInput> {
    let mut artist_ids = Vec::new();
    let mut seen_ids = HashSet::new();
    for track in tracks {
        if let Some(id) = track.primary_artist().and_then(|a| a.id.as_deref()) {
            if seen_ids.insert(id) {
                artist_ids.push(id);
            }
        }
    }

    let mut metadata: HashMap<&str, ArtistMetadata> = HashMap::new();
    for id in artist_ids {
        match api.artist(id) {
            Ok(artist) => {
                let artist = ArtistMetadata::from(artist);
                if let Some(cache) = cache.as_deref_mut() {
                    let outcome = cache.upsert_artist(id, artist.clone());
                    debug!("Cache {:?} for artist {}", outcome, artist.name);
                }
                metadata.insert(id, artist);
            }
            Err(e) => warn!("Failed to get data for artist {id}: {e}"),
        }
    }

    if let Some(cache) = cache {
        for track in tracks {
            if let Some(id) = track.id.as_deref() {
                let outcome = cache.upsert_track(id, TrackRecord::from(track));
                debug!("Cache {:?} for track {}", outcome, track.name);
            }
        }
    }

    tracks
        .iter()
        .map(|track| {
            let primary = track.primary_artist();
            let artist = primary
                .and_then(|a| a.id.as_deref())
                .and_then(|id| metadata.get(id).cloned())
                .unwrap_or_else(|| {
                    ArtistMetadata::unknown(primary.map_or("Unknown", |a| a.name.as_str()))
                });
            if artist.genres.is_empty() {
                info!(
                    "Track with no genres (unscored): {} by {}",
                    track.name, artist.name
                );
            }
            TrackInput {
                name: track.name.clone(),
                explicit: track.explicit,
                popularity: track.popularity,
                artist,
            }
        })
        .collect()
}

/// Fetch everything one review session needs from the catalog
pub fn fetch_session(
    api: &impl CatalogApi,
    cache: Option<&mut CatalogCache>,
) -> Result<SessionSnapshot, ClientError> {
    let (username, user_id) = match api.current_user() {
        Ok(profile) => (profile.greeting_name(), Some(profile.id)),
        Err(e) => {
            warn!("Failed to get user profile: {e}");
            (default_username(), None)
        }
    };

    let tracks = api.top_tracks(TOP_TRACKS_LIMIT)?;
    info!("Fetched {} top tracks for {}", tracks.len(), username);

    Ok(SessionSnapshot {
        username,
        user_id,
        tracks: collect_track_inputs(api, &tracks, cache),
    })
}
