use serde::{Deserialize, Serialize};

/// Snapshot of one artist's catalog attributes at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistMetadata {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>, // May be empty, which leaves the track unscored
    pub popularity: Option<u32>, // 0-100, absent when the catalog did not report it
    pub followers: Option<u64>,
}

impl ArtistMetadata {
    /// Placeholder for an artist whose lookup failed. Carries no genres, so
    /// any track attributed to it is left unscored rather than penalised.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genres: Vec::new(),
            popularity: None,
            followers: None,
        }
    }
}

impl From<SpotifyArtist> for ArtistMetadata {
    fn from(artist: SpotifyArtist) -> Self {
        Self {
            name: artist.name,
            genres: artist.genres,
            popularity: artist.popularity,
            followers: artist.followers.and_then(|f| f.total),
        }
    }
}

/// One listened-to track together with its primary artist's metadata.
///
/// Popularity values are expected in `[0, 100]`; callers building this from
/// API responses are responsible for that range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInput {
    pub name: String,
    #[serde(default)]
    pub explicit: bool,
    pub popularity: u32,
    pub artist: ArtistMetadata,
}

/// Offline input for scoring without talking to the catalog API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub user_id: Option<String>, // Catalog account id, absent for hand-made snapshots
    pub tracks: Vec<TrackInput>,
}

pub fn default_username() -> String {
    "there".to_string()
}

impl SessionSnapshot {
    /// Load a snapshot from a JSON file
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: SessionSnapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }
}

/// Artist reference embedded in a track object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtistRef {
    pub id: Option<String>, // Local files have no catalog id
    pub name: String,
}

/// Track object as returned by `/v1/me/top/tracks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: u32,
    pub artists: Vec<SpotifyArtistRef>,
}

impl SpotifyTrack {
    /// The first-listed artist; featured artists are ignored
    pub fn primary_artist(&self) -> Option<&SpotifyArtistRef> {
        self.artists.first()
    }
}

/// Response structure for the top tracks call
#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<SpotifyTrack>,
}

/// Full artist object as returned by `/v1/artists/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    pub followers: Option<Followers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Followers {
    pub total: Option<u64>,
}

/// Response structure for `/v1/me`
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn greeting_name(&self) -> String {
        self.display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(default_username)
    }
}

/// Response structure for the authorization code exchange
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_conversion_keeps_missing_fields_absent() {
        let json = r#"{"id":"a1","name":"Duster","genres":["slowcore"],"popularity":null}"#;
        let artist: SpotifyArtist = serde_json::from_str(json).unwrap();
        let metadata = ArtistMetadata::from(artist);

        assert_eq!(metadata.genres, vec!["slowcore".to_string()]);
        assert_eq!(metadata.popularity, None);
        assert_eq!(metadata.followers, None);
    }

    #[test]
    fn test_artist_conversion_reads_follower_total() {
        let json = r#"{"id":"a1","name":"Duster","genres":[],"popularity":0,"followers":{"href":null,"total":0}}"#;
        let artist: SpotifyArtist = serde_json::from_str(json).unwrap();
        let metadata = ArtistMetadata::from(artist);

        // Zero must stay distinguishable from absent
        assert_eq!(metadata.popularity, Some(0));
        assert_eq!(metadata.followers, Some(0));
    }

    #[test]
    fn test_primary_artist_is_first_listed() {
        let json = r#"{"id":"t1","name":"Song","explicit":true,"popularity":12,
            "artists":[{"id":"a1","name":"Main"},{"id":"a2","name":"Feature"}]}"#;
        let track: SpotifyTrack = serde_json::from_str(json).unwrap();

        assert_eq!(track.primary_artist().unwrap().name, "Main");
    }

    #[test]
    fn test_greeting_name_fallback() {
        let anonymous = UserProfile {
            id: "u1".to_string(),
            display_name: None,
        };
        let blank = UserProfile {
            id: "u2".to_string(),
            display_name: Some("  ".to_string()),
        };
        let named = UserProfile {
            id: "u3".to_string(),
            display_name: Some("Sam".to_string()),
        };

        assert_eq!(anonymous.greeting_name(), "there");
        assert_eq!(blank.greeting_name(), "there");
        assert_eq!(named.greeting_name(), "Sam");
    }

    #[test]
    fn test_token_response_ignores_unused_fields() {
        let json = r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600,
            "refresh_token":"def","scope":"user-top-read"}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();

        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_snapshot_defaults_username() {
        let json = r#"{"tracks":[{"name":"Song","popularity":40,
            "artist":{"name":"A","genres":["emo"],"popularity":30,"followers":1000}}]}"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.username, "there");
        assert_eq!(snapshot.user_id, None);
        assert!(!snapshot.tracks[0].explicit);
        assert_eq!(snapshot.tracks[0].artist.followers, Some(1000));
    }
}
