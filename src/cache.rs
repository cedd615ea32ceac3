use crate::models::{ArtistMetadata, SpotifyTrack};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What an upsert did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    Unchanged,
}

/// Track attributes that change over time and are worth keeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub artist_id: Option<String>, // Primary artist only
    pub popularity: u32,
    pub explicit: bool,
}

impl From<&SpotifyTrack> for TrackRecord {
    fn from(track: &SpotifyTrack) -> Self {
        Self {
            name: track.name.clone(),
            artist_id: track.primary_artist().and_then(|a| a.id.clone()),
            popularity: track.popularity,
            explicit: track.explicit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<T> {
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn upsert_entry<T: PartialEq>(entries: &mut BTreeMap<String, Cached<T>>, id: &str, data: T) -> Upsert {
    let now = Utc::now();
    match entries.get_mut(id) {
        Some(existing) if existing.data == data => Upsert::Unchanged,
        Some(existing) => {
            existing.data = data;
            existing.updated_at = now;
            Upsert::Updated
        }
        None => {
            entries.insert(
                id.to_string(),
                Cached {
                    data,
                    created_at: now,
                    updated_at: now,
                },
            );
            Upsert::Created
        }
    }
}

/// Artist and track records keyed by catalog id, persisted as JSON.
///
/// Write-through only: the cache records what was fetched and is never read
/// back into scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogCache {
    #[serde(default)]
    artists: BTreeMap<String, Cached<ArtistMetadata>>,
    #[serde(default)]
    tracks: BTreeMap<String, Cached<TrackRecord>>,
}

impl CatalogCache {
    /// Load the cache from disk; a missing file yields an empty cache
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog cache {}", path.display()))?;
        let cache = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog cache {}", path.display()))?;
        Ok(cache)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write catalog cache {}", path.display()))?;
        Ok(())
    }

    /// Insert or refresh an artist. Re-storing identical data is a no-op.
    pub fn upsert_artist(&mut self, id: &str, metadata: ArtistMetadata) -> Upsert {
        upsert_entry(&mut self.artists, id, metadata)
    }

    /// Insert or refresh a track; popularity and explicitness are updated in place
    pub fn upsert_track(&mut self, id: &str, record: TrackRecord) -> Upsert {
        upsert_entry(&mut self.tracks, id, record)
    }

    pub fn artist(&self, id: &str) -> Option<&ArtistMetadata> {
        self.artists.get(id).map(|cached| &cached.data)
    }

    pub fn track(&self, id: &str) -> Option<&TrackRecord> {
        self.tracks.get(id).map(|cached| &cached.data)
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(popularity: u32) -> ArtistMetadata {
        ArtistMetadata {
            name: "Have a Nice Life".to_string(),
            genres: vec!["shoegaze".to_string(), "post-punk".to_string()],
            popularity: Some(popularity),
            followers: Some(90_000),
        }
    }

    fn track(popularity: u32, explicit: bool) -> TrackRecord {
        TrackRecord {
            name: "Bloodhail".to_string(),
            artist_id: Some("a1".to_string()),
            popularity,
            explicit,
        }
    }

    #[test]
    fn test_artist_upsert_created_then_unchanged() {
        let mut cache = CatalogCache::default();

        assert_eq!(cache.upsert_artist("a1", artist(40)), Upsert::Created);
        let stamp = cache.artists["a1"].updated_at;

        assert_eq!(cache.upsert_artist("a1", artist(40)), Upsert::Unchanged);
        assert_eq!(cache.artists["a1"].updated_at, stamp);
        assert_eq!(cache.artist_count(), 1);
    }

    #[test]
    fn test_artist_upsert_updates_changed_fields() {
        let mut cache = CatalogCache::default();
        cache.upsert_artist("a1", artist(40));

        assert_eq!(cache.upsert_artist("a1", artist(55)), Upsert::Updated);
        assert_eq!(cache.artist("a1").unwrap().popularity, Some(55));
        assert_eq!(cache.artist_count(), 1);
    }

    #[test]
    fn test_track_upsert_lifecycle() {
        let mut cache = CatalogCache::default();

        assert_eq!(cache.upsert_track("t1", track(30, false)), Upsert::Created);
        let created = cache.tracks["t1"].created_at;
        assert_eq!(cache.upsert_track("t1", track(30, false)), Upsert::Unchanged);

        assert_eq!(cache.upsert_track("t1", track(35, true)), Upsert::Updated);
        let stored = cache.track("t1").unwrap();
        assert_eq!(stored.popularity, 35);
        assert!(stored.explicit);
        assert_eq!(cache.tracks["t1"].created_at, created);
        assert_eq!(cache.track_count(), 1);
    }

    #[test]
    fn test_track_record_from_spotify_track() {
        let json = r#"{"id":"t1","name":"Song","explicit":true,"popularity":12,
            "artists":[{"id":"a1","name":"Main"},{"id":"a2","name":"Feature"}]}"#;
        let spotify: SpotifyTrack = serde_json::from_str(json).unwrap();
        let record = TrackRecord::from(&spotify);

        assert_eq!(record.artist_id.as_deref(), Some("a1"));
        assert_eq!(record.popularity, 12);
        assert!(record.explicit);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(cache.artist_count(), 0);
        assert_eq!(cache.track_count(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut cache = CatalogCache::default();
        cache.upsert_artist("a1", artist(40));
        cache.upsert_artist("a2", ArtistMetadata::unknown("Mystery"));
        cache.upsert_track("t1", track(30, true));
        cache.save(&path).unwrap();

        let loaded = CatalogCache::load(&path).unwrap();
        assert_eq!(loaded.artist_count(), 2);
        assert_eq!(loaded.artist("a1"), Some(&artist(40)));
        assert_eq!(loaded.artist("a2").unwrap().followers, None);
        assert_eq!(loaded.track("t1"), Some(&track(30, true)));
        assert_eq!(loaded.tracks["t1"].updated_at, cache.tracks["t1"].updated_at);
    }

    #[test]
    fn test_artist_only_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"artists":{"a1":{"name":"Duster","genres":["slowcore"],"popularity":30,
                "followers":1000,"created_at":"2025-01-01T00:00:00Z",
                "updated_at":"2025-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();

        let loaded = CatalogCache::load(&path).unwrap();
        assert_eq!(loaded.artist_count(), 1);
        assert_eq!(loaded.track_count(), 0);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(CatalogCache::load(&path).is_err());
    }
}
