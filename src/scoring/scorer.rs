use super::genres::CoolGenres;
use super::summary::round2;
use crate::models::TrackInput;
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: f64 = 100.0;
pub const GENRE_BONUS: u32 = 50;
pub const EXPLICIT_BONUS: u32 = 5;

/// (exclusive upper bound, bonus), first matching band wins
const ARTIST_POPULARITY_BANDS: [(u32, u32); 6] =
    [(50, 18), (60, 14), (70, 10), (80, 6), (90, 4), (100, 2)];

const FOLLOWER_BANDS: [(u64, u32); 10] = [
    (100_000, 16),
    (200_000, 14),
    (300_000, 13),
    (400_000, 12),
    (500_000, 11),
    (600_000, 10),
    (700_000, 9),
    (800_000, 8),
    (900_000, 7),
    (1_000_000, 6),
];

const TRACK_POPULARITY_BANDS: [(u32, u32); 6] =
    [(50, 11), (60, 9), (70, 7), (80, 5), (90, 3), (100, 1)];

fn band_bonus<T: PartialOrd>(value: T, bands: &[(T, u32)]) -> u32 {
    bands
        .iter()
        .find(|(upper, _)| value < *upper)
        .map_or(0, |(_, bonus)| *bonus)
}

/// Less popular artists earn more; absent popularity earns nothing
pub fn artist_popularity_bonus(popularity: Option<u32>) -> u32 {
    popularity.map_or(0, |p| band_bonus(p, &ARTIST_POPULARITY_BANDS))
}

/// Smaller audiences earn more; a million followers or more earns nothing
pub fn follower_bonus(followers: Option<u64>) -> u32 {
    followers.map_or(0, |f| band_bonus(f, &FOLLOWER_BANDS))
}

pub fn track_popularity_bonus(popularity: u32) -> u32 {
    band_bonus(popularity, &TRACK_POPULARITY_BANDS)
}

/// Per-rule contributions to one track's cool score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub genre: u32,
    pub explicit: u32,
    pub artist_popularity: u32,
    pub followers: u32,
    pub track_popularity: u32,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> u32 {
        self.genre + self.explicit + self.artist_popularity + self.followers + self.track_popularity
    }

    /// Total capped at 100 and rounded to two decimals
    pub fn final_score(&self) -> f64 {
        round2((self.raw_total() as f64).min(MAX_SCORE))
    }
}

/// Scoring output for one track, carrying what the results view displays.
///
/// Serialized with an explicit `is_scored` flag; on the way back in the flag
/// is recomputed from `cool_score`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ScoredTrackRecord", from = "ScoredTrackRecord")]
pub struct ScoredTrack {
    pub track_name: String,
    pub artist_name: String,
    pub track_popularity: u32,
    pub genres: Vec<String>,
    pub cool_score: Option<f64>, // None means unscored, not zero
}

impl ScoredTrack {
    pub fn is_scored(&self) -> bool {
        self.cool_score.is_some()
    }
}

#[derive(Serialize, Deserialize)]
struct ScoredTrackRecord {
    track_name: String,
    artist_name: String,
    track_popularity: u32,
    genres: Vec<String>,
    cool_score: Option<f64>,
    #[serde(default)]
    is_scored: bool,
}

impl From<ScoredTrack> for ScoredTrackRecord {
    fn from(track: ScoredTrack) -> Self {
        Self {
            is_scored: track.is_scored(),
            track_name: track.track_name,
            artist_name: track.artist_name,
            track_popularity: track.track_popularity,
            genres: track.genres,
            cool_score: track.cool_score,
        }
    }
}

impl From<ScoredTrackRecord> for ScoredTrack {
    fn from(record: ScoredTrackRecord) -> Self {
        Self {
            track_name: record.track_name,
            artist_name: record.artist_name,
            track_popularity: record.track_popularity,
            genres: record.genres,
            cool_score: record.cool_score,
        }
    }
}

/// Computes cool scores against an injected genre set
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    cool_genres: CoolGenres,
}

impl Scorer {
    pub fn new(cool_genres: CoolGenres) -> Self {
        Self { cool_genres }
    }

    /// Rule-by-rule breakdown, or `None` when the artist has no genres
    pub fn breakdown(&self, track: &TrackInput) -> Option<ScoreBreakdown> {
        let artist = &track.artist;
        if artist.genres.is_empty() {
            return None;
        }

        Some(ScoreBreakdown {
            genre: if self.cool_genres.matches_any(&artist.genres) {
                GENRE_BONUS
            } else {
                0
            },
            explicit: if track.explicit { EXPLICIT_BONUS } else { 0 },
            artist_popularity: artist_popularity_bonus(artist.popularity),
            followers: follower_bonus(artist.followers),
            track_popularity: track_popularity_bonus(track.popularity),
        })
    }

    pub fn score(&self, track: &TrackInput) -> Option<f64> {
        self.breakdown(track).map(|breakdown| breakdown.final_score())
    }

    pub fn score_track(&self, track: &TrackInput) -> ScoredTrack {
        let cool_score = self.score(track);
        ScoredTrack {
            track_name: track.name.clone(),
            artist_name: track.artist.name.clone(),
            track_popularity: track.popularity,
            genres: if cool_score.is_some() {
                track.artist.genres.clone()
            } else {
                Vec::new()
            },
            cool_score,
        }
    }

    /// Score every track, keeping input order
    pub fn score_all(&self, tracks: &[TrackInput]) -> Vec<ScoredTrack> {
        tracks.iter().map(|track| self.score_track(track)).collect()
    }
}
