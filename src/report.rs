use crate::models::SessionSnapshot;
use crate::scoring::{ReviewSession, ScoredTrack, SessionSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One track as it appeared in the session, keyed by listening rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAnalysis {
    pub position: usize, // 1-based rank in the top tracks list
    pub track_name: String,
    pub artist_name: String,
    pub genres: Vec<String>,
    pub cool_score: Option<f64>,
    pub is_scored: bool,
}

impl TrackAnalysis {
    /// Number `scored` by input order, which is the listening rank
    pub fn from_scored(scored: &[ScoredTrack]) -> Vec<Self> {
        scored
            .iter()
            .enumerate()
            .map(|(i, track)| Self {
                position: i + 1,
                track_name: track.track_name.clone(),
                artist_name: track.artist_name.clone(),
                genres: track.genres.clone(),
                cool_score: track.cool_score,
                is_scored: track.is_scored(),
            })
            .collect()
    }
}

/// Everything recorded about a finished review session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub username: String,
    pub user_id: Option<String>,
    pub session: ReviewSession,
    pub completed_at: DateTime<Utc>,
    pub summary: SessionSummary,
    pub tracks: Vec<TrackAnalysis>,
}

impl SessionReport {
    /// Stamp the session as completed now
    pub fn new(
        snapshot: &SessionSnapshot,
        session: &ReviewSession,
        scored: &[ScoredTrack],
        summary: SessionSummary,
    ) -> Self {
        Self {
            username: snapshot.username.clone(),
            user_id: snapshot.user_id.clone(),
            session: session.clone(),
            completed_at: Utc::now(),
            summary,
            tracks: TrackAnalysis::from_scored(scored),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write session report {}", path.display()))?;
        Ok(())
    }
}
