use super::scorer::ScoredTrack;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Round to two decimal places, exact halves going to the even neighbour
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Commentary tier picked from a session's final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commentary {
    Legendary,
    Solid,
    Decent,
    RightTrack,
    Mainstream,
    VeryMainstream,
}

impl Commentary {
    /// Inclusive lower bounds: 90, 80, 70, 60, 50
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            Commentary::Legendary
        } else if score >= 80.0 {
            Commentary::Solid
        } else if score >= 70.0 {
            Commentary::Decent
        } else if score >= 60.0 {
            Commentary::RightTrack
        } else if score >= 50.0 {
            Commentary::Mainstream
        } else {
            Commentary::VeryMainstream
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Commentary::Legendary => {
                "absolutely legendary taste! you're discovering the underground gems that matter."
            }
            Commentary::Solid => {
                "solid taste! you've got a good ear for quality music outside the mainstream."
            }
            Commentary::Decent => {
                "decent taste, but there's room for exploration in more underground territory."
            }
            Commentary::RightTrack => {
                "you're on the right track, but could dive deeper into more experimental sounds."
            }
            Commentary::Mainstream => {
                "pretty mainstream taste, but everyone starts somewhere. time to explore!"
            }
            Commentary::VeryMainstream => {
                "very mainstream taste detected. let's work on finding some hidden gems."
            }
        }
    }
}

impl fmt::Display for Commentary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Aggregate over the scored tracks of one review session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: f64,
    pub scored_count: usize,
    pub unscored_count: usize,
    pub total_tracks: usize,
    pub commentary: Commentary,
    pub ordered_tracks: Vec<ScoredTrack>, // Scored by score descending, then unscored in input order
}

/// Summarize a session's tracks.
///
/// The final score is the mean over scored tracks only, and is exactly `0.0`
/// when nothing was scored. The scored partition is stable-sorted so tracks
/// with equal scores keep their listening-rank order.
pub fn summarize(tracks: &[ScoredTrack]) -> SessionSummary {
    let (mut scored, unscored): (Vec<ScoredTrack>, Vec<ScoredTrack>) =
        tracks.iter().cloned().partition(ScoredTrack::is_scored);

    let final_score = if scored.is_empty() {
        0.0
    } else {
        let total: f64 = scored.iter().filter_map(|t| t.cool_score).sum();
        round2(total / scored.len() as f64)
    };

    // `sort_by` is stable
    scored.sort_by(|a, b| {
        let score_a = a.cool_score.unwrap_or(0.0);
        let score_b = b.cool_score.unwrap_or(0.0);
        score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
    });

    let scored_count = scored.len();
    let unscored_count = unscored.len();
    let mut ordered_tracks = scored;
    ordered_tracks.extend(unscored);

    SessionSummary {
        final_score,
        scored_count,
        unscored_count,
        total_tracks: tracks.len(),
        commentary: Commentary::for_score(final_score),
        ordered_tracks,
    }
}
