use super::scorer::ScoredTrack;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the review flow goes after the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    Review(usize),
    Results,
}

/// Explicit review position, passed around by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSession {
    pub session_id: Uuid,
    pub track_index: usize,
    pub created_at: DateTime<Utc>,
}

impl ReviewSession {
    pub fn start() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(session_id: Uuid) -> Self {
        Self {
            session_id,
            track_index: 0,
            created_at: Utc::now(),
        }
    }

    /// An index past the end resets to the first track, so coming back from
    /// the results view restarts the review.
    pub fn normalized(&self, len: usize) -> Self {
        let track_index = if self.track_index >= len {
            0
        } else {
            self.track_index
        };
        Self {
            track_index,
            ..self.clone()
        }
    }

    /// Step past the current track. Never wraps around to the start.
    pub fn advance(&self, len: usize) -> (Self, ReviewStep) {
        let next = self.normalized(len).track_index + 1;
        let step = if next >= len {
            ReviewStep::Results
        } else {
            ReviewStep::Review(next)
        };
        let session = Self {
            track_index: next,
            ..self.clone()
        };
        (session, step)
    }

    pub fn current<'a>(&self, tracks: &'a [ScoredTrack]) -> Option<&'a ScoredTrack> {
        tracks.get(self.normalized(tracks.len()).track_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<ScoredTrack> {
        (0..n)
            .map(|i| ScoredTrack {
                track_name: format!("Track {i}"),
                artist_name: "Artist".to_string(),
                track_popularity: 50,
                genres: Vec::new(),
                cool_score: None,
            })
            .collect()
    }

    #[test]
    fn test_advance_walks_then_reaches_results() {
        let list = tracks(3);
        let session = ReviewSession::start();
        assert_eq!(session.current(&list).unwrap().track_name, "Track 0");

        let (session, step) = session.advance(list.len());
        assert_eq!(step, ReviewStep::Review(1));
        assert_eq!(session.current(&list).unwrap().track_name, "Track 1");

        let (session, step) = session.advance(list.len());
        assert_eq!(step, ReviewStep::Review(2));

        let (session, step) = session.advance(list.len());
        assert_eq!(step, ReviewStep::Results);
        assert_eq!(session.track_index, 3);
    }

    #[test]
    fn test_reentering_review_restarts_at_first_track() {
        let list = tracks(2);
        let mut session = ReviewSession::start();
        session.track_index = 2;

        assert_eq!(session.normalized(list.len()).track_index, 0);
        assert_eq!(session.current(&list).unwrap().track_name, "Track 0");

        // Advancing from an out-of-range index starts from the reset position
        let (_, step) = session.advance(list.len());
        assert_eq!(step, ReviewStep::Review(1));
    }

    #[test]
    fn test_advance_is_pure() {
        let session = ReviewSession::start();
        let (first, _) = session.advance(5);
        let (second, _) = session.advance(5);

        assert_eq!(session.track_index, 0);
        assert_eq!(first, second);
        assert_eq!(first.session_id, session.session_id);
    }

    #[test]
    fn test_single_track_goes_straight_to_results() {
        let (_, step) = ReviewSession::start().advance(1);
        assert_eq!(step, ReviewStep::Results);
    }

    #[test]
    fn test_empty_session_has_no_current_track() {
        let session = ReviewSession::start();
        assert!(session.current(&[]).is_none());
        assert_eq!(session.advance(0).1, ReviewStep::Results);
    }
}
