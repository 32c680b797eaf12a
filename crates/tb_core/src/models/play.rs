//! Recorded plays and their squashed movement tracks

use serde::{Deserialize, Deserializer, Serialize};

use super::entity::EntitySet;
use super::position::Position;

/// Squashed movement log, frame-major
///
/// `home_team[frame][player]`, `away_team[frame][player]`, `ball_position[frame]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementTrack {
    pub home_team: Vec<Vec<Position>>,
    pub away_team: Vec<Vec<Position>>,
    pub ball_position: Vec<Position>,
}

/// One frame of a track, borrowed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub home_team: &'a [Position],
    pub away_team: &'a [Position],
    pub ball_position: Position,
}

impl Frame<'_> {
    pub fn to_entity_set(&self) -> EntitySet {
        EntitySet::new(self.home_team.to_vec(), self.away_team.to_vec(), self.ball_position)
    }
}

impl MovementTrack {
    /// Track holding a single frame: the given snapshot.
    pub fn single_frame(snapshot: &EntitySet) -> Self {
        Self {
            home_team: vec![snapshot.home_team.clone()],
            away_team: vec![snapshot.away_team.clone()],
            ball_position: vec![snapshot.ball_position],
        }
    }

    /// Common frame count `F`, or `None` when the branches disagree or a frame has
    /// a roster size different from frame 0.
    pub fn frame_count(&self) -> Option<usize> {
        let frames = self.ball_position.len();
        if self.home_team.len() != frames || self.away_team.len() != frames {
            return None;
        }

        let home_players = self.home_team.first().map_or(0, Vec::len);
        let away_players = self.away_team.first().map_or(0, Vec::len);
        let uniform = self.home_team.iter().all(|f| f.len() == home_players)
            && self.away_team.iter().all(|f| f.len() == away_players);

        uniform.then_some(frames)
    }

    /// A track the scheduler can replay: consistent and at least one frame long.
    pub fn is_playable(&self) -> bool {
        matches!(self.frame_count(), Some(f) if f > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.ball_position.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<Frame<'_>> {
        Some(Frame {
            home_team: self.home_team.get(index)?,
            away_team: self.away_team.get(index)?,
            ball_position: *self.ball_position.get(index)?,
        })
    }

    /// Roster sizes as `(home, away)`, read from frame 0.
    pub fn roster_counts(&self) -> (usize, usize) {
        (
            self.home_team.first().map_or(0, Vec::len),
            self.away_team.first().map_or(0, Vec::len),
        )
    }
}

/// A named, persisted recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Starting snapshot (frame 0), kept for list previews
    pub home_team: Vec<Position>,
    pub away_team: Vec<Position>,
    pub ball_position: Position,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_track"
    )]
    pub movements: Option<MovementTrack>,
}

impl Play {
    /// Starting snapshot stored at the top level of the play.
    pub fn snapshot(&self) -> EntitySet {
        EntitySet::new(self.home_team.clone(), self.away_team.clone(), self.ball_position)
    }

    /// Movement track, only when it can actually be replayed.
    pub fn playable_track(&self) -> Option<&MovementTrack> {
        self.movements.as_ref().filter(|t| t.is_playable())
    }

    pub fn frame_count(&self) -> usize {
        self.playable_track().and_then(MovementTrack::frame_count).unwrap_or(0)
    }
}

/// A `movements` value that does not decode as a track degrades to `None`.
fn lenient_track<'de, D>(deserializer: D) -> Result<Option<MovementTrack>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value::<MovementTrack>(value) {
        Ok(track) => Some(track),
        Err(err) => {
            tracing::warn!(error = %err, "stored movements do not decode, ignoring track");
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_frame_track() -> MovementTrack {
        MovementTrack {
            home_team: vec![vec![Position::CENTER], vec![Position::raw(0.1, 0.1)]],
            away_team: vec![vec![], vec![]],
            ball_position: vec![Position::CENTER, Position::raw(0.2, 0.0)],
        }
    }

    #[test]
    fn test_frame_count_consistent() {
        assert_eq!(two_frame_track().frame_count(), Some(2));
        assert!(two_frame_track().is_playable());
        assert_eq!(two_frame_track().roster_counts(), (1, 0));
    }

    #[test]
    fn test_frame_count_rejects_ragged_tracks() {
        let mut t = two_frame_track();
        t.ball_position.pop();
        assert_eq!(t.frame_count(), None);

        let mut t = two_frame_track();
        t.home_team[1].push(Position::CENTER);
        assert_eq!(t.frame_count(), None);
        assert!(!t.is_playable());
    }

    #[test]
    fn test_empty_track_not_playable() {
        let t = MovementTrack::default();
        assert_eq!(t.frame_count(), Some(0));
        assert!(!t.is_playable());
    }

    #[test]
    fn test_frame_access() {
        let t = two_frame_track();
        let f = t.frame(1).unwrap();
        assert_eq!(f.home_team, &[Position::raw(0.1, 0.1)]);
        assert_eq!(f.ball_position, Position::raw(0.2, 0.0));
        assert!(t.frame(2).is_none());
    }

    #[test]
    fn test_play_without_movements_parses() {
        let raw = json!({
            "id": "1700000000000",
            "name": "Play 1",
            "description": "Recorded on 2024-01-01",
            "homeTeam": [{"x": 0.1, "y": 0.0}],
            "awayTeam": [],
            "ballPosition": {"x": 0.0, "y": 0.0}
        });
        let play: Play = serde_json::from_value(raw).unwrap();
        assert!(play.movements.is_none());
        assert_eq!(play.frame_count(), 0);
        assert_eq!(play.snapshot().home_team, vec![Position::raw(0.1, 0.0)]);
    }

    #[test]
    fn test_garbage_movements_degrade_to_none() {
        let raw = json!({
            "id": "1",
            "name": "Play 1",
            "description": "",
            "homeTeam": [],
            "awayTeam": [],
            "ballPosition": {"x": 0.0, "y": 0.0},
            "movements": {"homeTeam": "not frames"}
        });
        let play: Play = serde_json::from_value(raw).unwrap();
        assert!(play.movements.is_none());
    }

    #[test]
    fn test_play_round_trips_wire_names() {
        let play = Play {
            id: "42".into(),
            name: "Play 1".into(),
            description: "d".into(),
            home_team: vec![Position::CENTER],
            away_team: vec![],
            ball_position: Position::CENTER,
            movements: Some(two_frame_track()),
        };
        let value = serde_json::to_value(&play).unwrap();
        assert_eq!(value["movements"]["ballPosition"][1]["x"], 0.2);

        let back: Play = serde_json::from_value(value).unwrap();
        assert_eq!(back, play);
    }
}
