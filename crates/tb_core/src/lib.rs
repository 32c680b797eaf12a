//! # tb_core - Tactics Board Recording and Playback
//!
//! Core of an interactive formation board: draggable players and a ball on a
//! field, with movement recording and deterministic playback of the recorded
//! "plays".
//!
//! ## Features
//! - Value-deduplicated sampling of board changes
//! - Squash compaction into per-entity keyframe tracks
//! - Timer-driven playback with pause, stop, seek and variable speed
//! - Pluggable persistence (in-memory or one JSON file per key)
//!
//! ## Example
//! ```rust
//! use tb_core::{BoardConfig, BoardState, ManualClock, ManualTimer, MemoryStore};
//! use tb_core::{PlaybackControl, Position, Team};
//!
//! let mut board = BoardState::open(
//!     MemoryStore::new(),
//!     ManualTimer::new(),
//!     ManualClock::new(0),
//!     BoardConfig::default(),
//! );
//!
//! board.start_recording();
//! board.move_player(Team::Home, 0, Position::new(0.1, 0.1)).unwrap();
//! let play = board.stop_recording().unwrap().unwrap();
//!
//! board.select_play(&play.id).unwrap();
//! board.playback_control(PlaybackControl::Play).unwrap();
//! board.run_playback().unwrap();
//! assert_eq!(board.entities().home_team[0], Position::new(0.1, 0.1));
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod replay;
pub mod settings;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BoardConfig, PlaybackConfig, StorageConfig, SPEED_OPTIONS};
pub use error::{BoardError, Result};
pub use models::{
    default_442, Entity, EntitySet, FieldSize, Frame, MovementTrack, Play, Position, Team,
};
pub use replay::{
    format_clock, squash, FrameLog, FrameSink, ManualTimer, PlaybackControl, PlaybackCursor,
    PlaybackScheduler, PlaybackState, PlaybackStatus, Recorder, Sample, TimerHandle, TimerHost,
};
pub use settings::{Settings, SizePreset};
pub use state::{BoardState, DELETE_ALL_PROMPT};
pub use store::{BoardStore, JsonFileStore, KeyValueStore, MemoryStore, PlayStore, StoreError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    type Board = BoardState<MemoryStore, ManualTimer, ManualClock>;

    fn open_board() -> (Board, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        let board = BoardState::open(
            MemoryStore::new(),
            ManualTimer::new(),
            clock.clone(),
            BoardConfig::default(),
        );
        (board, clock)
    }

    #[test]
    fn test_minimal_round_trip() {
        let (mut board, clock) = open_board();

        board.start_recording();
        clock.advance(100);
        board.move_player(Team::Home, 0, Position::new(0.1, 0.1)).unwrap();
        clock.advance(100);
        board.move_ball(Position::new(0.2, 0.0)).unwrap();
        let play = board.stop_recording().unwrap().unwrap();

        let track = play.movements.as_ref().unwrap();
        assert_eq!(track.frame_count(), Some(2));
        assert_eq!(track.home_team[1][0], Position::new(0.1, 0.1));
        assert_eq!(track.ball_position[1], Position::new(0.2, 0.0));
        assert_eq!(track.away_team[1], track.away_team[0]);
        // Untouched home players are held
        assert_eq!(track.home_team[1][1..], track.home_team[0][1..]);
    }

    #[test]
    fn test_speed_change_preserves_position() {
        let (mut board, clock) = open_board();

        board.start_recording();
        for step in 1..10 {
            clock.advance(40);
            board.move_ball(Position::new(step as f64 * 0.05, 0.0)).unwrap();
        }
        let play = board.stop_recording().unwrap().unwrap();
        assert_eq!(play.frame_count(), 10);

        board.select_play(&play.id).unwrap();
        board.playback_control(PlaybackControl::Play).unwrap();
        board.advance_clock(Duration::from_millis(120)).unwrap();
        assert_eq!(board.status().frame_index, 3);

        board.playback_control(PlaybackControl::Speed(2.0)).unwrap();
        assert_eq!(board.status().frame_index, 3);
        assert_eq!(board.status().state, PlaybackState::Playing);
    }

    #[test]
    fn test_delete_all_requires_confirmation() {
        let (mut board, _) = open_board();
        board.start_recording();
        board.stop_recording().unwrap();
        board.start_recording();
        board.stop_recording().unwrap();

        let mut prompt = String::new();
        let cleared = board
            .delete_all_plays(|msg| {
                prompt = msg.to_string();
                false
            })
            .unwrap();
        assert!(!cleared);
        assert_eq!(board.plays().len(), 2);
        assert_eq!(prompt, DELETE_ALL_PROMPT);

        assert!(board.delete_all_plays(|_| true).unwrap());
        assert!(board.plays().is_empty());
    }

    #[test]
    fn test_playback_reproduces_every_recorded_frame() {
        let (mut board, clock) = open_board();

        board.start_recording();
        for step in 1..=4 {
            clock.advance(30);
            board.move_player(Team::Away, step, Position::new(0.0, step as f64 * 0.1)).unwrap();
        }
        let play = board.stop_recording().unwrap().unwrap();
        let track = play.movements.clone().unwrap();

        let mut scheduler = PlaybackScheduler::new(ManualTimer::new());
        scheduler.load(Some(track.clone()));
        let mut log = FrameLog::default();
        scheduler.start_playback(&mut log);
        scheduler.run_to_end(&mut log);

        let expected: Vec<EntitySet> =
            (0..track.ball_position.len()).map(|i| track.frame(i).unwrap().to_entity_set()).collect();
        assert_eq!(log.frames, expected);
    }
}
