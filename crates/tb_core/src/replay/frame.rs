//! Frame sink: where playback sends each emitted frame

use crate::models::{EntitySet, Frame, Position};

/// Receiver of playback frames
///
/// Closures of shape `FnMut(&[Position], &[Position], Position)` implement it, as
/// does [`EntitySet`] (the frame overwrites the board).
pub trait FrameSink {
    fn apply_frame(&mut self, home: &[Position], away: &[Position], ball: Position);

    fn apply(&mut self, frame: Frame<'_>) {
        self.apply_frame(frame.home_team, frame.away_team, frame.ball_position);
    }
}

impl<F> FrameSink for F
where
    F: FnMut(&[Position], &[Position], Position),
{
    fn apply_frame(&mut self, home: &[Position], away: &[Position], ball: Position) {
        self(home, away, ball)
    }
}

impl FrameSink for EntitySet {
    fn apply_frame(&mut self, home: &[Position], away: &[Position], ball: Position) {
        self.home_team = home.to_vec();
        self.away_team = away.to_vec();
        self.ball_position = ball;
    }
}

/// Sink that remembers every frame it received, for tests and dry runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLog {
    pub frames: Vec<EntitySet>,
}

impl FrameLog {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&EntitySet> {
        self.frames.last()
    }
}

impl FrameSink for FrameLog {
    fn apply_frame(&mut self, home: &[Position], away: &[Position], ball: Position) {
        self.frames.push(EntitySet::new(home.to_vec(), away.to_vec(), ball));
    }
}
