//! Shared data model: coordinates, entities, formations and plays

pub mod entity;
pub mod formation;
pub mod play;
pub mod position;

pub use entity::{Entity, EntitySet, Team};
pub use formation::{default_442, AWAY_442, BALL_START, DEFAULT_TEAM_SIZE, HOME_442};
pub use play::{Frame, MovementTrack, Play};
pub use position::{clamp_component, FieldSize, Position, FIELD_MAX, FIELD_MIN};
