//! Default formation data
//!
//! Both sides line up in a 4-4-2. Home defends the left goal (negative x), away the
//! right goal. Index order inside a roster:
//! - 0: goalkeeper
//! - 1-4: back four (left back to right back)
//! - 5-8: midfield four
//! - 9-10: front two

use super::entity::EntitySet;
use super::position::Position;

/// Players per side in the default formation
pub const DEFAULT_TEAM_SIZE: usize = 11;

/// Home side, 4-4-2, attacking right
pub const HOME_442: [Position; DEFAULT_TEAM_SIZE] = [
    Position::raw(-0.4, 0.0),
    // Defenders
    Position::raw(-0.3, -0.2),
    Position::raw(-0.3, -0.1),
    Position::raw(-0.3, 0.1),
    Position::raw(-0.3, 0.2),
    // Midfielders
    Position::raw(-0.15, -0.2),
    Position::raw(-0.15, -0.1),
    Position::raw(-0.15, 0.1),
    Position::raw(-0.15, 0.2),
    // Forwards
    Position::raw(-0.05, -0.1),
    Position::raw(-0.05, 0.1),
];

/// Away side, mirror image of [`HOME_442`]
pub const AWAY_442: [Position; DEFAULT_TEAM_SIZE] = [
    Position::raw(0.4, 0.0),
    // Defenders
    Position::raw(0.3, -0.2),
    Position::raw(0.3, -0.1),
    Position::raw(0.3, 0.1),
    Position::raw(0.3, 0.2),
    // Midfielders
    Position::raw(0.15, -0.2),
    Position::raw(0.15, -0.1),
    Position::raw(0.15, 0.1),
    Position::raw(0.15, 0.2),
    // Forwards
    Position::raw(0.05, -0.1),
    Position::raw(0.05, 0.1),
];

/// Kick-off spot
pub const BALL_START: Position = Position::CENTER;

/// Fresh board in the default formation
pub fn default_442() -> EntitySet {
    EntitySet::new(HOME_442.to_vec(), AWAY_442.to_vec(), BALL_START)
}
