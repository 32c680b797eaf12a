//! Board entities: both rosters and the ball

use serde::{Deserialize, Serialize};

use super::formation::default_442;
use super::position::Position;

/// Which side a player belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub fn name(&self) -> &'static str {
        match self {
            Team::Home => "home",
            Team::Away => "away",
        }
    }
}

/// Position-bearing object on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Home(usize),
    Away(usize),
    Ball,
}

/// Complete board snapshot: home roster, away roster and the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    pub home_team: Vec<Position>,
    pub away_team: Vec<Position>,
    pub ball_position: Position,
}

impl Default for EntitySet {
    fn default() -> Self {
        default_442()
    }
}

impl EntitySet {
    pub fn new(home_team: Vec<Position>, away_team: Vec<Position>, ball_position: Position) -> Self {
        Self { home_team, away_team, ball_position }
    }

    pub fn team(&self, team: Team) -> &[Position] {
        match team {
            Team::Home => &self.home_team,
            Team::Away => &self.away_team,
        }
    }

    /// Roster sizes as `(home, away)`
    pub fn counts(&self) -> (usize, usize) {
        (self.home_team.len(), self.away_team.len())
    }

    /// Current value of one entity, `None` for an index outside the roster.
    pub fn get(&self, entity: Entity) -> Option<Position> {
        match entity {
            Entity::Home(i) => self.home_team.get(i).copied(),
            Entity::Away(i) => self.away_team.get(i).copied(),
            Entity::Ball => Some(self.ball_position),
        }
    }

    /// Move one entity, clamping the target onto the field.
    ///
    /// Returns `false` when the index is outside the roster (nothing changes).
    pub fn set(&mut self, entity: Entity, pos: Position) -> bool {
        let pos = pos.clamped();
        let slot = match entity {
            Entity::Home(i) => self.home_team.get_mut(i),
            Entity::Away(i) => self.away_team.get_mut(i),
            Entity::Ball => Some(&mut self.ball_position),
        };
        match slot {
            Some(slot) => {
                *slot = pos;
                true
            }
            None => false,
        }
    }

    /// Clamp every stored position (used after decoding from storage).
    pub fn clamp_all(&mut self) {
        for p in self.home_team.iter_mut().chain(self.away_team.iter_mut()) {
            *p = p.clamped();
        }
        self.ball_position = self.ball_position.clamped();
    }
}
