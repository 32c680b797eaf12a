//! Raw recorder samples

use serde::{Deserialize, Serialize};

use crate::models::{Entity, EntitySet, Position};

/// Complete board snapshot at one instant of a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub home_team: Vec<Position>,
    pub away_team: Vec<Position>,
    pub ball_position: Position,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Sample {
    pub fn capture(set: &EntitySet, timestamp: i64) -> Self {
        Self {
            home_team: set.home_team.clone(),
            away_team: set.away_team.clone(),
            ball_position: set.ball_position,
            timestamp,
        }
    }

    /// Value comparison against a live snapshot, timestamp ignored.
    pub fn same_positions(&self, set: &EntitySet) -> bool {
        self.ball_position == set.ball_position
            && self.home_team == set.home_team
            && self.away_team == set.away_team
    }

    pub fn get(&self, entity: Entity) -> Option<Position> {
        match entity {
            Entity::Home(i) => self.home_team.get(i).copied(),
            Entity::Away(i) => self.away_team.get(i).copied(),
            Entity::Ball => Some(self.ball_position),
        }
    }

    pub fn to_entity_set(&self) -> EntitySet {
        EntitySet::new(self.home_team.clone(), self.away_team.clone(), self.ball_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_positions_ignores_timestamp() {
        let set = EntitySet::default();
        let sample = Sample::capture(&set, 10);
        assert!(sample.same_positions(&set));

        let mut moved = set.clone();
        moved.set(Entity::Away(4), Position::new(0.0, 0.3));
        assert!(!sample.same_positions(&moved));
    }

    #[test]
    fn test_get_by_entity() {
        let sample = Sample::capture(&EntitySet::default(), 0);
        assert_eq!(sample.get(Entity::Ball), Some(Position::CENTER));
        assert_eq!(sample.get(Entity::Home(0)), Some(Position::raw(-0.4, 0.0)));
        assert_eq!(sample.get(Entity::Home(11)), None);
    }
}
