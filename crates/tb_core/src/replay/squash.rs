//! Squash - compact a raw sample log into frame-major keyframe tracks
//!
//! ## Algorithm
//!
//! ```text
//! samples ──group by entity──▶ per-entity value sequences
//!         ──collapse──────────▶ change-points only
//!         ──pad (hold last)───▶ F frames each, F = longest sequence
//!         ──reassemble────────▶ homeTeam[f][p], awayTeam[f][p], ballPosition[f]
//! ```
//!
//! Entity order is fixed: home players by index, then away players, then the ball.
//! An entity that never moves keeps a single keyframe and is held for every frame,
//! so frames do not map to wall-clock time: frame `f` is "each entity's `f`-th
//! distinct value".

use crate::models::{Entity, MovementTrack, Position};

use super::sample::Sample;

/// Squash a sample log recorded with fixed roster sizes.
///
/// Pure: the same log and counts always give the same track. An empty log gives an
/// empty track (`F = 0`).
pub fn squash(samples: &[Sample], home_count: usize, away_count: usize) -> MovementTrack {
    let keyframes: Vec<Vec<Position>> = entity_order(home_count, away_count)
        .map(|entity| collapse_to_change_points(&group_by_entity(samples, entity)))
        .collect();

    let frame_count = keyframes.iter().map(Vec::len).max().unwrap_or(0);
    if frame_count == 0 {
        return MovementTrack::default();
    }

    let (home, rest) = keyframes.split_at(home_count);
    let (away, ball) = rest.split_at(away_count);
    let ball = ball.first().map(Vec::as_slice).unwrap_or(&[]);

    let mut track = MovementTrack {
        home_team: Vec::with_capacity(frame_count),
        away_team: Vec::with_capacity(frame_count),
        ball_position: Vec::with_capacity(frame_count),
    };

    for frame in 0..frame_count {
        track.home_team.push(home.iter().map(|seq| hold_last(seq, frame)).collect());
        track.away_team.push(away.iter().map(|seq| hold_last(seq, frame)).collect());
        track.ball_position.push(hold_last(ball, frame));
    }

    track
}

/// Home `0..home_count`, away `0..away_count`, ball.
pub(crate) fn entity_order(home_count: usize, away_count: usize) -> impl Iterator<Item = Entity> {
    (0..home_count)
        .map(Entity::Home)
        .chain((0..away_count).map(Entity::Away))
        .chain(std::iter::once(Entity::Ball))
}

/// Every value one entity took across the log, in sample order.
pub(crate) fn group_by_entity(samples: &[Sample], entity: Entity) -> Vec<Position> {
    samples.iter().filter_map(|s| s.get(entity)).collect()
}

/// Keep the first value and every value that differs from the previously kept one.
pub(crate) fn collapse_to_change_points(values: &[Position]) -> Vec<Position> {
    let mut kept: Vec<Position> = Vec::with_capacity(values.len());
    for &value in values {
        if kept.last() != Some(&value) {
            kept.push(value);
        }
    }
    kept
}

#[inline]
fn hold_last(seq: &[Position], frame: usize) -> Position {
    seq.get(frame).or_else(|| seq.last()).copied().unwrap_or(Position::CENTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySet;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn sample(home: &[Position], away: &[Position], ball: Position, t: i64) -> Sample {
        Sample {
            home_team: home.to_vec(),
            away_team: away.to_vec(),
            ball_position: ball,
            timestamp: t,
        }
    }

    #[test]
    fn test_empty_log_is_empty_track() {
        let track = squash(&[], 11, 11);
        assert_eq!(track.frame_count(), Some(0));
        assert!(track.is_empty());
    }

    #[test]
    fn test_single_sample_single_frame() {
        let set = EntitySet::default();
        let track = squash(&[Sample::capture(&set, 0)], 11, 11);

        assert_eq!(track.frame_count(), Some(1));
        assert_eq!(track.home_team[0], set.home_team);
        assert_eq!(track.away_team[0], set.away_team);
        assert_eq!(track.ball_position[0], set.ball_position);
    }

    #[test]
    fn test_collapse_keeps_returns_to_earlier_values() {
        let a = p(0.1, 0.1);
        let b = p(0.2, 0.2);
        let collapsed = collapse_to_change_points(&[a, a, b, b, a]);
        assert_eq!(collapsed, vec![a, b, a]);
    }

    #[test]
    fn test_independent_entities_compress_independently() {
        // Home 0 moves twice, ball once, away never.
        let o = Position::CENTER;
        let log = vec![
            sample(&[o], &[o], o, 0),
            sample(&[p(0.1, 0.0)], &[o], o, 10),
            sample(&[p(0.1, 0.0)], &[o], p(0.3, 0.0), 20),
            sample(&[p(0.2, 0.0)], &[o], p(0.3, 0.0), 30),
        ];
        let track = squash(&log, 1, 1);

        assert_eq!(track.frame_count(), Some(3));
        assert_eq!(
            track.home_team,
            vec![vec![o], vec![p(0.1, 0.0)], vec![p(0.2, 0.0)]]
        );
        // Ball keyframes [o, 0.3] padded by holding the last one
        assert_eq!(track.ball_position, vec![o, p(0.3, 0.0), p(0.3, 0.0)]);
        assert_eq!(track.away_team, vec![vec![o]; 3]);
    }

    #[test]
    fn test_hold_last_keeps_final_values() {
        let o = Position::CENTER;
        let log = vec![
            sample(&[o, o], &[], o, 0),
            sample(&[p(0.1, 0.0), o], &[], o, 1),
            sample(&[p(0.1, 0.0), p(0.0, 0.4)], &[], o, 2),
            sample(&[p(0.3, 0.0), p(0.0, 0.4)], &[], o, 3),
        ];
        let track = squash(&log, 2, 0);
        let last = track.frame_count().unwrap() - 1;

        assert_eq!(track.home_team[last], vec![p(0.3, 0.0), p(0.0, 0.4)]);
        assert!(track.away_team.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_frame_count_invariant_with_uneven_rosters() {
        let o = Position::CENTER;
        let log = vec![
            sample(&[o; 3], &[o; 5], o, 0),
            sample(&[o; 3], &[p(0.1, 0.1), o, o, o, o], o, 1),
        ];
        let track = squash(&log, 3, 5);
        let frames = track.frame_count().unwrap();

        assert_eq!(frames, 2);
        assert!(track.home_team.iter().all(|f| f.len() == 3));
        assert!(track.away_team.iter().all(|f| f.len() == 5));
    }

    #[test]
    fn test_deterministic() {
        let o = Position::CENTER;
        let log = vec![sample(&[o], &[o], o, 0), sample(&[p(0.4, 0.4)], &[o], o, 5)];
        assert_eq!(squash(&log, 1, 1), squash(&log, 1, 1));
    }

    #[test]
    fn test_entity_order() {
        let order: Vec<Entity> = entity_order(2, 1).collect();
        assert_eq!(
            order,
            vec![Entity::Home(0), Entity::Home(1), Entity::Away(0), Entity::Ball]
        );
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_log(home: usize, away: usize) -> impl Strategy<Value = Vec<Sample>> {
            let arb_pos = (-5i32..=5, -5i32..=5)
                .prop_map(|(x, y)| Position::new(x as f64 / 10.0, y as f64 / 10.0));
            let arb_sample = (
                proptest::collection::vec(arb_pos.clone(), home),
                proptest::collection::vec(arb_pos.clone(), away),
                arb_pos,
            )
                .prop_map(|(h, a, b)| Sample { home_team: h, away_team: a, ball_position: b, timestamp: 0 });
            proptest::collection::vec(arb_sample, 1..30)
        }

        proptest! {
            /// Property: every branch has F frames and every frame has the roster size
            #[test]
            fn prop_frame_count_invariant(log in arb_log(3, 2)) {
                let track = squash(&log, 3, 2);
                let frames = track.frame_count();
                prop_assert!(frames.is_some());
                prop_assert!(frames.unwrap() >= 1);
                prop_assert!(track.home_team.iter().all(|f| f.len() == 3));
                prop_assert!(track.away_team.iter().all(|f| f.len() == 2));
            }

            /// Property: the last frame holds every entity's final sampled value
            #[test]
            fn prop_last_frame_is_final_sample(log in arb_log(2, 2)) {
                let track = squash(&log, 2, 2);
                let last_frame = track.frame_count().unwrap() - 1;
                let final_sample = log.last().unwrap();
                prop_assert_eq!(&track.home_team[last_frame], &final_sample.home_team);
                prop_assert_eq!(&track.away_team[last_frame], &final_sample.away_team);
                prop_assert_eq!(track.ball_position[last_frame], final_sample.ball_position);
            }

            /// Property: frame 0 is the first sample
            #[test]
            fn prop_first_frame_is_first_sample(log in arb_log(2, 1)) {
                let track = squash(&log, 2, 1);
                prop_assert_eq!(&track.home_team[0], &log[0].home_team);
                prop_assert_eq!(track.ball_position[0], log[0].ball_position);
            }
        }
    }
}
