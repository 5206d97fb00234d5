//! Selection policy of the in-tree phase: [UCT] scores with an optional
//! [RAVE] blend.
//!
//! [UCT]: https://www.chessprogramming.org/UCT
//! [RAVE]: https://www.chessprogramming.org/Rapid_Action_Value_Estimation

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::game::core::Move;
use crate::game::position::Position;
use crate::search::config::Config;
use crate::search::stats::{NodeStats, Statistics};

/// `Q / (N + 1) + C * sqrt(ln(T + 1) / (N + 1))` where `T` is the total number
/// of visits of all moves in the position.
pub(super) fn uct(stats: NodeStats, total_visits: u32, exploration: f64) -> f64 {
    let visits = f64::from(stats.visits) + 1.0;
    exploration.mul_add(
        (f64::from(total_visits).ln_1p() / visits).sqrt(),
        f64::from(stats.value) / visits,
    )
}

/// Weight of the RAVE estimate: `R / (R + N + 1)`. Starts close to one and
/// decays as exact visits accumulate.
pub(super) fn rave_beta(stats: NodeStats, equivalence: f64) -> f64 {
    equivalence / (equivalence + f64::from(stats.visits) + 1.0)
}

pub(super) fn rave_estimate(stats: NodeStats) -> f64 {
    if stats.rave_visits == 0 {
        return 0.0;
    }
    f64::from(stats.rave_value) / (f64::from(stats.rave_visits) + 1.0)
}

/// `(1 - β) * UCT + β * RAVE`.
pub(super) fn blend(uct: f64, rave: f64, beta: f64) -> f64 {
    (1.0 - beta).mul_add(uct, beta * rave)
}

/// Selection score of a move. RAVE terms are only blended in when
/// [`Config::rave_blending`] is enabled, otherwise this is plain UCT.
pub(super) fn score(stats: NodeStats, total_visits: u32, config: &Config) -> f64 {
    let uct = uct(stats, total_visits, config.exploration);
    let beta = rave_beta(stats, config.rave_equivalence);
    let rave = rave_estimate(stats);
    if config.rave_blending {
        blend(uct, rave, beta)
    } else {
        uct
    }
}

/// Picks uniformly at random among the moves tying for the best score: the
/// maximum one if `maximize` is set (agent to move) or the minimum one
/// otherwise (the opponent is assumed to minimize the agent's score).
pub(super) fn select(
    statistics: &Statistics,
    config: &Config,
    position: &Position,
    moves: &[Move],
    maximize: bool,
    rng: &mut StdRng,
) -> Option<Move> {
    let total_visits = statistics.total_visits(position, moves);
    let preferred = if maximize {
        Ordering::Greater
    } else {
        Ordering::Less
    };
    let mut best = f64::NAN;
    let mut ties = Vec::new();
    for &next_move in moves {
        let score = score(statistics.probe(position, next_move), total_visits, config);
        if ties.is_empty() {
            best = score;
            ties.push(next_move);
            continue;
        }
        match score.total_cmp(&best) {
            Ordering::Equal => ties.push(next_move),
            ordering if ordering == preferred => {
                best = score;
                ties.clear();
                ties.push(next_move);
            },
            _ => {},
        }
    }
    ties.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;

    use super::*;
    use crate::search::stats::StatKey;

    const EPSILON: f64 = 1e-9;

    fn stats(visits: u32, value: i32, rave_visits: u32, rave_value: i32) -> NodeStats {
        NodeStats {
            visits,
            value,
            rave_visits,
            rave_value,
        }
    }

    #[test]
    fn uct_formula() {
        assert!(uct(NodeStats::default(), 0, 1.8).abs() < EPSILON);
        let expected = 2.0 / 4.0 + 1.8 * (11.0_f64.ln() / 4.0).sqrt();
        assert!((uct(stats(3, 2, 0, 0), 10, 1.8) - expected).abs() < EPSILON);
        // Unvisited moves still get an exploration bonus once the position
        // has been visited.
        assert!(uct(NodeStats::default(), 5, 1.8) > 0.0);
    }

    #[test]
    fn rave_terms() {
        assert!((rave_beta(NodeStats::default(), 50.0) - 50.0 / 51.0).abs() < EPSILON);
        assert!((rave_beta(stats(49, 0, 0, 0), 50.0) - 0.5).abs() < EPSILON);
        assert!(rave_estimate(stats(0, 0, 0, 0)).abs() < EPSILON);
        assert!((rave_estimate(stats(0, 0, 3, 2)) - 0.5).abs() < EPSILON);
        assert!((blend(1.0, 0.0, 0.25) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn rave_blending_is_off_by_default() {
        let config = Config::default();
        let node = stats(2, -2, 20, 20);
        assert!((score(node, 10, &config) - uct(node, 10, config.exploration)).abs() < EPSILON);

        let config = config.with_rave_blending(true);
        assert!(score(node, 10, &config) > uct(node, 10, config.exploration));
    }

    #[test]
    fn maximize_and_minimize() {
        let config = Config::default();
        let position = Position::empty(3).unwrap();
        let moves = position.empty_cells();
        let favourite = moves[4];
        let mut statistics = Statistics::new();
        statistics.record_visit(StatKey::new(position.clone(), favourite), 1);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                select(&statistics, &config, &position, &moves, true, &mut rng),
                Some(favourite)
            );
            let reply = select(&statistics, &config, &position, &moves, false, &mut rng);
            assert!(reply.is_some());
            assert_ne!(reply, Some(favourite));
        }
    }

    #[test]
    fn random_tie_break() {
        let config = Config::default();
        let position = Position::empty(3).unwrap();
        let moves = position.empty_cells();
        let statistics = Statistics::new();
        let mut rng = StdRng::seed_from_u64(42);
        let chosen: HashSet<Move> = (0..100)
            .filter_map(|_| select(&statistics, &config, &position, &moves, true, &mut rng))
            .collect();
        assert!(chosen.len() > 1);
        assert!(chosen.iter().all(|next_move| moves.contains(next_move)));
        assert_eq!(
            select(&statistics, &config, &position, &[], true, &mut rng),
            None
        );
    }
}
