//! Statistics Store: visit counts and accumulated outcomes for every
//! (position, move) pair the search has seen, both exact and [RAVE].
//!
//! [RAVE]: https://www.chessprogramming.org/Rapid_Action_Value_Estimation

use std::collections::HashMap;

use crate::game::core::Move;
use crate::game::position::Position;

/// A move played in a specific position: the unit of granularity of all
/// search statistics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatKey {
    #[allow(missing_docs)]
    pub position: Position,
    #[allow(missing_docs)]
    pub next_move: Move,
}

impl StatKey {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(position: Position, next_move: Move) -> Self {
        Self {
            position,
            next_move,
        }
    }
}

/// Counters for a single [`StatKey`]. Values are accumulated from the agent's
/// perspective: wins add one, penalized losses subtract one, hence
/// `|value| <= visits` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Number of simulations whose in-tree path went through the pair.
    pub visits: u32,
    /// Accumulated outcome of these simulations.
    pub value: i32,
    /// Number of simulations the pair was seen in, anywhere in the playout.
    pub rave_visits: u32,
    /// Accumulated outcome of the RAVE visits.
    pub rave_value: i32,
}

/// Table of [`NodeStats`] keyed by [`StatKey`]. Entries are created lazily on
/// the first update and are never removed: the store lives as long as the
/// agent owning it and keeps the experience from previous searches.
#[derive(Debug, Default)]
pub struct Statistics {
    // Keyed by position first so that probing does not require cloning it.
    table: HashMap<Position, HashMap<Move, NodeStats>>,
}

impl Statistics {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (position, move) pairs with recorded statistics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.values().map(HashMap::len).sum()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the statistics of the pair; unvisited pairs read as zeros.
    #[must_use]
    pub fn probe(&self, position: &Position, next_move: Move) -> NodeStats {
        self.table
            .get(position)
            .and_then(|moves| moves.get(&next_move))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of exact visits over the given moves of the position.
    #[must_use]
    pub fn total_visits(&self, position: &Position, moves: &[Move]) -> u32 {
        self.table.get(position).map_or(0, |stats| {
            moves
                .iter()
                .filter_map(|next_move| stats.get(next_move))
                .map(|stats| stats.visits)
                .sum()
        })
    }

    /// Iterates over all recorded pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Position, Move, NodeStats)> {
        self.table.iter().flat_map(|(position, moves)| {
            moves
                .iter()
                .map(move |(&next_move, &stats)| (position, next_move, stats))
        })
    }

    /// Backpropagation update of a pair on the in-tree path: one exact and one
    /// RAVE visit, both credited with `credit`.
    pub(crate) fn record_visit(&mut self, key: StatKey, credit: i32) {
        let stats = self.entry(key);
        stats.visits += 1;
        stats.value += credit;
        stats.rave_visits += 1;
        stats.rave_value += credit;
    }

    /// Rollout update: one RAVE visit, plus a RAVE win if the agent won.
    pub(crate) fn record_rave(&mut self, key: StatKey, won: bool) {
        let stats = self.entry(key);
        stats.rave_visits += 1;
        if won {
            stats.rave_value += 1;
        }
    }

    fn entry(&mut self, key: StatKey) -> &mut NodeStats {
        self.table
            .entry(key.position)
            .or_default()
            .entry(key.next_move)
            .or_default()
    }
}
