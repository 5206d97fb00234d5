use std::collections::HashSet;

use crate::game::core::Move;
use crate::game::position::Position;
use crate::search::stats::StatKey;

/// Positions expanded during a single top-level search. The in-tree phase
/// only descends through positions recorded here, which bounds the growth to
/// one new node per simulation.
pub(super) struct ExpansionLedger {
    expanded: HashSet<Position>,
}

impl ExpansionLedger {
    pub(super) fn new() -> Self {
        Self {
            expanded: HashSet::new(),
        }
    }

    /// Atomic check-and-insert: returns true if the position was not expanded
    /// before and marks it as expanded.
    #[must_use]
    pub(super) fn expand(&mut self, position: &Position) -> bool {
        if self.expanded.contains(position) {
            return false;
        }
        self.expanded.insert(position.clone())
    }

    #[must_use]
    pub(super) fn len(&self) -> usize {
        self.expanded.len()
    }
}

/// The (position, move) pairs one simulation went through before the rollout.
pub(super) struct Path {
    steps: Vec<StatKey>,
}

impl Path {
    pub(super) const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(super) fn push(&mut self, position: &Position, next_move: Move) {
        self.steps.push(StatKey::new(position.clone(), next_move));
    }

    #[must_use]
    pub(super) fn len(&self) -> usize {
        self.steps.len()
    }

    pub(super) fn into_steps(self) -> Vec<StatKey> {
        self.steps
    }
}
