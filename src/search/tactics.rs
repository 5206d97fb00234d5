//! Tactical checks that settle the move without (or before) the search:
//! winning immediately, blocking an immediate loss and defending against a
//! known fork pattern.

use tracing::trace;

use crate::environment::{Player, Rules};
use crate::game::core::Move;
use crate::game::position::Position;
use crate::search::Decision;

/// Board dimension [`FORK_TRIADS`] is laid out for.
pub(super) const FORK_DIMENSION: u8 = 6;

/// Triads of cells forming a fork shape along the edges of a dimension-6
/// board, given as (row, column). Two opponent stones in a triad threaten to
/// complete the shape with the third cell.
#[rustfmt::skip]
pub(super) const FORK_TRIADS: [[(u8, u8); 3]; 18] = [
    [(0, 0), (1, 2), (0, 3)], [(0, 1), (1, 3), (0, 4)], [(0, 2), (1, 4), (0, 5)],
    [(0, 5), (1, 6), (0, 8)], [(0, 6), (1, 7), (0, 9)], [(0, 7), (1, 8), (0, 10)],
    [(0, 10), (2, 9), (3, 10)], [(1, 10), (3, 9), (4, 10)], [(2, 10), (4, 9), (5, 10)],
    [(5, 10), (6, 8), (8, 7)], [(6, 9), (7, 7), (9, 6)], [(7, 8), (8, 6), (10, 5)],
    [(10, 5), (8, 4), (7, 2)], [(9, 4), (7, 3), (6, 1)], [(8, 3), (6, 2), (5, 0)],
    [(5, 0), (4, 1), (2, 0)], [(4, 0), (3, 1), (1, 0)], [(3, 0), (2, 1), (0, 0)],
];

/// Returns the first of `moves` that completes a win for `player`.
pub(super) fn winning_move<R: Rules>(
    rules: &R,
    position: &Position,
    moves: &[Move],
    player: Player,
) -> Option<Move> {
    moves.iter().copied().find(|&next_move| {
        match rules.apply_move(position, next_move, player) {
            Ok(next) => rules.check_win(&next, next_move, player).is_some(),
            Err(error) => {
                trace!(%next_move, %error, "Skipping inapplicable move");
                false
            },
        }
    })
}

/// Returns the empty cell of the first triad where `opponent` holds the other
/// two cells. Only applies to boards of [`FORK_DIMENSION`].
pub(super) fn fork_defense(position: &Position, opponent: Player) -> Option<Move> {
    if position.dimension() != FORK_DIMENSION {
        return None;
    }
    FORK_TRIADS.iter().find_map(|triad| {
        let cells = triad.map(|(row, column)| Move::new(row, column));
        let taken = cells
            .iter()
            .filter(|&&cell| position.owner(cell) == Some(opponent))
            .count();
        if taken != 2 {
            return None;
        }
        cells
            .into_iter()
            .find(|&cell| position.is_empty_cell(cell))
    })
}

/// Runs the tactical checks in order: immediate win, immediate block, fork
/// defense. Deterministic and free of side effects.
pub(super) fn pre_filter<R: Rules>(
    rules: &R,
    position: &Position,
    moves: &[Move],
    player: Player,
) -> Option<(Move, Decision)> {
    if let Some(next_move) = winning_move(rules, position, moves, player) {
        return Some((next_move, Decision::ImmediateWin));
    }
    if let Some(next_move) = winning_move(rules, position, moves, !player) {
        return Some((next_move, Decision::Block));
    }
    fork_defense(position, !player).map(|next_move| (next_move, Decision::ForkDefense))
}
