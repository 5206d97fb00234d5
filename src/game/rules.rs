//! Havannah winning conditions and the [`Havannah`] rules oracle.
//!
//! A player wins by completing one of three structures:
//!
//! - **Ring**: a loop of stones around at least one cell (the enclosed cells
//!   may be empty or taken by any player).
//! - **Bridge**: a chain connecting any two corners.
//! - **Fork**: a chain connecting any three edges (corners do not belong to
//!   edges).

use std::collections::HashSet;
use std::fmt;

use crate::environment::{Player, Rules};
use crate::game::core::{Move, Sides};
use crate::game::position::Position;

/// The winning structure completed by the last move.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Win {
    Ring,
    Bridge,
    Fork,
}

impl fmt::Display for Win {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ring => "ring",
                Self::Bridge => "bridge",
                Self::Fork => "fork",
            }
        )
    }
}

/// Checks whether `player` completed a winning structure through `last_move`.
/// The stone at `last_move` has to belong to `player` already.
#[must_use]
pub fn check_win(position: &Position, last_move: Move, player: Player) -> Option<Win> {
    if position.owner(last_move) != Some(player) {
        return None;
    }
    let sides = group_sides(position, last_move, player);
    if sides.corners() >= 2 {
        return Some(Win::Bridge);
    }
    if sides.edges() >= 3 {
        return Some(Win::Fork);
    }
    if completes_ring(position, last_move, player) {
        return Some(Win::Ring);
    }
    None
}

/// Flood-fills the group of connected stones containing `start`.
fn group(position: &Position, start: Move, player: Player) -> HashSet<Move> {
    let mut visited = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(cell) = stack.pop() {
        for neighbour in position.neighbours(cell) {
            if position.owner(neighbour) == Some(player) && visited.insert(neighbour) {
                stack.push(neighbour);
            }
        }
    }
    visited
}

/// All corners and edges touched by the group containing `start`.
fn group_sides(position: &Position, start: Move, player: Player) -> Sides {
    group(position, start, player)
        .into_iter()
        .fold(Sides::empty(), |sides, cell| sides | position.sides(cell))
}

/// A ring through `last_move` either fully surrounds one of `player`'s own
/// stones next to it, or cuts some cells off the boundary: every cell outside
/// the group of `last_move` is flooded from the boundary and any cell left
/// unreached is enclosed by the group.
fn completes_ring(position: &Position, last_move: Move, player: Player) -> bool {
    let neighbours = position.neighbours(last_move);
    let surrounded = |cell: Move| {
        position.owner(cell) == Some(player) && {
            let around = position.neighbours(cell);
            around.len() == 6
                && around
                    .iter()
                    .all(|&neighbour| position.owner(neighbour) == Some(player))
        }
    };
    if surrounded(last_move) || neighbours.iter().any(|&cell| surrounded(cell)) {
        return true;
    }
    // The loop passes through the last move, hence it joins two own stones.
    let own = neighbours
        .iter()
        .filter(|&&cell| position.owner(cell) == Some(player))
        .count();
    if own < 2 {
        return false;
    }
    let group = group(position, last_move, player);
    let mut reached: HashSet<Move> = position
        .cells()
        .filter(|cell| position.is_boundary(*cell) && !group.contains(cell))
        .collect();
    let mut stack: Vec<Move> = reached.iter().copied().collect();
    while let Some(cell) = stack.pop() {
        for neighbour in position.neighbours(cell) {
            if !group.contains(&neighbour) && reached.insert(neighbour) {
                stack.push(neighbour);
            }
        }
    }
    position
        .cells()
        .any(|cell| !group.contains(&cell) && !reached.contains(&cell))
}

/// Rules of Havannah on a hexagonal board.
#[derive(Clone, Copy, Debug, Default)]
pub struct Havannah;

impl Rules for Havannah {
    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        position.empty_cells()
    }

    fn apply_move(
        &self,
        position: &Position,
        next_move: Move,
        player: Player,
    ) -> anyhow::Result<Position> {
        position.with_move(next_move, player)
    }

    fn check_win(&self, position: &Position, last_move: Move, player: Player) -> Option<Win> {
        check_win(position, last_move, player)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn play(dimension: u8, stones: &[(u8, u8)], player: Player) -> Position {
        stones
            .iter()
            .fold(Position::empty(dimension).unwrap(), |position, &(row, column)| {
                position.with_move(Move::new(row, column), player).unwrap()
            })
    }

    #[test]
    fn bridge() {
        let position = play(4, &[(0, 0), (0, 1), (0, 2), (0, 3)], Player::One);
        assert_eq!(
            check_win(&position, Move::new(0, 3), Player::One),
            Some(Win::Bridge)
        );
        // Connected through any stone of the group.
        assert_eq!(
            check_win(&position, Move::new(0, 1), Player::One),
            Some(Win::Bridge)
        );
        // Wrong player.
        assert_eq!(check_win(&position, Move::new(0, 3), Player::Two), None);
        let position = play(4, &[(0, 0), (0, 1), (0, 3)], Player::One);
        assert_eq!(check_win(&position, Move::new(0, 3), Player::One), None);
    }

    #[test]
    fn fork() {
        let stones = [(1, 0), (0, 1), (1, 1), (3, 1), (4, 1), (2, 1)];
        let position = play(4, &stones, Player::Two);
        assert_eq!(
            check_win(&position, Move::new(2, 1), Player::Two),
            Some(Win::Fork)
        );
        let position = play(4, &stones[..5], Player::Two);
        assert_eq!(check_win(&position, Move::new(4, 1), Player::Two), None);
    }

    #[test]
    fn ring_around_empty_cell() {
        let ring = [(2, 3), (4, 3), (2, 2), (3, 2), (2, 4), (3, 4)];
        let position = play(4, &ring, Player::One);
        assert_eq!(
            check_win(&position, Move::new(3, 4), Player::One),
            Some(Win::Ring)
        );
        let position = play(4, &ring[..5], Player::One);
        assert_eq!(check_win(&position, Move::new(2, 4), Player::One), None);
    }

    #[test]
    fn ring_around_opponent_stone() {
        let position = play(4, &[(2, 3), (4, 3), (2, 2), (3, 2), (2, 4)], Player::One)
            .with_move(Move::new(3, 3), Player::Two)
            .unwrap()
            .with_move(Move::new(3, 4), Player::One)
            .unwrap();
        assert_eq!(
            check_win(&position, Move::new(3, 4), Player::One),
            Some(Win::Ring)
        );
        assert_eq!(check_win(&position, Move::new(3, 3), Player::Two), None);
    }

    #[test]
    fn ring_around_own_stone() {
        let position = play(
            4,
            &[(3, 3), (2, 3), (4, 3), (2, 2), (3, 2), (2, 4), (3, 4)],
            Player::One,
        );
        assert_eq!(
            check_win(&position, Move::new(3, 4), Player::One),
            Some(Win::Ring)
        );
    }

    #[test]
    fn ring_enclosing_cell_away_from_last_move() {
        // The loop around (2,3) is closed by own stones only, the last move
        // extends the group from below.
        let stones = [
            (2, 2),
            (3, 2),
            (2, 4),
            (3, 4),
            (1, 3),
            (1, 2),
            (1, 4),
            (3, 3),
            (4, 3),
        ];
        let position = play(4, &stones, Player::One);
        assert!(position.is_empty_cell(Move::new(2, 3)));
        assert_eq!(
            check_win(&position, Move::new(4, 3), Player::One),
            Some(Win::Ring)
        );
        // Without (1,3) the empty cell is connected to the boundary.
        let open: Vec<(u8, u8)> = stones
            .iter()
            .copied()
            .filter(|&cell| cell != (1, 3))
            .collect();
        let position = play(4, &open, Player::One);
        assert_eq!(check_win(&position, Move::new(4, 3), Player::One), None);
    }

    #[test]
    fn ring_enclosing_several_cells() {
        // Loop around the two empty cells (2,3) and (3,3).
        let stones = [
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 3),
            (3, 2),
            (2, 2),
        ];
        let position = play(4, &stones, Player::Two);
        assert_eq!(
            check_win(&position, Move::new(2, 2), Player::Two),
            Some(Win::Ring)
        );
        let position = play(4, &stones[..7], Player::Two);
        assert_eq!(check_win(&position, Move::new(3, 2), Player::Two), None);
    }

    #[test]
    fn no_ring_along_boundary() {
        // A "cup" touching the boundary does not enclose anything.
        let position = play(4, &[(0, 1), (1, 1), (1, 2), (1, 3), (0, 3)], Player::One);
        assert_eq!(check_win(&position, Move::new(1, 2), Player::One), None);
    }

    #[test]
    fn oracle() {
        let rules = Havannah;
        let position = Position::empty(2).unwrap();
        assert_eq!(rules.legal_moves(&position).len(), 7);
        let position = rules
            .apply_move(&position, Move::new(1, 1), Player::One)
            .unwrap();
        assert_eq!(rules.legal_moves(&position).len(), 6);
        assert!(rules
            .apply_move(&position, Move::new(1, 1), Player::Two)
            .is_err());
        assert_eq!(rules.check_win(&position, Move::new(1, 1), Player::One), None);
        assert_eq!(Win::Fork.to_string(), "fork");
    }
}
