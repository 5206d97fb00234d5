//! Interface between the search and the game rules. The search only ever talks
//! to the board through [`Rules`], which makes it possible to swap the rules
//! implementation (e.g. in tests) without touching the engine.

use std::fmt;
use std::ops::Not;

use anyhow::bail;

use crate::game::core::Move;
use crate::game::position::Position;
use crate::game::rules::Win;

/// Havannah is played between two players: player one has the first move.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Returns the other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<char> for Player {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            '1' => Ok(Self::One),
            '2' => Ok(Self::Two),
            _ => bail!("player should be '1' or '2', got '{symbol}'"),
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        let mut symbols = player.chars();
        match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => Self::try_from(symbol),
            _ => bail!("player should be '1' or '2', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::One => '1',
                Self::Two => '2',
            }
        )
    }
}

/// Board/rules oracle consumed by the search. Implementations must be pure and
/// deterministic: the same inputs always produce the same outputs.
pub trait Rules {
    /// All empty cells of the position. The order is significant: it is used
    /// as a tie-break by the tactical checks and the final move choice, so it
    /// has to be stable.
    fn legal_moves(&self, position: &Position) -> Vec<Move>;

    /// Produces the successor position where `player` claimed `next_move`.
    ///
    /// Fails if the cell is occupied or is not a part of the board.
    fn apply_move(
        &self,
        position: &Position,
        next_move: Move,
        player: Player,
    ) -> anyhow::Result<Position>;

    /// Returns the winning structure if `player` has just completed one
    /// through `last_move`.
    fn check_win(&self, position: &Position, last_move: Move, player: Player) -> Option<Win>;
}
