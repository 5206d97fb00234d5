//! Provides the Havannah [`Position`]: an immutable snapshot of the hexagonal
//! board together with the board geometry (neighbourhood, corners and edges).
//!
//! A board of dimension `d` has `d` cells on each of its six sides and is
//! embedded into a `(2d - 1) x (2d - 1)` grid. Column `c` holds
//! `2d - 1 - |c - (d - 1)|` cells starting at row 0, the remaining grid cells
//! are outside of the board:
//!
//! ```text
//! d = 3       column
//!           0 1 2 3 4
//!   row 0   . . . . .
//!       1   . . . . .
//!       2   . . . . .
//!       3   - . . . -
//!       4   - - . - -
//! ```

use std::fmt;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::environment::Player;
use crate::game::core::{Move, Sides, MAX_DIMENSION, MIN_DIMENSION};

/// Cells adjacent to a given one. Interior cells have exactly six neighbours,
/// cells on the boundary of the board have fewer.
pub type Neighbours = ArrayVec<Move, 6>;

/// State of the board: which player (if any) claimed each cell. Two positions
/// with the same dimension and cell contents are equal and hash identically,
/// which is what the search statistics rely on.
///
/// [`Position::try_from()`] parses the text notation: rows of the grid joined
/// with `/`, one symbol per cell (`.` for an empty cell, `1` and `2` for the
/// stones and `-` for grid cells outside of the board).
///
/// ```
/// use havannah::game::core::Move;
/// use havannah::game::position::Position;
/// use havannah::Player;
///
/// let position = Position::try_from("1../.2./-.-").unwrap();
/// assert_eq!(position.dimension(), 2);
/// assert_eq!(position.owner(Move::new(0, 0)), Some(Player::One));
/// assert_eq!(position.owner(Move::new(1, 1)), Some(Player::Two));
/// assert_eq!(position.to_string(), "1../.2./-.-");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    dimension: u8,
    cells: Vec<Option<Player>>,
}

impl Position {
    /// Creates an empty board with `dimension` cells on each side.
    pub fn empty(dimension: u8) -> anyhow::Result<Self> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
            bail!(
                "board dimension should be within [{MIN_DIMENSION}, {MAX_DIMENSION}], got {dimension}"
            );
        }
        let side = usize::from(2 * dimension - 1);
        Ok(Self {
            dimension,
            cells: vec![None; side * side],
        })
    }

    /// Number of cells on each side of the hexagon.
    #[must_use]
    pub const fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Width (and height) of the grid the board is embedded into.
    #[must_use]
    pub const fn side(&self) -> u8 {
        2 * self.dimension - 1
    }

    const fn middle(&self) -> u8 {
        self.dimension - 1
    }

    /// Number of board cells in the given grid column.
    #[must_use]
    pub const fn column_height(&self, column: u8) -> u8 {
        debug_assert!(column < self.side());
        self.side() - self.middle().abs_diff(column)
    }

    /// Checks whether the cell is a part of the board.
    #[must_use]
    pub const fn contains(&self, cell: Move) -> bool {
        cell.column() < self.side() && cell.row() < self.column_height(cell.column())
    }

    fn index(&self, cell: Move) -> usize {
        usize::from(cell.row()) * usize::from(self.side()) + usize::from(cell.column())
    }

    /// Returns the player who claimed the cell or `None` if it is empty or
    /// outside of the board.
    #[must_use]
    pub fn owner(&self, cell: Move) -> Option<Player> {
        if self.contains(cell) {
            self.cells[self.index(cell)]
        } else {
            None
        }
    }

    /// Checks whether the cell is on the board and nobody has claimed it yet.
    #[must_use]
    pub fn is_empty_cell(&self, cell: Move) -> bool {
        self.contains(cell) && self.cells[self.index(cell)].is_none()
    }

    /// Iterates over all cells of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.side())
            .cartesian_product(0..self.side())
            .map(|(row, column)| Move::new(row, column))
            .filter(|&cell| self.contains(cell))
    }

    /// Empty cells of the board in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Move> {
        self.cells()
            .filter(|&cell| self.cells[self.index(cell)].is_none())
            .collect()
    }

    /// Number of stones the player has on the board.
    #[must_use]
    pub fn stones(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|&&owner| owner == Some(player))
            .count()
    }

    /// Player one always moves first, hence the side to move is derived from
    /// the number of stones on the board.
    #[must_use]
    pub fn side_to_move(&self) -> Player {
        if self.stones(Player::One) > self.stones(Player::Two) {
            Player::Two
        } else {
            Player::One
        }
    }

    /// Returns true if there are no empty cells left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells().all(|cell| self.cells[self.index(cell)].is_some())
    }

    /// Creates the successor position where `player` claimed `cell`.
    pub fn with_move(&self, cell: Move, player: Player) -> anyhow::Result<Self> {
        if !self.contains(cell) {
            bail!(
                "cell {cell} is outside of the board of dimension {}",
                self.dimension
            );
        }
        let index = self.index(cell);
        if let Some(owner) = self.cells[index] {
            bail!("cell {cell} is already taken by player {owner}");
        }
        let mut result = self.clone();
        result.cells[index] = Some(player);
        Ok(result)
    }

    /// Cells adjacent to the given one.
    #[must_use]
    pub fn neighbours(&self, cell: Move) -> Neighbours {
        let (row, column) = (i16::from(cell.row()), i16::from(cell.column()));
        let middle = i16::from(self.middle());
        // Columns get taller towards the middle one, so the adjacent cells in
        // the neighbouring columns are shifted depending on the side.
        let left = if column <= middle {
            [(row - 1, column - 1), (row, column - 1)]
        } else {
            [(row, column - 1), (row + 1, column - 1)]
        };
        let right = if column >= middle {
            [(row - 1, column + 1), (row, column + 1)]
        } else {
            [(row, column + 1), (row + 1, column + 1)]
        };
        [(row - 1, column), (row + 1, column)]
            .into_iter()
            .chain(left)
            .chain(right)
            .filter_map(|(row, column)| {
                Some(Move::new(u8::try_from(row).ok()?, u8::try_from(column).ok()?))
            })
            .filter(|&neighbour| self.contains(neighbour))
            .collect()
    }

    /// Boundary cells are the ones touching the outside of the board.
    #[must_use]
    pub fn is_boundary(&self, cell: Move) -> bool {
        self.neighbours(cell).len() < 6
    }

    /// Returns the corner or the edge the cell belongs to (if any).
    #[must_use]
    pub fn sides(&self, cell: Move) -> Sides {
        debug_assert!(self.contains(cell));
        let (middle, last) = (self.middle(), self.side() - 1);
        let bottom = self.column_height(cell.column()) - 1;
        match (cell.row(), cell.column()) {
            (0, 0) => Sides::CORNER_0,
            (0, column) if column == middle => Sides::CORNER_1,
            (0, column) if column == last => Sides::CORNER_2,
            (row, column) if row == middle && column == last => Sides::CORNER_3,
            (row, column) if row == last && column == middle => Sides::CORNER_4,
            (row, 0) if row == middle => Sides::CORNER_5,
            (0, column) if column < middle => Sides::EDGE_0,
            (0, _) => Sides::EDGE_1,
            (_, column) if column == last => Sides::EDGE_2,
            (row, column) if row == bottom && column > middle => Sides::EDGE_3,
            (row, column) if row == bottom && column > 0 => Sides::EDGE_4,
            (_, 0) => Sides::EDGE_5,
            _ => Sides::empty(),
        }
    }

    /// Parses the text notation described in [`Position`].
    pub fn from_notation(input: &str) -> anyhow::Result<Self> {
        let rows = input.split('/').collect_vec();
        let side = rows.len();
        if side % 2 == 0 {
            bail!("incorrect notation: expected an odd number of rows, got {side}");
        }
        let dimension =
            u8::try_from(side / 2 + 1).context("incorrect notation: too many rows")?;
        let mut result = Self::empty(dimension)?;
        for (row, symbols) in (0..result.side()).zip(rows) {
            if symbols.chars().count() != side {
                bail!("incorrect notation: row {row} should have {side} cells, got '{symbols}'");
            }
            for (column, symbol) in (0..result.side()).zip(symbols.chars()) {
                let cell = Move::new(row, column);
                match (result.contains(cell), symbol) {
                    (false, '-') | (true, '.') => {},
                    (false, _) => {
                        bail!("incorrect notation: cell {cell} is outside of the board, got '{symbol}'")
                    },
                    (true, '-') => bail!("incorrect notation: cell {cell} is a part of the board"),
                    (true, _) => {
                        let index = result.index(cell);
                        result.cells[index] = Some(Player::try_from(symbol)?);
                    },
                }
            }
        }
        Ok(result)
    }

    fn symbol(&self, cell: Move) -> char {
        if !self.contains(cell) {
            return '-';
        }
        match self.cells[self.index(cell)] {
            None => '.',
            Some(Player::One) => '1',
            Some(Player::Two) => '2',
        }
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.side()).map(move |row| {
            (0..self.side())
                .map(|column| self.symbol(Move::new(row, column)))
                .collect()
        })
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace and an optional `position`
    /// prefix) before parsing the notation.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix("position ").unwrap_or(input);
        Self::from_notation(input.trim())
    }
}

impl fmt::Display for Position {
    /// Prints the board in text notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows().join("/"))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimension: {}", self.dimension)?;
        for row in self.rows() {
            writeln!(f, "{}", row.chars().join(" "))?;
        }
        writeln!(f, "Side to move: {}", self.side_to_move())?;
        writeln!(f, "Notation: {self}")?;
        Ok(())
    }
}
