//! Havannah primitives commonly used within [`crate::game`].

use std::fmt;

use anyhow::{bail, Context};

/// The smallest board that still has distinct corners and edges.
pub const MIN_DIMENSION: u8 = 2;
/// Largest supported board dimension (side length of the hexagon).
pub const MAX_DIMENSION: u8 = 10;

/// A move claims a single empty cell. Cells are addressed by (row, column) in
/// the `(2d - 1) x (2d - 1)` grid the hexagon is embedded into: the tops of all
/// columns are aligned on row 0 and the columns grow towards the middle one.
///
/// ```
/// use havannah::game::core::Move;
///
/// let next_move = Move::try_from("3,4").unwrap();
/// assert_eq!(next_move, Move::new(3, 4));
/// assert_eq!(next_move.to_string(), "3,4");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    row: u8,
    column: u8,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn column(self) -> u8 {
        self.column
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    /// Parses `"<row>,<column>"`, whitespace around the numbers is ignored.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let Some((row, column)) = input.trim().split_once(',') else {
            bail!("move should be formatted as '<row>,<column>', got '{input}'");
        };
        let row = row
            .trim()
            .parse::<u8>()
            .with_context(|| format!("incorrect move row in '{input}'"))?;
        let column = column
            .trim()
            .parse::<u8>()
            .with_context(|| format!("incorrect move column in '{input}'"))?;
        Ok(Self::new(row, column))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

bitflags::bitflags! {
    /// Board features a cell (or a group of connected stones) touches. Corners
    /// are not a part of any edge.
    ///
    /// Corners and edges are enumerated clockwise starting from the top-left
    /// corner at `(0, 0)`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Sides: u16 {
        #[allow(missing_docs)]
        const CORNER_0 = 1 << 0;
        #[allow(missing_docs)]
        const CORNER_1 = 1 << 1;
        #[allow(missing_docs)]
        const CORNER_2 = 1 << 2;
        #[allow(missing_docs)]
        const CORNER_3 = 1 << 3;
        #[allow(missing_docs)]
        const CORNER_4 = 1 << 4;
        #[allow(missing_docs)]
        const CORNER_5 = 1 << 5;

        #[allow(missing_docs)]
        const EDGE_0 = 1 << 6;
        #[allow(missing_docs)]
        const EDGE_1 = 1 << 7;
        #[allow(missing_docs)]
        const EDGE_2 = 1 << 8;
        #[allow(missing_docs)]
        const EDGE_3 = 1 << 9;
        #[allow(missing_docs)]
        const EDGE_4 = 1 << 10;
        #[allow(missing_docs)]
        const EDGE_5 = 1 << 11;

        /// All six corners.
        const CORNERS = 0b0000_0011_1111;
        /// All six edges.
        const EDGES = 0b1111_1100_0000;
    }
}

impl Sides {
    /// Number of distinct corners touched.
    #[must_use]
    pub const fn corners(self) -> u32 {
        (self.bits() & Self::CORNERS.bits()).count_ones()
    }

    /// Number of distinct edges touched.
    #[must_use]
    pub const fn edges(self) -> u32 {
        (self.bits() & Self::EDGES.bits()).count_ones()
    }
}
