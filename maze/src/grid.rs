use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The state of a single cell as reported by the grid extraction service
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cell {
    #[default]
    Wall,
    Open,
}

impl Cell {
    /// Converts the wire representation, where only `1` is traversable
    pub fn from_wire(value: u8) -> Self {
        if value == 1 {
            Cell::Open
        } else {
            Cell::Wall
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Cell::Open => 1,
            Cell::Wall => 0,
        }
    }

    pub fn is_open(self) -> bool {
        self == Cell::Open
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "X",
                Cell::Open => " ",
            }
        )
    }
}

/// A cell index into a [`Grid`], serialized as `[row, col]`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<[usize; 2]> for Point {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Point> for [usize; 2] {
    fn from(point: Point) -> Self {
        [point.row, point.col]
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid is empty")]
    Empty,
    #[error("grid row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A rectangular traversability grid, immutable once built.
///
/// Cells are kept in a single row-major vec. On the wire the grid is a
/// matrix of `0|1` values, which is what serde reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from rows of cells. Every row must have the same length.
    pub fn from_cells(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * columns);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(GridError::Ragged {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    /// Builds a grid from the `0|1` matrix returned by the extraction service
    pub fn from_wire(matrix: Vec<Vec<u8>>) -> Result<Self, GridError> {
        Self::from_cells(
            matrix
                .into_iter()
                .map(|row| row.into_iter().map(Cell::from_wire).collect())
                .collect(),
        )
    }

    /// Parses the compact text form used in tests and fixtures: `#` is a wall,
    /// anything else is open. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        Self::from_cells(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| {
                    line.chars()
                        .map(|c| if c == '#' { Cell::Wall } else { Cell::Open })
                        .collect()
                })
                .collect(),
        )
    }

    pub fn to_wire(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().map(|cell| cell.to_wire()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Check if the provided point lies inside the grid
    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub fn get(&self, point: Point) -> Option<Cell> {
        if self.contains(point) {
            Some(self.cells[point.row * self.columns + point.col])
        } else {
            None
        }
    }

    /// Out of range points are never open
    pub fn is_open(&self, point: Point) -> bool {
        self.get(point).is_some_and(Cell::is_open)
    }

    /// Iterates over all cells in row-major order together with their point
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Point::new(i / columns, i % columns), *cell))
    }

    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_open()).count()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(matrix: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_wire(matrix)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_wire()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
