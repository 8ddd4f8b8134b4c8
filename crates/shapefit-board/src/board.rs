use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use crate::{BoardError, Cell};

/// Largest supported width or height.
///
/// Feature keys encode every geometry value as a single decimal digit, so
/// neither side of a board may exceed 9 cells.
pub const MAX_DIMENSION: u8 = 9;

/// Largest supported cell count (`MAX_DIMENSION * MAX_DIMENSION`).
pub const MAX_CELLS: usize = (MAX_DIMENSION as usize) * (MAX_DIMENSION as usize);

/// Fixed-size grid of categorical cells.
///
/// Cells are stored row-major, starting at the top-left corner. For boards
/// parsed from FEN that is rank 8 first, file `a` first.
///
/// # Example
///
/// ```
/// use shapefit_board::{Board, Cell};
///
/// let board: Board = "PN/.k".parse().unwrap();
/// assert_eq!(board.width(), 2);
/// assert_eq!(board.height(), 2);
/// assert_eq!(board.cell(1, 0), Cell::WhiteKnight);
/// assert_eq!(board.cell(0, 1), Cell::Blank);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: ArrayVec<Cell, MAX_CELLS>,
}

impl Board {
    /// Builds a board from row-major cells.
    ///
    /// Fails when a dimension is outside `1..=MAX_DIMENSION` or when the cell
    /// count differs from `width * height`.
    pub fn new<I>(width: u8, height: u8, cells: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Cell>,
    {
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(BoardError::DimensionOutOfRange { width, height });
        }
        let expected = usize::from(width) * usize::from(height);
        let mut stored = ArrayVec::new();
        let mut found = 0;
        for cell in cells {
            found += 1;
            if found <= expected {
                stored.push(cell);
            }
        }
        if found != expected {
            return Err(BoardError::CellCountMismatch { expected, found });
        }
        Ok(Self {
            width,
            height,
            cells: stored,
        })
    }

    /// Builds a board of the given size with every cell blank.
    pub fn blank(width: u8, height: u8) -> Result<Self, BoardError> {
        let count = usize::from(width) * usize::from(height);
        Self::new(width, height, std::iter::repeat_n(Cell::Blank, count))
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the board.
    #[must_use]
    pub fn cell(&self, x: u8, y: u8) -> Cell {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Returns the cells of row `y`.
    #[must_use]
    pub fn row(&self, y: u8) -> &[Cell] {
        let width = usize::from(self.width);
        &self.cells[usize::from(y) * width..][..width]
    }

    /// Returns an iterator over the rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(usize::from(self.width))
    }
}

/// Parses rows separated by `/`, one symbol per cell (`.` or space for blank).
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.split('/').collect::<Vec<_>>();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(BoardError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for symbol in row.chars() {
                cells.push(Cell::from_char(symbol).ok_or(BoardError::UnknownCell { symbol })?);
            }
        }
        let width = u8::try_from(width).unwrap_or(u8::MAX);
        let height = u8::try_from(rows.len()).unwrap_or(u8::MAX);
        Self::new(width, height, cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.display_char())?;
            }
        }
        Ok(())
    }
}

/// A labeled board used for training.
///
/// Immutable once built: ingestion creates it and training only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSample {
    board: Board,
    label: f32,
}

impl BoardSample {
    #[must_use]
    pub fn new(board: Board, label: f32) -> Self {
        Self { board, label }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Known score of the position (already mapped from mate notation, not clamped).
    #[must_use]
    pub fn label(&self) -> f32 {
        self.label
    }
}
