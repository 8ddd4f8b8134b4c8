/// A single categorical cell of a board.
///
/// Chess boards use one blank value plus the twelve piece kinds. Every cell
/// has a single ASCII symbol, which is what canonical feature keys are built
/// from (see `shapefit-features`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Cell {
    /// Empty square.
    #[default]
    Blank = 0,
    WhitePawn = 1,
    WhiteKnight = 2,
    WhiteBishop = 3,
    WhiteRook = 4,
    WhiteQueen = 5,
    WhiteKing = 6,
    BlackPawn = 7,
    BlackKnight = 8,
    BlackBishop = 9,
    BlackRook = 10,
    BlackQueen = 11,
    BlackKing = 12,
}

impl Cell {
    /// Number of distinct cell values (13).
    pub const LEN: usize = 13;

    /// All cell values in discriminant order.
    pub const ALL: [Cell; Self::LEN] = [
        Cell::Blank,
        Cell::WhitePawn,
        Cell::WhiteKnight,
        Cell::WhiteBishop,
        Cell::WhiteRook,
        Cell::WhiteQueen,
        Cell::WhiteKing,
        Cell::BlackPawn,
        Cell::BlackKnight,
        Cell::BlackBishop,
        Cell::BlackRook,
        Cell::BlackQueen,
        Cell::BlackKing,
    ];

    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Returns the symbol used for this cell in canonical keys.
    ///
    /// Pieces use FEN letters (upper case for white). The blank cell is a space.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapefit_board::Cell;
    ///
    /// assert_eq!(Cell::WhiteKnight.as_char(), 'N');
    /// assert_eq!(Cell::BlackQueen.as_char(), 'q');
    /// assert_eq!(Cell::Blank.as_char(), ' ');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Blank => ' ',
            Cell::WhitePawn => 'P',
            Cell::WhiteKnight => 'N',
            Cell::WhiteBishop => 'B',
            Cell::WhiteRook => 'R',
            Cell::WhiteQueen => 'Q',
            Cell::WhiteKing => 'K',
            Cell::BlackPawn => 'p',
            Cell::BlackKnight => 'n',
            Cell::BlackBishop => 'b',
            Cell::BlackRook => 'r',
            Cell::BlackQueen => 'q',
            Cell::BlackKing => 'k',
        }
    }

    /// Returns [`Self::as_char`] as an ASCII byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Cell::Blank => b' ',
            Cell::WhitePawn => b'P',
            Cell::WhiteKnight => b'N',
            Cell::WhiteBishop => b'B',
            Cell::WhiteRook => b'R',
            Cell::WhiteQueen => b'Q',
            Cell::WhiteKing => b'K',
            Cell::BlackPawn => b'p',
            Cell::BlackKnight => b'n',
            Cell::BlackBishop => b'b',
            Cell::BlackRook => b'r',
            Cell::BlackQueen => b'q',
            Cell::BlackKing => b'k',
        }
    }

    /// Same as [`Self::as_char`], but draws blanks as `.` so grids stay readable.
    #[must_use]
    pub const fn display_char(self) -> char {
        match self {
            Cell::Blank => '.',
            _ => self.as_char(),
        }
    }

    /// Parses a cell from its key symbol.
    ///
    /// `.` is accepted as an alias of the blank cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapefit_board::Cell;
    ///
    /// assert_eq!(Cell::from_char('k'), Some(Cell::BlackKing));
    /// assert_eq!(Cell::from_char('.'), Some(Cell::Blank));
    /// assert_eq!(Cell::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' | '.' => Some(Cell::Blank),
            'P' => Some(Cell::WhitePawn),
            'N' => Some(Cell::WhiteKnight),
            'B' => Some(Cell::WhiteBishop),
            'R' => Some(Cell::WhiteRook),
            'Q' => Some(Cell::WhiteQueen),
            'K' => Some(Cell::WhiteKing),
            'p' => Some(Cell::BlackPawn),
            'n' => Some(Cell::BlackKnight),
            'b' => Some(Cell::BlackBishop),
            'r' => Some(Cell::BlackRook),
            'q' => Some(Cell::BlackQueen),
            'k' => Some(Cell::BlackKing),
            _ => None,
        }
    }

    /// Parses a piece from a FEN letter. Unlike [`Self::from_char`], blanks are rejected.
    #[must_use]
    pub const fn from_piece_char(c: char) -> Option<Self> {
        match Self::from_char(c) {
            Some(Cell::Blank) | None => None,
            piece => piece,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_roundtrip_all_cells() {
        for cell in Cell::ALL {
            assert_eq!(Cell::from_char(cell.as_char()), Some(cell));
            assert_eq!(char::from(cell.as_byte()), cell.as_char());
        }
    }

    #[test]
    fn test_discriminants_match_all_order() {
        for (i, cell) in Cell::ALL.iter().enumerate() {
            assert_eq!(*cell as usize, i);
        }
    }

    #[test]
    fn test_piece_char_rejects_blank() {
        assert_eq!(Cell::from_piece_char(' '), None);
        assert_eq!(Cell::from_piece_char('.'), None);
        assert_eq!(Cell::from_piece_char('R'), Some(Cell::WhiteRook));
    }

    #[test]
    fn test_display_char() {
        assert_eq!(Cell::Blank.display_char(), '.');
        assert_eq!(Cell::WhiteKing.display_char(), 'K');
    }
}
